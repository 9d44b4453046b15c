use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, Uint128};

use crate::types::{CollateralRiskParam, CurrentPrice, Delta, Position, RiskParams};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>,
    /// Price source for collateral assets
    pub oracle_contract: String,
    /// Address allowed to seize positions and annihilate debt
    pub liquidator: Option<String>,
    /// Denom of the internal stable asset
    pub debt_denom: String,
    pub risk_params: RiskParams,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Change the sender's position in `collateral_type` by the given deltas
    ModifyPosition {
        collateral_type: String,
        collateral_change: Delta,
        debt_change: Delta,
    },
    /// Liquidator only: move collateral and debt out of an under-collateralized position
    PartialSeize {
        owner: String,
        collateral_type: String,
        collateral_to_seize: Uint128,
        debt_to_seize: Uint128,
    },
    /// Liquidator only: burn the liquidator's stable against seized debt
    Annihilate {
        amount: Uint128,
    },
    /// Credit attached funds to the sender's ledger balance
    Deposit {},
    /// Send ledger balance back to the sender as native funds
    Withdraw {
        denom: String,
        amount: Uint128,
    },
    /// Move ledger balance between accounts
    Transfer {
        recipient: String,
        denom: String,
        amount: Uint128,
    },
    UpdateConfig(UpdateConfig),
    /// Replace the risk parameters, bumping their version
    UpdateRiskParams {
        risk_params: RiskParams,
    },
}

#[cw_serde]
pub struct UpdateConfig {
    pub owner: Option<String>,
    pub oracle_contract: Option<String>,
    pub liquidator: Option<String>,
}

#[cw_serde]
pub enum QueryMsg {
    /// Returns Config
    Config {},
    /// Returns RiskParamsResponse
    RiskParams {},
    /// Returns CollateralRiskParam
    CollateralRiskParams { denom: String },
    /// Returns GlobalDebtResponse
    GlobalDebt {},
    /// Returns CollateralDebtResponse
    CollateralDebt { denom: String },
    /// Returns Position
    Position {
        owner: String,
        collateral_type: String,
    },
    /// Returns Vec<Position> ordered by ascending collateral ratio.
    /// With a price, only positions under-collateralized at that price are returned.
    Positions {
        collateral_type: Option<String>,
        price: Option<Decimal>,
    },
    /// Returns PositionHealthResponse
    PositionHealth {
        owner: String,
        collateral_type: String,
    },
    /// Returns Vec<Position> under-collateralized at the oracle's current price
    UnderCollateralized { collateral_type: String },
    /// Returns BalanceResponse
    Balance { account: String, denom: String },
    /// Returns AuditResponse
    AuditDebt {},
}

#[cw_serde]
pub struct Config {
    pub owner: Addr,
    pub oracle_contract: Addr,
    pub liquidator: Option<Addr>,
    pub debt_denom: String,
}

#[cw_serde]
pub struct RiskParamsResponse {
    pub version: u64,
    pub risk_params: RiskParams,
}

#[cw_serde]
pub struct GlobalDebtResponse {
    /// Outstanding debt, including seized debt not yet annihilated
    pub total_debt: Uint128,
    pub seized_debt: Uint128,
}

#[cw_serde]
pub struct CollateralDebtResponse {
    pub denom: String,
    pub total_debt: Uint128,
    pub debt_ceiling: Option<Uint128>,
}

#[cw_serde]
pub struct PositionHealthResponse {
    pub position: Position,
    pub price: CurrentPrice,
    pub risk_param: CollateralRiskParam,
    pub under_collateralized: bool,
}

#[cw_serde]
pub struct BalanceResponse {
    pub account: Addr,
    pub denom: String,
    pub amount: Uint128,
}

#[cw_serde]
pub struct CollateralAudit {
    pub denom: String,
    /// Counter kept by the contract
    pub tracked_debt: Uint128,
    /// Sum of stored position debt
    pub position_debt: Uint128,
}

#[cw_serde]
pub struct AuditResponse {
    pub global_debt: Uint128,
    pub seized_debt: Uint128,
    pub collaterals: Vec<CollateralAudit>,
    /// global == sum(per collateral) + seized and every counter matches its positions
    pub consistent: bool,
}
