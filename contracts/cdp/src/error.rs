use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Position changes are frozen temporarily")]
    Frozen {},

    #[error("Collateral type isn't authorized: {denom}")]
    CollateralNotAuthorized { denom: String },

    #[error("Insufficient collateral balance")]
    InsufficientCollateralBalance {},

    #[error("Insufficient stable balance to repay")]
    InsufficientDebtAssetBalance {},

    #[error("Withdrawal exceeds the position's collateral")]
    OverWithdrawCollateral {},

    #[error("Repayment exceeds the position's debt")]
    OverRepayDebt {},

    #[error("Insufficient {denom} balance: {available} available, {required} required")]
    InsufficientFunds {
        denom: String,
        available: Uint128,
        required: Uint128,
    },

    #[error("No live price for {denom}")]
    NoLivePrice { denom: String },

    #[error("Position would fall below the liquidation ratio")]
    BelowLiquidationRatio {},

    #[error("Global debt ceiling exceeded")]
    GlobalDebtCeilingExceeded {},

    #[error("Debt ceiling exceeded for {denom}")]
    CollateralDebtCeilingExceeded { denom: String },

    #[error("Position doesn't exist")]
    PositionNotFound {},

    #[error("Position is sufficiently collateralized and can't be seized")]
    NotUnderCollateralized {},

    #[error("Seize amounts exceed the position")]
    OverSeize {},

    #[error("Debt accounting underflow: {counter}")]
    AccountingUnderflow { counter: String },

    #[error("Annihilation exceeds seized debt of {seized_debt}")]
    ExcessAnnihilation { seized_debt: Uint128 },

    #[error("The stable asset only exists inside the ledger")]
    InternalAsset {},

    #[error("Amount must be greater than zero")]
    ZeroAmount {},

    #[error("Must send exactly one denom")]
    InvalidDeposit {},

    #[error("A price filter requires a collateral type")]
    PriceFilterWithoutCollateral {},

    #[error("Invalid risk parameters: {msg}")]
    InvalidRiskParams { msg: String },
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}
