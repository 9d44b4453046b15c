use cosmwasm_std::{attr, Addr, DepsMut, MessageInfo, Response, StdResult, Storage, Uint128};

use stablecoin::helpers::query_current_price;
use stablecoin::types::{CurrentPrice, Delta, Position, RiskParams};

use crate::accounting::{collateral_debt, commit_position, global_debt, DebtTotals};
use crate::bank::{BalanceKeeper, ContractBank};
use crate::error::ContractError;
use crate::risk_engine::authorize;
use crate::state::{get_target_position, CONFIG, RISK_PARAMS};

/// A validated position change.
/// Built without touching state, so a rejected change leaves nothing behind.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionChange {
    pub collateral_change: Delta,
    pub debt_change: Delta,
    /// Position after the change
    pub position: Position,
    pub global_debt: Uint128,
    pub collateral_debt: Uint128,
}

/// Entry point for `ExecuteMsg::ModifyPosition`
pub fn modify_position(
    deps: DepsMut,
    info: MessageInfo,
    collateral_type: String,
    collateral_change: Delta,
    debt_change: Delta,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let risk_params = RISK_PARAMS.load(deps.storage)?;

    //The oracle is only queried once the change is known to leave debt behind
    let querier = deps.querier;
    let oracle_contract = config.oracle_contract.to_string();
    let asset_code = collateral_type.clone();
    let fetch_price = move || query_current_price(querier, oracle_contract, asset_code);

    let change = validate_position_change(
        deps.storage,
        &ContractBank,
        &risk_params,
        &config.debt_denom,
        fetch_price,
        &info.sender,
        &collateral_type,
        collateral_change,
        debt_change,
    )?;
    let position = commit_position_change(deps.storage, &ContractBank, &config.debt_denom, change)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "modify_position"),
        attr("owner", info.sender),
        attr("collateral_type", collateral_type),
        attr("collateral_change", collateral_change.to_string()),
        attr("debt_change", debt_change.to_string()),
        attr("collateral_amount", position.collateral_amount),
        attr("debt_amount", position.debt_amount),
    ]))
}

/// Check a change against balances, the liquidation ratio and the debt ceilings.
/// Checks run in a fixed order and the first failure is returned.
/// `fetch_price` is only called when the resulting position carries debt.
pub fn validate_position_change<B, P>(
    storage: &dyn Storage,
    bank: &B,
    risk_params: &RiskParams,
    debt_denom: &str,
    fetch_price: P,
    owner: &Addr,
    collateral_type: &str,
    collateral_change: Delta,
    debt_change: Delta,
) -> Result<PositionChange, ContractError>
where
    B: BalanceKeeper,
    P: FnOnce() -> StdResult<CurrentPrice>,
{
    if risk_params.circuit_breaker {
        return Err(ContractError::Frozen {});
    }
    let collateral = authorize(risk_params, collateral_type)?;

    //Deposits come out of the owner's collateral balance, repayments out of their stable
    if let Delta::Increase(amount) = collateral_change {
        if !bank.has_balance(storage, owner, collateral_type, amount)? {
            return Err(ContractError::InsufficientCollateralBalance {});
        }
    }
    if let Delta::Decrease(amount) = debt_change {
        if !bank.has_balance(storage, owner, debt_denom, amount)? {
            return Err(ContractError::InsufficientDebtAssetBalance {});
        }
    }

    let mut position = get_target_position(storage, collateral_type, owner)?
        .unwrap_or_else(|| Position::empty(owner.clone(), collateral_type.to_string()));

    position.collateral_amount = collateral_change
        .apply(position.collateral_amount)
        .ok_or(ContractError::OverWithdrawCollateral {})?;
    position.debt_amount = debt_change
        .apply(position.debt_amount)
        .ok_or(ContractError::OverRepayDebt {})?;

    if !position.debt_amount.is_zero() {
        let price = fetch_price()?;
        if !price.is_live() {
            return Err(ContractError::NoLivePrice {
                denom: collateral_type.to_string(),
            });
        }
        if collateral.is_under_collateralized(
            position.collateral_amount,
            position.debt_amount,
            price.price,
        ) {
            return Err(ContractError::BelowLiquidationRatio {});
        }
    }

    let global_debt = debt_change
        .apply(global_debt(storage)?)
        .filter(|total| *total <= risk_params.global_debt_ceiling)
        .ok_or(ContractError::GlobalDebtCeilingExceeded {})?;

    let collateral_debt = debt_change
        .apply(collateral_debt(storage, collateral_type)?)
        .filter(|total| *total <= collateral.debt_ceiling())
        .ok_or_else(|| ContractError::CollateralDebtCeilingExceeded {
            denom: collateral_type.to_string(),
        })?;

    Ok(PositionChange {
        collateral_change,
        debt_change,
        position,
        global_debt,
        collateral_debt,
    })
}

/// Apply a validated change: move balances, then write the position and counters together
pub fn commit_position_change<B: BalanceKeeper>(
    storage: &mut dyn Storage,
    bank: &B,
    debt_denom: &str,
    change: PositionChange,
) -> Result<Position, ContractError> {
    let owner = &change.position.owner;
    let collateral_type = &change.position.collateral_type;

    match change.collateral_change {
        Delta::Increase(amount) => bank.debit(storage, owner, collateral_type, amount)?,
        Delta::Decrease(amount) => bank.credit(storage, owner, collateral_type, amount)?,
    }
    match change.debt_change {
        Delta::Increase(amount) => bank.credit(storage, owner, debt_denom, amount)?,
        Delta::Decrease(amount) => bank.debit(storage, owner, debt_denom, amount)?,
    }

    commit_position(
        storage,
        &change.position,
        DebtTotals {
            global_debt: change.global_debt,
            collateral_debt: change.collateral_debt,
            seized_debt: None,
        },
    )?;

    Ok(change.position)
}
