use cosmwasm_std::{attr, Addr, DepsMut, MessageInfo, Response, Storage, Uint128};

use stablecoin::cdp::Config;
use stablecoin::helpers::query_current_price;
use stablecoin::types::{CurrentPrice, Position, RiskParams};

use crate::accounting::{
    collateral_debt, commit_position, global_debt, retire_seized_debt, seized_debt, DebtTotals,
};
use crate::bank::{BalanceKeeper, ContractBank};
use crate::error::ContractError;
use crate::risk_engine::authorize;
use crate::state::{get_target_position, CONFIG, RISK_PARAMS};

fn assert_liquidator(config: &Config, sender: &Addr) -> Result<(), ContractError> {
    match &config.liquidator {
        Some(liquidator) if liquidator == sender => Ok(()),
        _ => Err(ContractError::Unauthorized {}),
    }
}

/// Entry point for `ExecuteMsg::PartialSeize`
pub fn partial_seize(
    deps: DepsMut,
    info: MessageInfo,
    owner: String,
    collateral_type: String,
    collateral_to_seize: Uint128,
    debt_to_seize: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    assert_liquidator(&config, &info.sender)?;

    let owner = deps.api.addr_validate(&owner)?;
    let risk_params = RISK_PARAMS.load(deps.storage)?;
    authorize(&risk_params, &collateral_type)?;

    let price = query_current_price(
        deps.querier,
        config.oracle_contract.to_string(),
        collateral_type.clone(),
    )?;

    let position = seize_position(
        deps.storage,
        &ContractBank,
        &risk_params,
        &price,
        &info.sender,
        &owner,
        &collateral_type,
        collateral_to_seize,
        debt_to_seize,
    )?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "partial_seize"),
        attr("owner", owner),
        attr("collateral_type", collateral_type),
        attr("seized_collateral", collateral_to_seize),
        attr("seized_debt", debt_to_seize),
        attr("remaining_collateral", position.collateral_amount),
        attr("remaining_debt", position.debt_amount),
    ]))
}

/// Move collateral and debt out of an under-collateralized position.
/// Seized collateral is credited to the liquidator and the seized debt is parked in the
/// seized-debt counter; outstanding global debt only drops once it's annihilated.
pub fn seize_position<B: BalanceKeeper>(
    storage: &mut dyn Storage,
    bank: &B,
    risk_params: &RiskParams,
    price: &CurrentPrice,
    liquidator: &Addr,
    owner: &Addr,
    collateral_type: &str,
    collateral_to_seize: Uint128,
    debt_to_seize: Uint128,
) -> Result<Position, ContractError> {
    let collateral = authorize(risk_params, collateral_type)?;

    let mut position = get_target_position(storage, collateral_type, owner)?
        .ok_or(ContractError::PositionNotFound {})?;

    if !price.is_live() {
        return Err(ContractError::NoLivePrice {
            denom: collateral_type.to_string(),
        });
    }
    if !collateral.is_under_collateralized(
        position.collateral_amount,
        position.debt_amount,
        price.price,
    ) {
        return Err(ContractError::NotUnderCollateralized {});
    }

    position.collateral_amount = position
        .collateral_amount
        .checked_sub(collateral_to_seize)
        .map_err(|_| ContractError::OverSeize {})?;
    position.debt_amount = position
        .debt_amount
        .checked_sub(debt_to_seize)
        .map_err(|_| ContractError::OverSeize {})?;

    let collateral_debt = collateral_debt(storage, collateral_type)?
        .checked_sub(debt_to_seize)
        .map_err(|_| ContractError::AccountingUnderflow {
            counter: format!("collateral_debt:{}", collateral_type),
        })?;
    let seized_debt = seized_debt(storage)?.checked_add(debt_to_seize)?;
    let global_debt = global_debt(storage)?;

    bank.credit(storage, liquidator, collateral_type, collateral_to_seize)?;

    commit_position(
        storage,
        &position,
        DebtTotals {
            global_debt,
            collateral_debt,
            seized_debt: Some(seized_debt),
        },
    )?;

    Ok(position)
}

/// Entry point for `ExecuteMsg::Annihilate`
pub fn annihilate(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    assert_liquidator(&config, &info.sender)?;

    let (global_debt, seized_debt) = annihilate_debt(
        deps.storage,
        &ContractBank,
        &config.debt_denom,
        &info.sender,
        amount,
    )?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "annihilate"),
        attr("amount", amount),
        attr("global_debt", global_debt),
        attr("seized_debt", seized_debt),
    ]))
}

/// Burn the liquidator's stable against seized debt.
/// Returns the (global, seized) debt afterwards.
pub fn annihilate_debt<B: BalanceKeeper>(
    storage: &mut dyn Storage,
    bank: &B,
    debt_denom: &str,
    liquidator: &Addr,
    amount: Uint128,
) -> Result<(Uint128, Uint128), ContractError> {
    let seized = seized_debt(storage)?;
    if amount > seized {
        return Err(ContractError::ExcessAnnihilation { seized_debt: seized });
    }
    if !bank.has_balance(storage, liquidator, debt_denom, amount)? {
        return Err(ContractError::InsufficientDebtAssetBalance {});
    }

    bank.debit(storage, liquidator, debt_denom, amount)?;
    retire_seized_debt(storage, amount)
}
