use cosmwasm_std::{Addr, Decimal, Deps, Order, StdError, StdResult, Storage};

use stablecoin::cdp::{
    BalanceResponse, CollateralDebtResponse, GlobalDebtResponse, PositionHealthResponse,
    RiskParamsResponse,
};
use stablecoin::helpers::query_current_price;
use stablecoin::math::{cmp_collateral_ratio, is_under_collateralized};
use stablecoin::types::{CollateralRiskParam, Position, RiskParams};

use crate::accounting::{collateral_debt, global_debt, seized_debt};
use crate::bank::{BalanceKeeper, ContractBank};
use crate::error::ContractError;
use crate::risk_engine::{authorize, collateral_param};
use crate::state::{get_target_position, CONFIG, POSITIONS, RISK_PARAMS, RISK_PARAMS_VERSION};

fn to_std_error(err: ContractError) -> StdError {
    match err {
        ContractError::Std(err) => err,
        err => StdError::generic_err(err.to_string()),
    }
}

/// Positions ordered by ascending collateral / debt ratio, ties kept in storage order.
/// With a price, the list stops at the first position that is adequately collateralized at that price.
pub fn list_positions(
    storage: &dyn Storage,
    risk_params: &RiskParams,
    collateral_type: Option<&str>,
    price: Option<Decimal>,
) -> Result<Vec<Position>, ContractError> {
    let collateral = collateral_type
        .map(|collateral_type| authorize(risk_params, collateral_type))
        .transpose()?;

    let mut positions = match &collateral {
        Some(collateral) => POSITIONS
            .prefix(collateral.denom().to_string())
            .range(storage, None, None, Order::Ascending)
            .map(|item| item.map(|(_, position)| position))
            .collect::<StdResult<Vec<Position>>>()?,
        None => POSITIONS
            .range(storage, None, None, Order::Ascending)
            .map(|item| item.map(|(_, position)| position))
            .collect::<StdResult<Vec<Position>>>()?,
    };

    positions.sort_by(cmp_collateral_ratio);

    match (collateral, price) {
        (Some(collateral), Some(price)) => Ok(positions
            .into_iter()
            .take_while(|position| {
                collateral.is_under_collateralized(
                    position.collateral_amount,
                    position.debt_amount,
                    price,
                )
            })
            .collect()),
        (None, Some(_)) => Err(ContractError::PriceFilterWithoutCollateral {}),
        (_, None) => Ok(positions),
    }
}

pub fn query_positions(
    deps: Deps,
    collateral_type: Option<String>,
    price: Option<Decimal>,
) -> StdResult<Vec<Position>> {
    let risk_params = RISK_PARAMS.load(deps.storage)?;

    list_positions(deps.storage, &risk_params, collateral_type.as_deref(), price)
        .map_err(to_std_error)
}

/// Positions that can be seized at the oracle's current price
pub fn query_under_collateralized(deps: Deps, collateral_type: String) -> StdResult<Vec<Position>> {
    let config = CONFIG.load(deps.storage)?;
    let risk_params = RISK_PARAMS.load(deps.storage)?;

    let price = query_current_price(
        deps.querier,
        config.oracle_contract.to_string(),
        collateral_type.clone(),
    )?;
    if !price.is_live() {
        return Err(to_std_error(ContractError::NoLivePrice {
            denom: collateral_type,
        }));
    }

    list_positions(deps.storage, &risk_params, Some(&collateral_type), Some(price.price))
        .map_err(to_std_error)
}

pub fn query_position(deps: Deps, owner: String, collateral_type: String) -> StdResult<Position> {
    let owner = deps.api.addr_validate(&owner)?;

    get_target_position(deps.storage, &collateral_type, &owner)?
        .ok_or_else(|| to_std_error(ContractError::PositionNotFound {}))
}

pub fn query_position_health(
    deps: Deps,
    owner: String,
    collateral_type: String,
) -> StdResult<PositionHealthResponse> {
    let config = CONFIG.load(deps.storage)?;

    let position = query_position(deps, owner, collateral_type.clone())?;
    let risk_param = query_collateral_risk_params(deps, collateral_type.clone())?;
    let price = query_current_price(
        deps.querier,
        config.oracle_contract.to_string(),
        collateral_type,
    )?;

    //Without a live price nothing is seizable
    let under_collateralized = price.is_live()
        && is_under_collateralized(
            position.collateral_amount,
            position.debt_amount,
            price.price,
            risk_param.liquidation_ratio,
        );

    Ok(PositionHealthResponse {
        position,
        price,
        risk_param,
        under_collateralized,
    })
}

pub fn query_risk_params(deps: Deps) -> StdResult<RiskParamsResponse> {
    Ok(RiskParamsResponse {
        version: RISK_PARAMS_VERSION.may_load(deps.storage)?.unwrap_or_default(),
        risk_params: RISK_PARAMS.load(deps.storage)?,
    })
}

pub fn query_collateral_risk_params(deps: Deps, denom: String) -> StdResult<CollateralRiskParam> {
    let risk_params = RISK_PARAMS.load(deps.storage)?;

    authorize(&risk_params, &denom)
        .map(|collateral| collateral.param().clone())
        .map_err(to_std_error)
}

pub fn query_global_debt(deps: Deps) -> StdResult<GlobalDebtResponse> {
    Ok(GlobalDebtResponse {
        total_debt: global_debt(deps.storage)?,
        seized_debt: seized_debt(deps.storage)?,
    })
}

pub fn query_collateral_debt(deps: Deps, denom: String) -> StdResult<CollateralDebtResponse> {
    let risk_params = RISK_PARAMS.load(deps.storage)?;

    Ok(CollateralDebtResponse {
        total_debt: collateral_debt(deps.storage, &denom)?,
        debt_ceiling: collateral_param(&risk_params, &denom).map(|param| param.debt_ceiling),
        denom,
    })
}

pub fn query_balance(deps: Deps, account: String, denom: String) -> StdResult<BalanceResponse> {
    let account: Addr = deps.api.addr_validate(&account)?;

    Ok(BalanceResponse {
        amount: ContractBank.get_balance(deps.storage, &account, &denom)?,
        account,
        denom,
    })
}
