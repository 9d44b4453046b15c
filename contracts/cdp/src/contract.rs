#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    attr, to_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::set_contract_version;

use stablecoin::cdp::{Config, ExecuteMsg, InstantiateMsg, QueryMsg, UpdateConfig};

use crate::accounting::audit_debt;
use crate::bank::{deposit, transfer, withdraw};
use crate::error::ContractError;
use crate::liquidations::{annihilate, partial_seize};
use crate::positions::modify_position;
use crate::query::{
    query_balance, query_collateral_debt, query_collateral_risk_params, query_global_debt,
    query_position, query_position_health, query_positions, query_risk_params,
    query_under_collateralized,
};
use crate::risk_engine::{update_risk_params, validate_risk_params};
use crate::state::{CONFIG, GLOBAL_DEBT, RISK_PARAMS, RISK_PARAMS_VERSION, SEIZED_DEBT};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:cdp";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let mut config = Config {
        owner: info.sender,
        oracle_contract: deps.api.addr_validate(&msg.oracle_contract)?,
        liquidator: None,
        debt_denom: msg.debt_denom,
    };

    //Set optional config parameters
    if let Some(address) = msg.owner {
        config.owner = deps.api.addr_validate(&address)?;
    };
    if let Some(address) = msg.liquidator {
        config.liquidator = Some(deps.api.addr_validate(&address)?);
    };

    validate_risk_params(&msg.risk_params, &config.debt_denom)?;

    CONFIG.save(deps.storage, &config)?;
    RISK_PARAMS.save(deps.storage, &msg.risk_params)?;
    RISK_PARAMS_VERSION.save(deps.storage, &1u64)?;
    GLOBAL_DEBT.save(deps.storage, &Uint128::zero())?;
    SEIZED_DEBT.save(deps.storage, &Uint128::zero())?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "instantiate"),
        attr("config", format!("{:?}", config)),
        attr("contract_address", env.contract.address),
    ]))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::ModifyPosition {
            collateral_type,
            collateral_change,
            debt_change,
        } => modify_position(deps, info, collateral_type, collateral_change, debt_change),
        ExecuteMsg::PartialSeize {
            owner,
            collateral_type,
            collateral_to_seize,
            debt_to_seize,
        } => partial_seize(
            deps,
            info,
            owner,
            collateral_type,
            collateral_to_seize,
            debt_to_seize,
        ),
        ExecuteMsg::Annihilate { amount } => annihilate(deps, info, amount),
        ExecuteMsg::Deposit {} => deposit(deps, info),
        ExecuteMsg::Withdraw { denom, amount } => withdraw(deps, info, denom, amount),
        ExecuteMsg::Transfer {
            recipient,
            denom,
            amount,
        } => transfer(deps, info, recipient, denom, amount),
        ExecuteMsg::UpdateConfig(update) => update_config(deps, info, update),
        ExecuteMsg::UpdateRiskParams { risk_params } => {
            update_risk_params(deps, info, risk_params)
        }
    }
}

fn update_config(
    deps: DepsMut,
    info: MessageInfo,
    update: UpdateConfig,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    //Assert Authority
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }

    let mut attrs = vec![attr("method", "update_config")];

    //Set Optionals
    if let Some(owner) = update.owner {
        config.owner = deps.api.addr_validate(&owner)?;
        attrs.push(attr("new_owner", config.owner.to_string()));
    }
    if let Some(oracle_contract) = update.oracle_contract {
        config.oracle_contract = deps.api.addr_validate(&oracle_contract)?;
        attrs.push(attr("new_oracle_contract", config.oracle_contract.to_string()));
    }
    if let Some(liquidator) = update.liquidator {
        let liquidator = deps.api.addr_validate(&liquidator)?;
        attrs.push(attr("new_liquidator", liquidator.to_string()));
        config.liquidator = Some(liquidator);
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attributes(attrs))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::RiskParams {} => to_binary(&query_risk_params(deps)?),
        QueryMsg::CollateralRiskParams { denom } => {
            to_binary(&query_collateral_risk_params(deps, denom)?)
        }
        QueryMsg::GlobalDebt {} => to_binary(&query_global_debt(deps)?),
        QueryMsg::CollateralDebt { denom } => to_binary(&query_collateral_debt(deps, denom)?),
        QueryMsg::Position {
            owner,
            collateral_type,
        } => to_binary(&query_position(deps, owner, collateral_type)?),
        QueryMsg::Positions {
            collateral_type,
            price,
        } => to_binary(&query_positions(deps, collateral_type, price)?),
        QueryMsg::PositionHealth {
            owner,
            collateral_type,
        } => to_binary(&query_position_health(deps, owner, collateral_type)?),
        QueryMsg::UnderCollateralized { collateral_type } => {
            to_binary(&query_under_collateralized(deps, collateral_type)?)
        }
        QueryMsg::Balance { account, denom } => to_binary(&query_balance(deps, account, denom)?),
        QueryMsg::AuditDebt {} => to_binary(&audit_debt(deps.storage)?),
    }
}
