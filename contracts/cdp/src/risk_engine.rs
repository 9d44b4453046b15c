use std::collections::HashSet;

use cosmwasm_std::{attr, Decimal, DepsMut, MessageInfo, Response, Uint128};

use stablecoin::math::is_under_collateralized;
use stablecoin::types::{CollateralRiskParam, RiskParams};

use crate::error::ContractError;
use crate::state::{CONFIG, RISK_PARAMS, RISK_PARAMS_VERSION};

/// A collateral type checked against the loaded risk parameters.
/// Only `authorize` hands these out, so holding one means the type is currently authorized.
pub struct AuthorizedCollateral<'a> {
    param: &'a CollateralRiskParam,
}

impl<'a> AuthorizedCollateral<'a> {
    pub fn denom(&self) -> &str {
        &self.param.denom
    }

    pub fn liquidation_ratio(&self) -> Decimal {
        self.param.liquidation_ratio
    }

    pub fn debt_ceiling(&self) -> Uint128 {
        self.param.debt_ceiling
    }

    pub fn param(&self) -> &CollateralRiskParam {
        self.param
    }

    pub fn is_under_collateralized(&self, collateral: Uint128, debt: Uint128, price: Decimal) -> bool {
        is_under_collateralized(collateral, debt, price, self.param.liquidation_ratio)
    }
}

pub fn collateral_param<'a>(
    risk_params: &'a RiskParams,
    denom: &str,
) -> Option<&'a CollateralRiskParam> {
    risk_params
        .collateral_params
        .iter()
        .find(|param| param.denom == denom)
}

pub fn is_collateral_authorized(risk_params: &RiskParams, denom: &str) -> bool {
    collateral_param(risk_params, denom).is_some()
}

pub fn authorize<'a>(
    risk_params: &'a RiskParams,
    denom: &str,
) -> Result<AuthorizedCollateral<'a>, ContractError> {
    match collateral_param(risk_params, denom) {
        Some(param) => Ok(AuthorizedCollateral { param }),
        None => Err(ContractError::CollateralNotAuthorized {
            denom: denom.to_string(),
        }),
    }
}

pub fn validate_risk_params(risk_params: &RiskParams, debt_denom: &str) -> Result<(), ContractError> {
    let invalid = |msg: String| Err(ContractError::InvalidRiskParams { msg });

    let mut seen = HashSet::new();
    let mut ceilings = Uint128::zero();

    for param in risk_params.collateral_params.iter() {
        if param.denom.is_empty() {
            return invalid(String::from("collateral denom can't be empty"));
        }
        if param.denom == debt_denom {
            return invalid(format!("{} is the stable asset", param.denom));
        }
        if !seen.insert(param.denom.as_str()) {
            return invalid(format!("duplicate collateral type {}", param.denom));
        }
        if param.liquidation_ratio <= Decimal::one() {
            return invalid(format!(
                "liquidation ratio of {} must be greater than 1",
                param.denom
            ));
        }

        ceilings = match ceilings.checked_add(param.debt_ceiling) {
            Ok(sum) => sum,
            Err(_) => return invalid(String::from("debt ceilings overflow")),
        };
    }

    if ceilings > risk_params.global_debt_ceiling {
        return invalid(format!(
            "collateral debt ceilings ({}) exceed the global ceiling ({})",
            ceilings, risk_params.global_debt_ceiling
        ));
    }

    Ok(())
}

/// Replace the risk parameters and bump their version.
/// Existing positions are kept even if their collateral type is no longer authorized.
pub fn update_risk_params(
    deps: DepsMut,
    info: MessageInfo,
    risk_params: RiskParams,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }

    validate_risk_params(&risk_params, &config.debt_denom)?;

    let version = RISK_PARAMS_VERSION.may_load(deps.storage)?.unwrap_or_default() + 1;
    RISK_PARAMS.save(deps.storage, &risk_params)?;
    RISK_PARAMS_VERSION.save(deps.storage, &version)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "update_risk_params"),
        attr("version", version.to_string()),
        attr("circuit_breaker", risk_params.circuit_breaker.to_string()),
    ]))
}
