use std::collections::BTreeMap;

use cosmwasm_std::{Order, StdResult, Storage, Uint128};

use stablecoin::cdp::{AuditResponse, CollateralAudit};
use stablecoin::types::Position;

use crate::error::ContractError;
use crate::state::{COLLATERAL_DEBT, GLOBAL_DEBT, POSITIONS, SEIZED_DEBT};

/// Debt counters as they stand after a position write
pub struct DebtTotals {
    pub global_debt: Uint128,
    pub collateral_debt: Uint128,
    /// Left untouched when None
    pub seized_debt: Option<Uint128>,
}

pub fn global_debt(storage: &dyn Storage) -> StdResult<Uint128> {
    Ok(GLOBAL_DEBT.may_load(storage)?.unwrap_or_default())
}

pub fn seized_debt(storage: &dyn Storage) -> StdResult<Uint128> {
    Ok(SEIZED_DEBT.may_load(storage)?.unwrap_or_default())
}

pub fn collateral_debt(storage: &dyn Storage, denom: &str) -> StdResult<Uint128> {
    Ok(COLLATERAL_DEBT
        .may_load(storage, denom.to_string())?
        .unwrap_or_default())
}

/// Persist a position together with the counters its change affects.
/// Positions with no collateral and no debt are deleted rather than stored.
pub fn commit_position(
    storage: &mut dyn Storage,
    position: &Position,
    totals: DebtTotals,
) -> StdResult<()> {
    let key = (position.collateral_type.clone(), position.owner.clone());
    if position.is_empty() {
        POSITIONS.remove(storage, key);
    } else {
        POSITIONS.save(storage, key, position)?;
    }

    GLOBAL_DEBT.save(storage, &totals.global_debt)?;
    COLLATERAL_DEBT.save(storage, position.collateral_type.clone(), &totals.collateral_debt)?;
    if let Some(seized_debt) = totals.seized_debt {
        SEIZED_DEBT.save(storage, &seized_debt)?;
    }

    Ok(())
}

/// Retire `amount` of seized debt, reducing outstanding debt with it.
/// Returns the (global, seized) debt afterwards.
pub fn retire_seized_debt(
    storage: &mut dyn Storage,
    amount: Uint128,
) -> Result<(Uint128, Uint128), ContractError> {
    let seized = seized_debt(storage)?;
    if amount > seized {
        return Err(ContractError::ExcessAnnihilation { seized_debt: seized });
    }

    let seized = seized - amount;
    let global = global_debt(storage)?.checked_sub(amount)?;

    SEIZED_DEBT.save(storage, &seized)?;
    GLOBAL_DEBT.save(storage, &global)?;

    Ok((global, seized))
}

/// Recount stored positions against the debt counters
pub fn audit_debt(storage: &dyn Storage) -> StdResult<AuditResponse> {
    let mut collaterals: BTreeMap<String, CollateralAudit> = BTreeMap::new();

    for item in COLLATERAL_DEBT.range(storage, None, None, Order::Ascending) {
        let (denom, tracked_debt) = item?;
        collaterals.insert(
            denom.clone(),
            CollateralAudit {
                denom,
                tracked_debt,
                position_debt: Uint128::zero(),
            },
        );
    }

    for item in POSITIONS.range(storage, None, None, Order::Ascending) {
        let (_, position) = item?;
        let audit = collaterals
            .entry(position.collateral_type.clone())
            .or_insert_with(|| CollateralAudit {
                denom: position.collateral_type.clone(),
                tracked_debt: Uint128::zero(),
                position_debt: Uint128::zero(),
            });
        audit.position_debt = audit.position_debt.checked_add(position.debt_amount)?;
    }

    let global_debt = global_debt(storage)?;
    let seized_debt = seized_debt(storage)?;

    let mut tracked_total = seized_debt;
    let mut consistent = true;
    for audit in collaterals.values() {
        tracked_total = tracked_total.checked_add(audit.tracked_debt)?;
        consistent &= audit.tracked_debt == audit.position_debt;
    }
    consistent &= tracked_total == global_debt;

    Ok(AuditResponse {
        global_debt,
        seized_debt,
        collaterals: collaterals.into_values().collect(),
        consistent,
    })
}
