use std::cmp::Ordering;
use std::str::FromStr;

use cosmwasm_std::testing::MockStorage;
use cosmwasm_std::{Addr, Decimal, Order, Record, Storage, Uint128};

use stablecoin::math::{cmp_collateral_ratio, is_under_collateralized};
use stablecoin::types::{CollateralRiskParam, CurrentPrice, Delta, Position, RiskParams};

use crate::accounting::{audit_debt, collateral_debt, global_debt, seized_debt};
use crate::bank::{BalanceKeeper, ContractBank};
use crate::liquidations::{annihilate_debt, seize_position};
use crate::positions::{commit_position_change, validate_position_change};
use crate::query::list_positions;
use crate::state::get_target_position;
use crate::ContractError;

const STABLE: &str = "ustable";
const FTM: &str = "uftm";
const ATOM: &str = "uatom";
const LIQUIDATOR: &str = "liquidator";

fn collateral_param(denom: &str, ratio: &str, ceiling: u128) -> CollateralRiskParam {
    CollateralRiskParam {
        denom: denom.to_string(),
        liquidation_ratio: Decimal::from_str(ratio).unwrap(),
        debt_ceiling: Uint128::new(ceiling),
    }
}

fn default_risk_params() -> RiskParams {
    RiskParams {
        collateral_params: vec![
            collateral_param(FTM, "1.5", 1_000_000),
            collateral_param(ATOM, "2", 500_000),
        ],
        global_debt_ceiling: Uint128::new(1_500_000),
        circuit_breaker: false,
    }
}

fn price(denom: &str, price: &str) -> CurrentPrice {
    CurrentPrice {
        asset_code: denom.to_string(),
        price: Decimal::from_str(price).unwrap(),
        expiry: 20_000,
    }
}

fn inc(amount: u128) -> Delta {
    Delta::Increase(Uint128::new(amount))
}

fn dec(amount: u128) -> Delta {
    Delta::Decrease(Uint128::new(amount))
}

struct Ledger {
    storage: MockStorage,
    risk_params: RiskParams,
}

impl Ledger {
    fn new() -> Self {
        Ledger {
            storage: MockStorage::new(),
            risk_params: default_risk_params(),
        }
    }

    fn fund(&mut self, account: &str, denom: &str, amount: u128) {
        ContractBank
            .credit(&mut self.storage, &Addr::unchecked(account), denom, Uint128::new(amount))
            .unwrap();
    }

    fn balance(&self, account: &str, denom: &str) -> Uint128 {
        ContractBank
            .get_balance(&self.storage, &Addr::unchecked(account), denom)
            .unwrap()
    }

    fn modify(
        &mut self,
        owner: &str,
        collateral_type: &str,
        collateral_change: Delta,
        debt_change: Delta,
        price: &CurrentPrice,
    ) -> Result<Position, ContractError> {
        let change = validate_position_change(
            &self.storage,
            &ContractBank,
            &self.risk_params,
            STABLE,
            || Ok(price.clone()),
            &Addr::unchecked(owner),
            collateral_type,
            collateral_change,
            debt_change,
        )?;
        commit_position_change(&mut self.storage, &ContractBank, STABLE, change)
    }

    fn seize(
        &mut self,
        owner: &str,
        collateral_type: &str,
        collateral: u128,
        debt: u128,
        price: &CurrentPrice,
    ) -> Result<Position, ContractError> {
        seize_position(
            &mut self.storage,
            &ContractBank,
            &self.risk_params,
            price,
            &Addr::unchecked(LIQUIDATOR),
            &Addr::unchecked(owner),
            collateral_type,
            Uint128::new(collateral),
            Uint128::new(debt),
        )
    }

    fn position(&self, owner: &str, collateral_type: &str) -> Option<Position> {
        get_target_position(&self.storage, collateral_type, &Addr::unchecked(owner)).unwrap()
    }

    fn snapshot(&self) -> Vec<Record> {
        self.storage.range(None, None, Order::Ascending).collect()
    }

    fn assert_consistent(&self) {
        let audit = audit_debt(&self.storage).unwrap();
        assert!(audit.consistent, "inconsistent debt accounting: {:?}", audit);
    }
}

/// Deterministic generator so the randomized checks are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u128) -> u128 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as u128) % bound
    }
}

#[test]
fn open_then_close_restores_balances() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 1_000);
    let live = price(FTM, "2");

    let position = ledger.modify("alice", FTM, inc(500), inc(100), &live).unwrap();
    assert_eq!(position.collateral_amount, Uint128::new(500));
    assert_eq!(position.debt_amount, Uint128::new(100));
    assert_eq!(ledger.balance("alice", FTM), Uint128::new(500));
    assert_eq!(ledger.balance("alice", STABLE), Uint128::new(100));
    assert_eq!(global_debt(&ledger.storage).unwrap(), Uint128::new(100));
    assert_eq!(collateral_debt(&ledger.storage, FTM).unwrap(), Uint128::new(100));
    ledger.assert_consistent();

    let position = ledger.modify("alice", FTM, dec(500), dec(100), &live).unwrap();
    assert!(position.is_empty());

    //Empty positions aren't stored
    assert_eq!(ledger.position("alice", FTM), None);
    assert_eq!(ledger.balance("alice", FTM), Uint128::new(1_000));
    assert_eq!(ledger.balance("alice", STABLE), Uint128::zero());
    assert_eq!(global_debt(&ledger.storage).unwrap(), Uint128::zero());
    assert_eq!(collateral_debt(&ledger.storage, FTM).unwrap(), Uint128::zero());
    ledger.assert_consistent();
}

#[test]
fn rejected_changes_have_no_effects() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 1_000);
    ledger.fund("alice", ATOM, 1_000_000);
    let live = price(FTM, "2");

    //Existing position: 300 collateral, 100 debt
    ledger.modify("alice", FTM, inc(300), inc(100), &live).unwrap();

    let cases: Vec<(&str, Delta, Delta, CurrentPrice, ContractError)> = vec![
        (
            "uosmo",
            inc(1),
            Delta::zero(),
            price("uosmo", "1"),
            ContractError::CollateralNotAuthorized {
                denom: String::from("uosmo"),
            },
        ),
        (FTM, inc(701), Delta::zero(), live.clone(), ContractError::InsufficientCollateralBalance {}),
        (FTM, Delta::zero(), dec(101), live.clone(), ContractError::InsufficientDebtAssetBalance {}),
        (FTM, dec(301), Delta::zero(), live.clone(), ContractError::OverWithdrawCollateral {}),
        (FTM, dec(226), Delta::zero(), live.clone(), ContractError::BelowLiquidationRatio {}),
        (FTM, Delta::zero(), inc(301), live.clone(), ContractError::BelowLiquidationRatio {}),
        (FTM, inc(1), Delta::zero(), price(FTM, "0"), ContractError::BelowLiquidationRatio {}),
        (
            FTM,
            inc(1),
            Delta::zero(),
            CurrentPrice::none(String::from(FTM)),
            ContractError::NoLivePrice {
                denom: String::from(FTM),
            },
        ),
        (
            ATOM,
            inc(1_000_000),
            inc(500_001),
            price(ATOM, "10"),
            ContractError::CollateralDebtCeilingExceeded {
                denom: String::from(ATOM),
            },
        ),
    ];

    for (collateral_type, collateral_change, debt_change, current, expected) in cases {
        let before = ledger.snapshot();

        let err = ledger
            .modify("alice", collateral_type, collateral_change, debt_change, &current)
            .unwrap_err();
        assert_eq!(err, expected);
        assert_eq!(ledger.snapshot(), before, "{} left state behind", expected);
    }

    //Repaying more than the position owes, with enough stable on hand
    ledger.fund("alice", STABLE, 50);
    let before = ledger.snapshot();
    let err = ledger.modify("alice", FTM, Delta::zero(), dec(150), &live).unwrap_err();
    assert_eq!(err, ContractError::OverRepayDebt {});
    assert_eq!(ledger.snapshot(), before);

    ledger.assert_consistent();
}

#[test]
fn global_ceiling_applies_across_collateral_types() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", ATOM, 1_000_000);
    ledger.fund("bob", FTM, 10_000_000);

    ledger
        .modify("alice", ATOM, inc(1_000_000), inc(400_000), &price(ATOM, "10"))
        .unwrap();

    //Governance drops uatom and lowers the global ceiling below the outstanding total
    ledger.risk_params = RiskParams {
        collateral_params: vec![collateral_param(FTM, "1.5", 1_000_000)],
        global_debt_ceiling: Uint128::new(1_000_000),
        circuit_breaker: false,
    };

    let before = ledger.snapshot();
    let err = ledger
        .modify("bob", FTM, inc(10_000_000), inc(700_000), &price(FTM, "1"))
        .unwrap_err();
    assert_eq!(err, ContractError::GlobalDebtCeilingExceeded {});
    assert_eq!(ledger.snapshot(), before);

    ledger
        .modify("bob", FTM, inc(10_000_000), inc(600_000), &price(FTM, "1"))
        .unwrap();
    ledger.assert_consistent();
}

#[test]
fn global_ceiling_rejects_change_near_the_limit() {
    let mut ledger = Ledger::new();
    ledger.risk_params = RiskParams {
        collateral_params: vec![collateral_param(FTM, "1.5", 100)],
        global_debt_ceiling: Uint128::new(100),
        circuit_breaker: false,
    };
    ledger.fund("alice", FTM, 1_000);
    ledger.fund("bob", FTM, 100);
    let live = price(FTM, "2");

    ledger.modify("alice", FTM, inc(1_000), inc(95), &live).unwrap();

    let before = ledger.snapshot();
    let err = ledger.modify("bob", FTM, inc(100), inc(10), &live).unwrap_err();
    assert_eq!(err, ContractError::GlobalDebtCeilingExceeded {});
    assert_eq!(ledger.snapshot(), before);
    assert_eq!(global_debt(&ledger.storage).unwrap(), Uint128::new(95));
    assert_eq!(ledger.position("bob", FTM), None);
}

#[test]
fn repayment_over_lowered_ceiling_is_rejected() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 1_000);
    let live = price(FTM, "2");

    ledger.modify("alice", FTM, inc(1_000), inc(500), &live).unwrap();

    let mut lowered = default_risk_params();
    lowered.collateral_params[0].debt_ceiling = Uint128::new(100);
    ledger.risk_params = lowered;

    let err = ledger.modify("alice", FTM, Delta::zero(), dec(100), &live).unwrap_err();
    assert_eq!(
        err,
        ContractError::CollateralDebtCeilingExceeded {
            denom: String::from(FTM)
        }
    );
}

#[test]
fn liquidation_ratio_boundary() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 150);
    let one = price(FTM, "1");

    //150 * 1 == 1.5 * 100
    let err = ledger.modify("alice", FTM, inc(150), inc(101), &one).unwrap_err();
    assert_eq!(err, ContractError::BelowLiquidationRatio {});
    ledger.modify("alice", FTM, inc(150), inc(100), &one).unwrap();

    let err = ledger.modify("alice", FTM, dec(1), Delta::zero(), &one).unwrap_err();
    assert_eq!(err, ContractError::BelowLiquidationRatio {});
}

#[test]
fn debt_free_changes_need_no_price() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 1_000);
    let none = CurrentPrice::none(String::from(FTM));

    ledger.modify("alice", FTM, inc(1_000), Delta::zero(), &none).unwrap();
    let err = ledger.modify("alice", FTM, Delta::zero(), inc(1), &none).unwrap_err();
    assert_eq!(
        err,
        ContractError::NoLivePrice {
            denom: String::from(FTM)
        }
    );
    ledger.modify("alice", FTM, dec(1_000), Delta::zero(), &none).unwrap();
    assert_eq!(ledger.position("alice", FTM), None);
}

#[test]
fn circuit_breaker_freezes_changes() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 1_000);
    ledger.risk_params.circuit_breaker = true;

    //Frozen takes precedence over every other failure
    let err = ledger
        .modify("alice", "uosmo", inc(1), Delta::zero(), &price(FTM, "1"))
        .unwrap_err();
    assert_eq!(err, ContractError::Frozen {});
}

#[test]
fn seizure_requires_under_collateralization() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 300);
    ledger.modify("alice", FTM, inc(300), inc(100), &price(FTM, "2")).unwrap();

    let before = ledger.snapshot();
    let err = ledger.seize("alice", FTM, 300, 100, &price(FTM, "2")).unwrap_err();
    assert_eq!(err, ContractError::NotUnderCollateralized {});
    let err = ledger.seize("bob", FTM, 1, 1, &price(FTM, "0.1")).unwrap_err();
    assert_eq!(err, ContractError::PositionNotFound {});
    let err = ledger
        .seize("alice", FTM, 1, 1, &CurrentPrice::none(String::from(FTM)))
        .unwrap_err();
    assert_eq!(
        err,
        ContractError::NoLivePrice {
            denom: String::from(FTM)
        }
    );
    let err = ledger.seize("alice", FTM, 301, 100, &price(FTM, "0.4")).unwrap_err();
    assert_eq!(err, ContractError::OverSeize {});
    let err = ledger.seize("alice", FTM, 300, 101, &price(FTM, "0.4")).unwrap_err();
    assert_eq!(err, ContractError::OverSeize {});
    assert_eq!(ledger.snapshot(), before);

    //300 * 0.4 < 1.5 * 100
    let position = ledger.seize("alice", FTM, 100, 40, &price(FTM, "0.4")).unwrap();
    assert_eq!(position.collateral_amount, Uint128::new(200));
    assert_eq!(position.debt_amount, Uint128::new(60));
    assert_eq!(ledger.balance(LIQUIDATOR, FTM), Uint128::new(100));

    //Global debt is untouched until annihilation
    assert_eq!(global_debt(&ledger.storage).unwrap(), Uint128::new(100));
    assert_eq!(collateral_debt(&ledger.storage, FTM).unwrap(), Uint128::new(60));
    assert_eq!(seized_debt(&ledger.storage).unwrap(), Uint128::new(40));
    ledger.assert_consistent();

    //Seizing everything deletes the position
    ledger.seize("alice", FTM, 200, 60, &price(FTM, "0.4")).unwrap();
    assert_eq!(ledger.position("alice", FTM), None);
    assert_eq!(seized_debt(&ledger.storage).unwrap(), Uint128::new(100));
    ledger.assert_consistent();
}

#[test]
fn collateral_priced_at_zero_is_seizable() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 300);
    ledger.modify("alice", FTM, inc(300), inc(100), &price(FTM, "2")).unwrap();

    //A live median of zero is a price, not a missing one
    let crashed = price(FTM, "0");
    assert!(crashed.is_live());

    let position = ledger.seize("alice", FTM, 300, 100, &crashed).unwrap();
    assert!(position.is_empty());
    assert_eq!(ledger.position("alice", FTM), None);
    assert_eq!(ledger.balance(LIQUIDATOR, FTM), Uint128::new(300));
    assert_eq!(seized_debt(&ledger.storage).unwrap(), Uint128::new(100));
    ledger.assert_consistent();
}

#[test]
fn annihilation_retires_seized_debt() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 300);
    ledger.modify("alice", FTM, inc(300), inc(100), &price(FTM, "2")).unwrap();
    ledger.seize("alice", FTM, 300, 100, &price(FTM, "0.4")).unwrap();

    let liquidator = Addr::unchecked(LIQUIDATOR);

    let err = annihilate_debt(&mut ledger.storage, &ContractBank, STABLE, &liquidator, Uint128::new(101))
        .unwrap_err();
    assert_eq!(
        err,
        ContractError::ExcessAnnihilation {
            seized_debt: Uint128::new(100)
        }
    );
    let err = annihilate_debt(&mut ledger.storage, &ContractBank, STABLE, &liquidator, Uint128::new(60))
        .unwrap_err();
    assert_eq!(err, ContractError::InsufficientDebtAssetBalance {});

    //Alice's drawn stable reaches the liquidator through the auction
    ContractBank
        .debit(&mut ledger.storage, &Addr::unchecked("alice"), STABLE, Uint128::new(100))
        .unwrap();
    ledger.fund(LIQUIDATOR, STABLE, 100);

    let (global, seized) =
        annihilate_debt(&mut ledger.storage, &ContractBank, STABLE, &liquidator, Uint128::new(60))
            .unwrap();
    assert_eq!((global, seized), (Uint128::new(40), Uint128::new(40)));
    assert_eq!(ledger.balance(LIQUIDATOR, STABLE), Uint128::new(40));
    ledger.assert_consistent();

    annihilate_debt(&mut ledger.storage, &ContractBank, STABLE, &liquidator, Uint128::new(40)).unwrap();
    assert_eq!(global_debt(&ledger.storage).unwrap(), Uint128::zero());
    assert_eq!(seized_debt(&ledger.storage).unwrap(), Uint128::zero());
    ledger.assert_consistent();
}

#[test]
fn listing_is_sorted_and_price_filter_matches_full_filter() {
    let mut ledger = Ledger::new();
    let mut rng = Lcg(7);
    let high = price(FTM, "1000");

    for i in 0..40 {
        let owner = format!("owner{}", i);
        let collateral = rng.next(10_000) + 1;
        let debt = rng.next(collateral);
        ledger.fund(&owner, FTM, collateral);
        ledger.modify(&owner, FTM, inc(collateral), inc(debt), &high).unwrap();
    }
    //Identical ratios keep storage order
    ledger.fund("tie_a", FTM, 20);
    ledger.modify("tie_a", FTM, inc(20), inc(10), &high).unwrap();
    ledger.fund("tie_b", FTM, 40);
    ledger.modify("tie_b", FTM, inc(40), inc(20), &high).unwrap();

    let sorted = list_positions(&ledger.storage, &ledger.risk_params, Some(FTM), None).unwrap();
    assert_eq!(sorted.len(), 42);
    for pair in sorted.windows(2) {
        assert_ne!(cmp_collateral_ratio(&pair[0], &pair[1]), Ordering::Greater);
    }
    let tie_a = sorted.iter().position(|p| p.owner == Addr::unchecked("tie_a")).unwrap();
    let tie_b = sorted.iter().position(|p| p.owner == Addr::unchecked("tie_b")).unwrap();
    assert!(tie_a < tie_b);

    let ratio = Decimal::from_str("1.5").unwrap();
    for filter in ["0.5", "1", "1.5", "2", "3", "1000"].iter() {
        let filter = Decimal::from_str(filter).unwrap();

        let filtered =
            list_positions(&ledger.storage, &ledger.risk_params, Some(FTM), Some(filter)).unwrap();
        let expected: Vec<Position> = sorted
            .iter()
            .filter(|p| is_under_collateralized(p.collateral_amount, p.debt_amount, filter, ratio))
            .cloned()
            .collect();
        assert_eq!(filtered, expected);
    }
}

#[test]
fn listing_filters_by_collateral_type() {
    let mut ledger = Ledger::new();
    ledger.fund("alice", FTM, 100);
    ledger.fund("alice", ATOM, 100);
    ledger.modify("alice", FTM, inc(100), inc(10), &price(FTM, "1")).unwrap();
    ledger.modify("alice", ATOM, inc(100), inc(10), &price(ATOM, "1")).unwrap();

    let all = list_positions(&ledger.storage, &ledger.risk_params, None, None).unwrap();
    assert_eq!(all.len(), 2);
    let atom = list_positions(&ledger.storage, &ledger.risk_params, Some(ATOM), None).unwrap();
    assert_eq!(atom.len(), 1);
    assert_eq!(atom[0].collateral_type, ATOM);

    let err = list_positions(&ledger.storage, &ledger.risk_params, None, Some(Decimal::one())).unwrap_err();
    assert_eq!(err, ContractError::PriceFilterWithoutCollateral {});
    let err = list_positions(&ledger.storage, &ledger.risk_params, Some("uosmo"), None).unwrap_err();
    assert_eq!(
        err,
        ContractError::CollateralNotAuthorized {
            denom: String::from("uosmo")
        }
    );
}

#[test]
fn accounting_holds_across_random_operations() {
    let mut ledger = Ledger::new();
    let mut rng = Lcg(42);
    let owners = ["alice", "bob", "carol", "dave"];
    let denoms = [FTM, ATOM];

    for owner in owners.iter() {
        ledger.fund(owner, FTM, 100_000);
        ledger.fund(owner, ATOM, 100_000);
    }

    for _ in 0..300 {
        let owner = owners[rng.next(owners.len() as u128) as usize];
        let denom = denoms[rng.next(denoms.len() as u128) as usize];
        let current = price(denom, ["0.2", "1", "3"][rng.next(3) as usize]);
        let amount = rng.next(5_000);

        //Failures are expected, the counters must agree either way
        let _ = match rng.next(5) {
            0 => ledger.modify(owner, denom, inc(amount), inc(amount / 2), &current),
            1 => ledger.modify(owner, denom, dec(amount), Delta::zero(), &current),
            2 => ledger.modify(owner, denom, Delta::zero(), dec(amount / 3), &current),
            3 => ledger.modify(owner, denom, inc(amount), Delta::zero(), &current),
            _ => ledger.seize(owner, denom, amount / 4, amount / 8, &current),
        };
        ledger.assert_consistent();
    }
}
