use std::cmp::Ordering;

use cosmwasm_std::{Decimal, Uint128};

use crate::types::Position;

/// `collateral * price < liquidation_ratio * debt`.
/// Compared on the 18-decimal atomics widened to 256 bits, so no division or rounding happens.
pub fn is_under_collateralized(
    collateral: Uint128,
    debt: Uint128,
    price: Decimal,
    liquidation_ratio: Decimal,
) -> bool {
    collateral.full_mul(price.atomics()) < debt.full_mul(liquidation_ratio.atomics())
}

/// Orders positions by collateral / debt without dividing:
/// `c_a / d_a < c_b / d_b` <=> `c_a * d_b < c_b * d_a`.
/// Zero-debt positions compare as infinitely collateralized.
pub fn cmp_collateral_ratio(a: &Position, b: &Position) -> Ordering {
    a.collateral_amount
        .full_mul(b.debt_amount)
        .cmp(&b.collateral_amount.full_mul(a.debt_amount))
}

/// Floor of the mean of two values, without overflowing
pub fn floor_mean(a: u128, b: u128) -> u128 {
    a / 2 + b / 2 + (a % 2 + b % 2) / 2
}
