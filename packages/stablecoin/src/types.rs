use core::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, Uint128};

/// Signed change to a position amount.
/// `Increase` deposits collateral / draws debt, `Decrease` withdraws collateral / repays debt.
#[cw_serde]
#[derive(Copy)]
pub enum Delta {
    Increase(Uint128),
    Decrease(Uint128),
}

impl Delta {
    pub fn zero() -> Self {
        Delta::Increase(Uint128::zero())
    }

    pub fn magnitude(&self) -> Uint128 {
        match self {
            Delta::Increase(amount) | Delta::Decrease(amount) => *amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude().is_zero()
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Delta::Increase(amount) if !amount.is_zero())
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Delta::Decrease(amount) if !amount.is_zero())
    }

    /// Applies the change to `base`, returning None if the result would be negative or overflow
    pub fn apply(&self, base: Uint128) -> Option<Uint128> {
        match self {
            Delta::Increase(amount) => base.checked_add(*amount).ok(),
            Delta::Decrease(amount) => base.checked_sub(*amount).ok(),
        }
    }
}

impl Default for Delta {
    fn default() -> Self {
        Delta::zero()
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Delta::Increase(amount) => write!(f, "+{}", amount),
            Delta::Decrease(amount) if amount.is_zero() => write!(f, "{}", amount),
            Delta::Decrease(amount) => write!(f, "-{}", amount),
        }
    }
}

/// Collateralized debt position.
/// Identity is (owner, collateral_type); a position with zero collateral and zero debt is never stored.
#[cw_serde]
pub struct Position {
    pub owner: Addr,
    pub collateral_type: String,
    pub collateral_amount: Uint128,
    pub debt_amount: Uint128,
}

impl Position {
    pub fn empty(owner: Addr, collateral_type: String) -> Self {
        Position {
            owner,
            collateral_type,
            collateral_amount: Uint128::zero(),
            debt_amount: Uint128::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.collateral_amount.is_zero() && self.debt_amount.is_zero()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {}{} / {} debt",
            self.owner, self.collateral_amount, self.collateral_type, self.debt_amount
        )
    }
}

#[cw_serde]
pub struct CollateralRiskParam {
    pub denom: String,
    /// Minimum collateral value / debt value, must be > 1
    pub liquidation_ratio: Decimal,
    /// Maximum debt drawable against this collateral type
    pub debt_ceiling: Uint128,
}

impl fmt::Display for CollateralRiskParam {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ratio: {} ceiling: {}",
            self.denom, self.liquidation_ratio, self.debt_ceiling
        )
    }
}

#[cw_serde]
pub struct RiskParams {
    /// Authorized collateral types and their parameters
    pub collateral_params: Vec<CollateralRiskParam>,
    pub global_debt_ceiling: Uint128,
    /// Freezes position changes while set
    pub circuit_breaker: bool,
}

/// Price submission of a single oracle for one asset
#[cw_serde]
pub struct PostedPrice {
    pub asset_code: String,
    pub oracle: Addr,
    pub price: Decimal,
    pub expiry: u64,
}

/// Median of the live submissions for an asset as of the last block boundary
#[cw_serde]
pub struct CurrentPrice {
    pub asset_code: String,
    pub price: Decimal,
    pub expiry: u64,
}

impl CurrentPrice {
    pub fn none(asset_code: String) -> Self {
        CurrentPrice {
            asset_code,
            price: Decimal::zero(),
            expiry: 0,
        }
    }

    /// False for the `none` record written when the last aggregation found no live submissions.
    /// A live median can itself be zero.
    pub fn is_live(&self) -> bool {
        !(self.price.is_zero() && self.expiry == 0)
    }
}

impl fmt::Display for CurrentPrice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} (expires {})", self.asset_code, self.price, self.expiry)
    }
}

#[cw_serde]
pub struct OracleAsset {
    pub asset_code: String,
    pub description: String,
}
