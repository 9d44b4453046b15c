#![allow(clippy::too_many_arguments)]
pub mod accounting;
pub mod bank;
pub mod contract;
mod error;
pub mod helpers;
pub mod liquidations;
pub mod positions;
pub mod query;
pub mod risk_engine;
pub mod state;

pub use crate::error::ContractError;

#[cfg(test)]
pub mod testing;
