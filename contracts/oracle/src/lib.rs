pub mod contracts;
pub mod error;
pub mod helpers;
pub mod state;

pub use crate::error::ContractError;
