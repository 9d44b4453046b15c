use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Asset isn't registered: {asset_code}")]
    UnknownAsset { asset_code: String },

    #[error("{submitter} isn't an authorized oracle")]
    UnauthorizedSubmitter { submitter: String },

    #[error("Price must be a non-negative decimal: {price:?}")]
    InvalidPrice { price: String },

    #[error("Price expired at {expiry}, current height is {height}")]
    ExpiredPrice { expiry: u64, height: u64 },

    #[error("Asset already registered: {asset_code}")]
    DuplicateAsset { asset_code: String },

    #[error("Oracle already authorized: {oracle}")]
    DuplicateOracle { oracle: String },
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}
