use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;

use crate::types::OracleAsset;

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>,
    pub assets: Vec<OracleAsset>,
    /// Addresses allowed to post prices
    pub oracles: Vec<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Upsert the sender's price for an asset
    PostPrice {
        asset_code: String,
        /// Non-negative decimal string
        price: String,
        /// Block height the submission stays live through
        expiry: u64,
    },
    AddAsset {
        asset: OracleAsset,
    },
    /// Removes the asset along with its submissions and current price
    RemoveAsset {
        asset_code: String,
    },
    AddOracle {
        oracle: String,
    },
    /// Replaces the authorized oracle set
    SetOracles {
        oracles: Vec<String>,
    },
    UpdateConfig {
        owner: Option<String>,
    },
}

/// Chain-driven hooks
#[cw_serde]
pub enum SudoMsg {
    /// Recompute every asset's current price at the block boundary
    EndBlock {},
}

#[cw_serde]
pub enum QueryMsg {
    /// Returns Config
    Config {},
    /// Returns Vec<OracleAsset>
    Assets {},
    /// Returns Vec<Addr>
    Oracles {},
    /// Returns Vec<PostedPrice>, including expired submissions
    RawPrices { asset_code: String },
    /// Returns CurrentPrice
    CurrentPrice { asset_code: String },
}

#[cw_serde]
pub struct Config {
    pub owner: Addr,
}
