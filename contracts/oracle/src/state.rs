use cosmwasm_std::{Addr, Empty};
use cw_storage_plus::{Item, Map};

use stablecoin::oracle::Config;
use stablecoin::types::{CurrentPrice, OracleAsset, PostedPrice};

pub const CONFIG: Item<Config> = Item::new("config");
pub const ASSETS: Map<String, OracleAsset> = Map::new("assets");
pub const ORACLES: Map<Addr, Empty> = Map::new("oracles");
pub const RAW_PRICES: Map<(String, Addr), PostedPrice> = Map::new("raw_prices"); //(asset_code, oracle) -> latest submission of that oracle
pub const CURRENT_PRICES: Map<String, CurrentPrice> = Map::new("current_prices");
