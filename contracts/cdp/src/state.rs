use cosmwasm_std::{Addr, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

use stablecoin::cdp::Config;
use stablecoin::types::{Position, RiskParams};

pub const CONFIG: Item<Config> = Item::new("config");
pub const RISK_PARAMS: Item<RiskParams> = Item::new("risk_params");
pub const RISK_PARAMS_VERSION: Item<u64> = Item::new("risk_params_version");

/// (collateral_type, owner) -> Position
pub const POSITIONS: Map<(String, Addr), Position> = Map::new("positions");

pub const GLOBAL_DEBT: Item<Uint128> = Item::new("global_debt");
pub const SEIZED_DEBT: Item<Uint128> = Item::new("seized_debt");
pub const COLLATERAL_DEBT: Map<String, Uint128> = Map::new("collateral_debt");

/// (account, denom) -> ledger balance
pub const BALANCES: Map<(Addr, String), Uint128> = Map::new("balances");

pub fn get_target_position(
    storage: &dyn Storage,
    collateral_type: &str,
    owner: &Addr,
) -> StdResult<Option<Position>> {
    POSITIONS.may_load(storage, (collateral_type.to_string(), owner.clone()))
}
