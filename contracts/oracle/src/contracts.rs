use std::str::FromStr;

use cosmwasm_std::{
    attr, entry_point, to_binary, Addr, Binary, Decimal, Deps, DepsMut, Empty, Env, MessageInfo,
    Order, Response, StdError, StdResult, Storage,
};
use cw2::set_contract_version;

use stablecoin::math::floor_mean;
use stablecoin::oracle::{Config, ExecuteMsg, InstantiateMsg, QueryMsg, SudoMsg};
use stablecoin::types::{CurrentPrice, OracleAsset, PostedPrice};

use crate::error::ContractError;
use crate::state::{ASSETS, CONFIG, CURRENT_PRICES, ORACLES, RAW_PRICES};

// Contract name and version used for migration.
const CONTRACT_NAME: &str = "oracle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        owner: match msg.owner {
            Some(owner) => deps.api.addr_validate(&owner)?,
            None => info.sender,
        },
    };
    CONFIG.save(deps.storage, &config)?;

    for asset in msg.assets {
        save_new_asset(deps.storage, asset)?;
    }
    for oracle in msg.oracles {
        let oracle = deps.api.addr_validate(&oracle)?;
        save_new_oracle(deps.storage, oracle)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("config", format!("{:?}", config))
        .add_attribute("contract_address", env.contract.address))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::PostPrice {
            asset_code,
            price,
            expiry,
        } => post_price(deps, env, info, asset_code, price, expiry),
        ExecuteMsg::AddAsset { asset } => add_asset(deps, info, asset),
        ExecuteMsg::RemoveAsset { asset_code } => remove_asset(deps, info, asset_code),
        ExecuteMsg::AddOracle { oracle } => add_oracle(deps, info, oracle),
        ExecuteMsg::SetOracles { oracles } => set_oracles(deps, info, oracles),
        ExecuteMsg::UpdateConfig { owner } => update_config(deps, info, owner),
    }
}

/// Block boundary hook, invoked by the chain rather than by users
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    match msg {
        SudoMsg::EndBlock {} => {
            let updated = set_current_prices(deps.storage, env.block.height)?;

            Ok(Response::new().add_attributes(vec![
                attr("method", "end_block"),
                attr("height", env.block.height.to_string()),
                attr("updated_assets", updated.join(",")),
            ]))
        }
    }
}

/// Record or replace the sender's submission for an asset
pub fn post_price(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    asset_code: String,
    price: String,
    expiry: u64,
) -> Result<Response, ContractError> {
    if !ASSETS.has(deps.storage, asset_code.clone()) {
        return Err(ContractError::UnknownAsset { asset_code });
    }
    if !ORACLES.has(deps.storage, info.sender.clone()) {
        return Err(ContractError::UnauthorizedSubmitter {
            submitter: info.sender.to_string(),
        });
    }

    let price = Decimal::from_str(price.trim()).map_err(|_| ContractError::InvalidPrice { price })?;

    if expiry < env.block.height {
        return Err(ContractError::ExpiredPrice {
            expiry,
            height: env.block.height,
        });
    }

    let posted = PostedPrice {
        asset_code: asset_code.clone(),
        oracle: info.sender.clone(),
        price,
        expiry,
    };
    RAW_PRICES.save(deps.storage, (asset_code.clone(), info.sender.clone()), &posted)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "post_price"),
        attr("asset_code", asset_code),
        attr("oracle", info.sender),
        attr("price", price.to_string()),
        attr("expiry", expiry.to_string()),
    ]))
}

/// Recompute the median of every registered asset.
/// Submissions expiring before `height` are ignored, and a price is only written when it changed.
/// Returns the asset codes whose current price was written.
pub fn set_current_prices(storage: &mut dyn Storage, height: u64) -> StdResult<Vec<String>> {
    let asset_codes = ASSETS
        .keys(storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<String>>>()?;

    let mut updated = vec![];
    for asset_code in asset_codes {
        let live: Vec<PostedPrice> = load_raw_prices(storage, &asset_code)?
            .into_iter()
            .filter(|posted| posted.expiry >= height)
            .collect();

        let median = compute_median(&asset_code, live);
        let stored = CURRENT_PRICES
            .may_load(storage, asset_code.clone())?
            .unwrap_or_else(|| CurrentPrice::none(asset_code.clone()));

        if stored != median {
            CURRENT_PRICES.save(storage, asset_code.clone(), &median)?;
            updated.push(asset_code);
        }
    }

    Ok(updated)
}

/// Median of the given submissions.
/// An even count takes the mean of the two middle prices and the floored mean of their expiries.
/// No submissions yields the zero price.
pub fn compute_median(asset_code: &str, mut live: Vec<PostedPrice>) -> CurrentPrice {
    if live.is_empty() {
        return CurrentPrice::none(asset_code.to_string());
    }

    live.sort_by(|a, b| a.price.cmp(&b.price));
    let mid = live.len() / 2;

    if live.len() % 2 == 1 {
        CurrentPrice {
            asset_code: asset_code.to_string(),
            price: live[mid].price,
            expiry: live[mid].expiry,
        }
    } else {
        let (lower, upper) = (&live[mid - 1], &live[mid]);

        CurrentPrice {
            asset_code: asset_code.to_string(),
            price: Decimal::raw(floor_mean(
                lower.price.atomics().u128(),
                upper.price.atomics().u128(),
            )),
            expiry: floor_mean(lower.expiry as u128, upper.expiry as u128) as u64,
        }
    }
}

fn load_raw_prices(storage: &dyn Storage, asset_code: &str) -> StdResult<Vec<PostedPrice>> {
    RAW_PRICES
        .prefix(asset_code.to_string())
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, posted)| posted))
        .collect()
}

fn assert_owner(storage: &dyn Storage, sender: &Addr) -> Result<Config, ContractError> {
    let config = CONFIG.load(storage)?;
    if *sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }
    Ok(config)
}

fn save_new_asset(storage: &mut dyn Storage, asset: OracleAsset) -> Result<(), ContractError> {
    if ASSETS.has(storage, asset.asset_code.clone()) {
        return Err(ContractError::DuplicateAsset {
            asset_code: asset.asset_code,
        });
    }
    ASSETS.save(storage, asset.asset_code.clone(), &asset)?;
    Ok(())
}

fn save_new_oracle(storage: &mut dyn Storage, oracle: Addr) -> Result<(), ContractError> {
    if ORACLES.has(storage, oracle.clone()) {
        return Err(ContractError::DuplicateOracle {
            oracle: oracle.to_string(),
        });
    }
    ORACLES.save(storage, oracle, &Empty {})?;
    Ok(())
}

fn add_asset(deps: DepsMut, info: MessageInfo, asset: OracleAsset) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;

    let asset_code = asset.asset_code.clone();
    save_new_asset(deps.storage, asset)?;

    Ok(Response::new().add_attributes(vec![
        attr("method", "add_asset"),
        attr("asset_code", asset_code),
    ]))
}

/// Unregister an asset, dropping its submissions and aggregated price
fn remove_asset(
    deps: DepsMut,
    info: MessageInfo,
    asset_code: String,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;

    if !ASSETS.has(deps.storage, asset_code.clone()) {
        return Err(ContractError::UnknownAsset { asset_code });
    }

    for posted in load_raw_prices(deps.storage, &asset_code)? {
        RAW_PRICES.remove(deps.storage, (asset_code.clone(), posted.oracle));
    }
    CURRENT_PRICES.remove(deps.storage, asset_code.clone());
    ASSETS.remove(deps.storage, asset_code.clone());

    Ok(Response::new().add_attributes(vec![
        attr("method", "remove_asset"),
        attr("asset_code", asset_code),
    ]))
}

fn add_oracle(deps: DepsMut, info: MessageInfo, oracle: String) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;

    let oracle = deps.api.addr_validate(&oracle)?;
    save_new_oracle(deps.storage, oracle.clone())?;

    Ok(Response::new().add_attributes(vec![attr("method", "add_oracle"), attr("oracle", oracle)]))
}

/// Replace the authorized set.
/// Submissions of removed oracles stay stored until they expire.
fn set_oracles(
    deps: DepsMut,
    info: MessageInfo,
    oracles: Vec<String>,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;

    let current = ORACLES
        .keys(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<Addr>>>()?;
    for oracle in current {
        ORACLES.remove(deps.storage, oracle);
    }

    for oracle in oracles.iter() {
        let oracle = deps.api.addr_validate(oracle)?;
        save_new_oracle(deps.storage, oracle)?;
    }

    Ok(Response::new().add_attributes(vec![
        attr("method", "set_oracles"),
        attr("oracles", oracles.join(",")),
    ]))
}

fn update_config(
    deps: DepsMut,
    info: MessageInfo,
    owner: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = assert_owner(deps.storage, &info.sender)?;
    let mut attrs = vec![attr("method", "update_config")];

    if let Some(owner) = owner {
        config.owner = deps.api.addr_validate(&owner)?;
        attrs.push(attr("new_owner", config.owner.to_string()));
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attributes(attrs))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::Assets {} => to_binary(&query_assets(deps)?),
        QueryMsg::Oracles {} => to_binary(
            &ORACLES
                .keys(deps.storage, None, None, Order::Ascending)
                .collect::<StdResult<Vec<Addr>>>()?,
        ),
        QueryMsg::RawPrices { asset_code } => {
            assert_registered(deps.storage, &asset_code)?;
            to_binary(&load_raw_prices(deps.storage, &asset_code)?)
        }
        QueryMsg::CurrentPrice { asset_code } => to_binary(&query_current_price(deps, asset_code)?),
    }
}

fn query_assets(deps: Deps) -> StdResult<Vec<OracleAsset>> {
    ASSETS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, asset)| asset))
        .collect()
}

/// Registered assets without an aggregated price return the zero price
fn query_current_price(deps: Deps, asset_code: String) -> StdResult<CurrentPrice> {
    assert_registered(deps.storage, &asset_code)?;

    Ok(CURRENT_PRICES
        .may_load(deps.storage, asset_code.clone())?
        .unwrap_or_else(|| CurrentPrice::none(asset_code)))
}

fn assert_registered(storage: &dyn Storage, asset_code: &str) -> StdResult<()> {
    if !ASSETS.has(storage, asset_code.to_string()) {
        return Err(StdError::generic_err(
            ContractError::UnknownAsset {
                asset_code: asset_code.to_string(),
            }
            .to_string(),
        ));
    }
    Ok(())
}
