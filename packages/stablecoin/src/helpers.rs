use cosmwasm_std::{to_binary, QuerierWrapper, QueryRequest, StdResult, WasmQuery};

use crate::oracle::QueryMsg as OracleQueryMsg;
use crate::types::CurrentPrice;

/// Queries the oracle contract for the aggregated price of `asset_code`
pub fn query_current_price(
    querier: QuerierWrapper,
    oracle_contract: String,
    asset_code: String,
) -> StdResult<CurrentPrice> {
    querier.query::<CurrentPrice>(&QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: oracle_contract,
        msg: to_binary(&OracleQueryMsg::CurrentPrice { asset_code })?,
    }))
}
