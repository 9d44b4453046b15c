use cosmwasm_std::{to_binary, Addr, Coin, CosmosMsg, QuerierWrapper, StdResult, WasmMsg};
use cosmwasm_schema::cw_serde;

use stablecoin::helpers::query_current_price;
use stablecoin::oracle::ExecuteMsg;
use stablecoin::types::CurrentPrice;

/// OracleContract is a wrapper around Addr that provides a lot of helpers
/// for working with this.
#[cw_serde]
pub struct OracleContract(pub Addr);

impl OracleContract {
    pub fn addr(&self) -> Addr {
        self.0.clone()
    }

    pub fn call<T: Into<ExecuteMsg>>(&self, msg: T, funds: Vec<Coin>) -> StdResult<CosmosMsg> {
        let msg = to_binary(&msg.into())?;
        Ok(WasmMsg::Execute {
            contract_addr: self.addr().into(),
            msg,
            funds,
        }
        .into())
    }

    pub fn current_price(&self, querier: QuerierWrapper, asset_code: &str) -> StdResult<CurrentPrice> {
        query_current_price(querier, self.addr().into(), asset_code.to_string())
    }
}
