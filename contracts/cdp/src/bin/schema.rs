use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

use stablecoin::cdp::{
    AuditResponse, BalanceResponse, CollateralDebtResponse, Config, ExecuteMsg,
    GlobalDebtResponse, InstantiateMsg, PositionHealthResponse, QueryMsg, RiskParamsResponse,
};
use stablecoin::types::{CollateralRiskParam, Position};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(InstantiateMsg), &out_dir);
    export_schema(&schema_for!(ExecuteMsg), &out_dir);
    export_schema(&schema_for!(QueryMsg), &out_dir);
    export_schema(&schema_for!(Config), &out_dir);
    export_schema(&schema_for!(Position), &out_dir);
    export_schema(&schema_for!(CollateralRiskParam), &out_dir);
    export_schema(&schema_for!(RiskParamsResponse), &out_dir);
    export_schema(&schema_for!(GlobalDebtResponse), &out_dir);
    export_schema(&schema_for!(CollateralDebtResponse), &out_dir);
    export_schema(&schema_for!(PositionHealthResponse), &out_dir);
    export_schema(&schema_for!(BalanceResponse), &out_dir);
    export_schema(&schema_for!(AuditResponse), &out_dir);
}
