use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

use stablecoin::oracle::{Config, ExecuteMsg, InstantiateMsg, QueryMsg, SudoMsg};
use stablecoin::types::{CurrentPrice, OracleAsset, PostedPrice};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(InstantiateMsg), &out_dir);
    export_schema(&schema_for!(ExecuteMsg), &out_dir);
    export_schema(&schema_for!(SudoMsg), &out_dir);
    export_schema(&schema_for!(QueryMsg), &out_dir);
    export_schema(&schema_for!(Config), &out_dir);
    export_schema(&schema_for!(OracleAsset), &out_dir);
    export_schema(&schema_for!(PostedPrice), &out_dir);
    export_schema(&schema_for!(CurrentPrice), &out_dir);
}
