#![no_main]

use iac_policy_engine::checks::{CheckRegistry, ResourceConf};
use iac_policy_engine::rules::CompiledRules;
use libfuzzer_sys::fuzz_target;

const RESOURCE_TYPES: &[&str] = &[
    "azurerm_storage_account",
    "azurerm_key_vault",
    "azurerm_mssql_database",
    "azurerm_redis_cache",
];

fuzz_target!(|data: &str| {
    let Ok(conf) = ResourceConf::from_json(data) else {
        return;
    };
    let registry = CheckRegistry::builtin();
    let rules = CompiledRules::default();
    for resource_type in RESOURCE_TYPES {
        let _ = registry.evaluate(resource_type, &conf, &rules);
    }
});
