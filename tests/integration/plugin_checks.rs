use iac_policy_engine::checks::{CheckRegistry, CheckResult, Plan, ResourceConf};
use iac_policy_engine::rules::CompiledRules;
use serde_json::json;

fn results(resource_type: &str, conf: serde_json::Value) -> Vec<(&'static str, CheckResult)> {
    let conf: ResourceConf = serde_json::from_value(conf).unwrap();
    CheckRegistry::builtin()
        .evaluate(resource_type, &conf, &CompiledRules::default())
        .into_iter()
        .map(|o| (o.check_id, o.result))
        .collect()
}

fn tags() -> serde_json::Value {
    json!([{
        "Environment": "dev",
        "Project": "BidOne-Integration-Demo",
        "ManagedBy": "Terraform"
    }])
}

#[test]
fn test_compliant_resources_pass_every_check() {
    let key_vault = results(
        "azurerm_key_vault",
        json!({
            "name": ["bidone-kv-dev-001"],
            "sku_name": ["standard"],
            "soft_delete_retention_days": [7],
            "tags": tags()
        }),
    );
    assert_eq!(key_vault.len(), 3);
    assert!(key_vault.iter().all(|(_, r)| *r == CheckResult::Passed));

    let storage = results(
        "azurerm_storage_account",
        json!({
            "name": ["bidonestdev001"],
            "account_tier": ["Standard"],
            "account_replication_type": ["GRS"],
            "enable_https_traffic_only": [true],
            "tags": tags()
        }),
    );
    assert!(storage.iter().all(|(_, r)| *r == CheckResult::Passed));

    let database = results(
        "azurerm_mssql_database",
        json!({
            "short_term_retention_policy": [{"retention_days": [7]}],
            "tags": tags()
        }),
    );
    assert_eq!(
        database,
        vec![
            ("CKV_AZURE_BIDONE_002", CheckResult::Passed),
            ("CKV_AZURE_BIDONE_003", CheckResult::Passed),
        ]
    );
}

#[test]
fn test_backup_retention_boundary() {
    let six = results(
        "azurerm_mssql_database",
        json!({"short_term_retention_policy": [{"retention_days": [6]}], "tags": tags()}),
    );
    assert!(six.contains(&("CKV_AZURE_BIDONE_003", CheckResult::Failed)));

    let seven = results(
        "azurerm_mssql_database",
        json!({"short_term_retention_policy": [{"retention_days": [7]}], "tags": tags()}),
    );
    assert!(seven.contains(&("CKV_AZURE_BIDONE_003", CheckResult::Passed)));
}

#[test]
fn test_missing_tags_fail_but_missing_name_passes() {
    let outcome = results("azurerm_redis_cache", json!({}));
    assert_eq!(
        outcome,
        vec![
            ("CKV_AZURE_BIDONE_001", CheckResult::Passed),
            ("CKV_AZURE_BIDONE_002", CheckResult::Failed),
        ]
    );
}

#[test]
fn test_wrong_project_always_fails() {
    let outcome = results(
        "azurerm_log_analytics_workspace",
        json!({"tags": [{"Environment": "prod", "Project": "Other", "ManagedBy": "Bicep", "Owner": "ops"}]}),
    );
    assert_eq!(outcome, vec![("CKV_AZURE_BIDONE_002", CheckResult::Failed)]);
}

#[test]
fn test_storage_partial_configuration() {
    let premium = results("azurerm_storage_account", json!({"account_tier": ["Premium"]}));
    assert!(premium.contains(&("CKV_AZURE_BIDONE_004", CheckResult::Failed)));

    let partial = results("azurerm_storage_account", json!({"account_tier": ["Standard"]}));
    assert!(partial.contains(&("CKV_AZURE_BIDONE_004", CheckResult::Passed)));
}

#[test]
fn test_key_vault_soft_delete() {
    let absent = results("azurerm_key_vault", json!({"sku_name": ["standard"]}));
    assert!(absent.contains(&("CKV_AZURE_BIDONE_005", CheckResult::Failed)));

    let present = results(
        "azurerm_key_vault",
        json!({"soft_delete_retention_days": [7], "sku_name": ["standard"]}),
    );
    assert!(present.contains(&("CKV_AZURE_BIDONE_005", CheckResult::Passed)));
}

#[test]
fn test_alternate_thresholds() {
    let rules = CompiledRules::from_yaml(
        r#"
security:
  min_backup_retention_days: 14
"#,
    )
    .unwrap();
    let conf: ResourceConf = serde_json::from_value(
        json!({"short_term_retention_policy": [{"retention_days": [7]}]}),
    )
    .unwrap();
    let outcomes = CheckRegistry::builtin().evaluate("azurerm_mssql_database", &conf, &rules);
    let backup = outcomes
        .iter()
        .find(|o| o.check_id == "CKV_AZURE_BIDONE_003")
        .unwrap();
    assert_eq!(backup.result, CheckResult::Failed);
}

#[test]
fn test_plan_evaluation() {
    let plan = Plan::from_json(
        r#"{
  "resources": [
    {"type": "azurerm_key_vault", "name": "vault", "config": {"name": ["bidone-kv-dev-001"]}},
    {"type": "azurerm_storage_account", "name": "orders",
     "config": {"name": ["bidonestdev001"], "tags": [{"Environment": "dev", "Project": "BidOne-Integration-Demo", "ManagedBy": "Terraform"}]}}
  ]
}"#,
    )
    .unwrap();

    let results = plan.evaluate(&CheckRegistry::builtin(), &CompiledRules::default(), &[]);
    let failed: Vec<_> = results[0].failed().map(|o| o.check_id).collect();
    assert_eq!(failed, vec!["CKV_AZURE_BIDONE_002", "CKV_AZURE_BIDONE_005"]);
    assert_eq!(results[1].failed().count(), 0);
}
