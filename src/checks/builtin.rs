// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Built-in naming, tagging and security checks for Azure resources.
//!
//! Each check is a plain function over a [`ResourceContext`]. Interpolated
//! values (`${...}`) are resolved only at apply time and are not judged.

use serde_json::Value;

use crate::checks::conf::{is_truthy, unwrap_single, Number};
use crate::checks::registry::{Check, CheckResult, ResourceContext};
use crate::rules::{is_interpolated, CompiledRules};

pub const NAMING_CONVENTION: &str = "CKV_AZURE_BIDONE_001";
pub const MANDATORY_TAGS: &str = "CKV_AZURE_BIDONE_002";
pub const SQL_BACKUP: &str = "CKV_AZURE_BIDONE_003";
pub const STORAGE_SECURITY: &str = "CKV_AZURE_BIDONE_004";
pub const KEY_VAULT_SECURITY: &str = "CKV_AZURE_BIDONE_005";

const NAMED_RESOURCES: &[&str] = &[
    "azurerm_resource_group",
    "azurerm_storage_account",
    "azurerm_key_vault",
    "azurerm_sql_server",
    "azurerm_servicebus_namespace",
    "azurerm_cosmosdb_account",
    "azurerm_redis_cache",
];

const TAGGED_RESOURCES: &[&str] = &[
    "azurerm_resource_group",
    "azurerm_storage_account",
    "azurerm_key_vault",
    "azurerm_sql_server",
    "azurerm_mssql_database",
    "azurerm_servicebus_namespace",
    "azurerm_cosmosdb_account",
    "azurerm_redis_cache",
    "azurerm_application_insights",
    "azurerm_log_analytics_workspace",
];

/// The built-in checks in evaluation order
pub fn all() -> Vec<Check> {
    vec![
        Check {
            id: NAMING_CONVENTION,
            name: "Ensure Azure resources follow BidOne naming convention",
            categories: &["CONVENTION"],
            supported_resources: NAMED_RESOURCES,
            evaluate: naming_convention,
        },
        Check {
            id: MANDATORY_TAGS,
            name: "Ensure Azure resources have mandatory BidOne tags",
            categories: &["GENERAL_SECURITY"],
            supported_resources: TAGGED_RESOURCES,
            evaluate: mandatory_tags,
        },
        Check {
            id: SQL_BACKUP,
            name: "Ensure Azure SQL Database has backup configuration",
            categories: &["BACKUP"],
            supported_resources: &["azurerm_mssql_database"],
            evaluate: sql_backup_retention,
        },
        Check {
            id: STORAGE_SECURITY,
            name: "Ensure Azure Storage Account has secure BidOne configuration",
            categories: &["STORAGE"],
            supported_resources: &["azurerm_storage_account"],
            evaluate: storage_security,
        },
        Check {
            id: KEY_VAULT_SECURITY,
            name: "Ensure Azure Key Vault has secure BidOne configuration",
            categories: &["SECRETS"],
            supported_resources: &["azurerm_key_vault"],
            evaluate: key_vault_security,
        },
    ]
}

/// `name` follows the storage pattern for storage accounts and
/// project-service-environment-suffix for everything else.
pub fn naming_convention(ctx: &ResourceContext<'_>, rules: &CompiledRules) -> CheckResult {
    let Some(name) = ctx.conf.get("name") else {
        return CheckResult::from_bool(!rules.rules().naming.require_name);
    };
    let Value::String(name) = name else {
        return CheckResult::Failed;
    };
    if is_interpolated(name) {
        return CheckResult::Passed;
    }

    let matches = if rules.uses_storage_naming(ctx.resource_type) {
        rules.is_storage_name(name)
    } else {
        rules.is_azure_name(name)
    };
    CheckResult::from_bool(matches)
}

/// `tags` is a mapping with every required key and the expected `Project`.
pub fn mandatory_tags(ctx: &ResourceContext<'_>, rules: &CompiledRules) -> CheckResult {
    match ctx.conf.get("tags") {
        Some(Value::String(tags)) if is_interpolated(tags) => CheckResult::Passed,
        Some(Value::Object(tags)) => {
            let set = rules.rules();
            let has_required = set.required_tags.iter().all(|t| tags.contains_key(t));
            let project_ok = match tags.get("Project").map(unwrap_single) {
                Some(Value::String(project)) => {
                    is_interpolated(project) || rules.is_expected_project(project)
                }
                Some(_) => false,
                None => true,
            };
            CheckResult::from_bool(has_required && project_ok)
        }
        _ => CheckResult::Failed,
    }
}

/// `short_term_retention_policy.retention_days` meets the minimum.
pub fn sql_backup_retention(ctx: &ResourceContext<'_>, rules: &CompiledRules) -> CheckResult {
    let Some(Value::Object(policy)) = ctx.conf.get("short_term_retention_policy") else {
        return CheckResult::Failed;
    };
    let days = policy
        .get("retention_days")
        .map(Number::from_value)
        .unwrap_or(Number::Known(0.0));
    CheckResult::from_bool(days.at_least(rules.rules().security.min_backup_retention_days))
}

/// Only attributes that are present are validated.
pub fn storage_security(ctx: &ResourceContext<'_>, rules: &CompiledRules) -> CheckResult {
    let security = &rules.rules().security;
    let conf = ctx.conf;

    if let Some(tier) = conf.get("account_tier") {
        if !matches_literal(tier, |t| t == security.storage_account_tier) {
            return CheckResult::Failed;
        }
    }

    if let Some(replication) = conf.get("account_replication_type") {
        let allowed = |r: &str| security.storage_replication_types.iter().any(|a| a == r);
        if !matches_literal(replication, allowed) {
            return CheckResult::Failed;
        }
    }

    if let Some(https_only) = conf.get("enable_https_traffic_only") {
        if !is_truthy(https_only) {
            return CheckResult::Failed;
        }
    }

    CheckResult::Passed
}

/// Soft-delete retention is mandatory; `sku_name` is validated when present.
pub fn key_vault_security(ctx: &ResourceContext<'_>, rules: &CompiledRules) -> CheckResult {
    let security = &rules.rules().security;

    let Some(retention) = ctx.conf.get("soft_delete_retention_days") else {
        return CheckResult::Failed;
    };
    if !Number::from_value(retention).at_least(security.min_soft_delete_retention_days) {
        return CheckResult::Failed;
    }

    if let Some(sku) = ctx.conf.get("sku_name") {
        if !matches_literal(sku, |s| security.key_vault_skus.iter().any(|a| a == s)) {
            return CheckResult::Failed;
        }
    }

    CheckResult::Passed
}

/// String literal accepted by `accept`; interpolations pass, non-strings fail
fn matches_literal(value: &Value, accept: impl Fn(&str) -> bool) -> bool {
    match value {
        Value::String(s) => is_interpolated(s) || accept(s),
        _ => false,
    }
}
