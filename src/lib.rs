//! IaC Policy Engine - naming, tagging and security checks for Terraform and Bicep
//!
//! This crate provides two text scanners that read `.tf` and `.bicep` sources
//! and a registry of checks that evaluate already-parsed resource
//! configurations. All of them share one [`RuleSet`](rules::RuleSet).
//!
//! # Example
//!
//! ```rust
//! use iac_policy_engine::rules::CompiledRules;
//! use iac_policy_engine::scan::{NamingRuleEngine, RuleEngine, SourceSyntax};
//!
//! let source = r#"
//! resource "azurerm_key_vault" "OrderVault" {
//!   name = "bidone-kv-dev-001"
//! }
//! "#;
//!
//! let rules = CompiledRules::default();
//! let engine = NamingRuleEngine::new(&rules);
//! let findings = engine.check_source(SourceSyntax::Terraform, "main.tf", source);
//!
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].message, "Resource 'OrderVault' should use snake_case naming");
//! ```

pub mod checks;
pub mod config;
pub mod rules;
pub mod scan;

// Re-export commonly used types at the crate root
pub use checks::{CheckRegistry, CheckResult, ResourceConf};
pub use rules::{CompiledRules, Finding, RuleSet};
pub use scan::{NamingRuleEngine, RuleEngine, Scanner, TagRuleEngine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Evaluate one resource configuration against the built-in checks
///
/// This is a convenience function for simple use cases.
///
/// # Example
///
/// ```rust
/// use iac_policy_engine::{evaluate_resource, CheckResult};
/// use serde_json::json;
///
/// let outcomes = evaluate_resource(
///     "azurerm_key_vault",
///     json!({"soft_delete_retention_days": [7], "sku_name": ["standard"]}),
/// )
/// .unwrap();
///
/// let key_vault = outcomes.iter().find(|o| o.check_id == "CKV_AZURE_BIDONE_005").unwrap();
/// assert_eq!(key_vault.result, CheckResult::Passed);
/// ```
pub fn evaluate_resource(
    resource_type: &str,
    config: serde_json::Value,
) -> Result<Vec<checks::CheckOutcome>, serde_json::Error> {
    let conf: ResourceConf = serde_json::from_value(config)?;
    Ok(CheckRegistry::builtin().evaluate(resource_type, &conf, &CompiledRules::default()))
}
