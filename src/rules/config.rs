// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rules::compiled::RuleSetError;

/// Root configuration structure for rule set YAML files.
///
/// Every section falls back to the built-in project conventions, so a file
/// only needs to list what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleSet {
    pub version: String,
    /// Tag keys every taggable resource must carry
    pub required_tags: Vec<String>,
    /// Literal value the `Project` tag must hold
    pub expected_project: String,
    /// Accepted `ManagedBy` values (reported in guidelines)
    pub managed_by_values: Vec<String>,
    /// Accepted `Environment` values (reported in guidelines)
    pub environment_values: Vec<String>,
    pub naming: NamingRules,
    pub tags: TagRules,
    pub security: SecurityRules,
}

/// Naming convention section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NamingRules {
    /// Placeholder names that are never descriptive enough
    pub generic_names: Vec<String>,
    pub terraform_resource_pattern: String,
    pub bicep_resource_pattern: String,
    /// project-service-environment-suffix
    pub azure_name_pattern: String,
    pub storage_name_pattern: String,
    /// Variable-name substring that selects the storage naming pattern
    pub storage_marker: String,
    /// Resource types that use the storage naming pattern
    pub storage_resource_types: Vec<String>,
    /// Fail resources that have no `name` attribute at all
    pub require_name: bool,
}

/// Tagging convention section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TagRules {
    /// Resource-type substrings that never need tags
    pub exempt_resource_types: Vec<String>,
}

/// Security configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityRules {
    pub min_backup_retention_days: i64,
    pub storage_account_tier: String,
    pub storage_replication_types: Vec<String>,
    pub min_soft_delete_retention_days: i64,
    pub key_vault_skus: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            required_tags: strings(&["Environment", "Project", "ManagedBy"]),
            expected_project: "BidOne-Integration-Demo".to_string(),
            managed_by_values: strings(&["Terraform", "Bicep", "ARM"]),
            environment_values: strings(&["dev", "staging", "prod"]),
            naming: NamingRules::default(),
            tags: TagRules::default(),
            security: SecurityRules::default(),
        }
    }
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            generic_names: strings(&["main", "this", "example", "test"]),
            terraform_resource_pattern: r"^[a-z0-9_]+$".to_string(),
            bicep_resource_pattern: r"^[a-z][a-zA-Z0-9]*$".to_string(),
            azure_name_pattern: r"^[a-zA-Z0-9]+-[a-zA-Z0-9]+-[a-zA-Z0-9]+-[a-zA-Z0-9]+$"
                .to_string(),
            storage_name_pattern: r"^[a-z0-9]{3,24}$".to_string(),
            storage_marker: "storage".to_string(),
            storage_resource_types: strings(&["azurerm_storage_account"]),
            require_name: false,
        }
    }
}

impl Default for TagRules {
    fn default() -> Self {
        Self {
            exempt_resource_types: strings(&[
                "azurerm_resource_group",
                "random_",
                "data.",
                "Microsoft.Resources/resourceGroups",
            ]),
        }
    }
}

impl Default for SecurityRules {
    fn default() -> Self {
        Self {
            min_backup_retention_days: 7,
            storage_account_tier: "Standard".to_string(),
            storage_replication_types: strings(&["LRS", "GRS", "RAGRS", "ZRS"]),
            min_soft_delete_retention_days: 7,
            key_vault_skus: strings(&["standard", "premium"]),
        }
    }
}

impl RuleSet {
    /// Parse a RuleSet from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Read and parse a RuleSet from a YAML file
    pub fn from_path(path: &Path) -> Result<Self, RuleSetError> {
        let yaml = fs::read_to_string(path).map_err(|source| RuleSetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_yaml(&yaml)?)
    }

    /// Serialize the RuleSet to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Whether a resource type is exempt from tagging
    pub fn is_tag_exempt(&self, resource_type: &str) -> bool {
        self.tags
            .exempt_resource_types
            .iter()
            .any(|skip| resource_type.contains(skip.as_str()))
    }

    /// Whether a resource name is a generic placeholder
    pub fn is_generic_name(&self, name: &str) -> bool {
        self.naming.generic_names.iter().any(|g| g == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_set() {
        let rules = RuleSet::default();
        assert_eq!(rules.required_tags, vec!["Environment", "Project", "ManagedBy"]);
        assert_eq!(rules.expected_project, "BidOne-Integration-Demo");
        assert_eq!(rules.security.min_backup_retention_days, 7);
        assert!(!rules.naming.require_name);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
expected_project: "Other-Project"
security:
  min_backup_retention_days: 14
"#;
        let rules = RuleSet::from_yaml(yaml).unwrap();
        assert_eq!(rules.expected_project, "Other-Project");
        assert_eq!(rules.security.min_backup_retention_days, 14);
        assert_eq!(rules.security.min_soft_delete_retention_days, 7);
        assert_eq!(rules.required_tags.len(), 3);
        assert_eq!(rules.naming.generic_names.len(), 4);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let rules = RuleSet::from_yaml("{}").unwrap();
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(RuleSet::from_yaml("required_tags: 12").is_err());
    }

    #[test]
    fn test_roundtrip_yaml() {
        let rules = RuleSet::default();
        let yaml_out = rules.to_yaml().unwrap();
        assert_eq!(RuleSet::from_yaml(&yaml_out).unwrap(), rules);
    }

    #[test]
    fn test_tag_exemptions_match_substrings() {
        let rules = RuleSet::default();
        assert!(rules.is_tag_exempt("azurerm_resource_group"));
        assert!(rules.is_tag_exempt("random_string"));
        assert!(rules.is_tag_exempt("Microsoft.Resources/resourceGroups@2021-04-01"));
        assert!(!rules.is_tag_exempt("azurerm_key_vault"));
    }

    #[test]
    fn test_generic_names() {
        let rules = RuleSet::default();
        assert!(rules.is_generic_name("this"));
        assert!(!rules.is_generic_name("this_vault"));
    }

    #[test]
    fn test_from_missing_path() {
        let err = RuleSet::from_path(Path::new("/nonexistent/rules.yaml")).unwrap_err();
        assert!(matches!(err, RuleSetError::Io { .. }));
    }
}
