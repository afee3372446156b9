// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::rules::config::RuleSet;

/// Marker that makes a literal value indeterminate
pub const INTERPOLATION_MARKER: &str = "${";

static PROJECT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bProject["']?\s*[=:]\s*(?:"([^"]*)"|'([^']*)'|([^\s,}]+))"#)
        .expect("project tag pattern is valid")
});

/// Errors that can occur while loading or compiling a rule set
#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("Failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid pattern for {field}: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Whether a literal value is an interpolation whose result is unknown here
pub fn is_interpolated(value: &str) -> bool {
    value.contains(INTERPOLATION_MARKER)
}

/// What a tag block says about the `Project` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectTag {
    Absent,
    Literal(String),
    /// Variable or interpolated value, cannot be judged
    Reference,
}

/// A rule set with its patterns compiled, shared by every scanner and check
#[derive(Debug, Clone)]
pub struct CompiledRules {
    rules: RuleSet,
    terraform_resource: Regex,
    bicep_resource: Regex,
    azure_name: Regex,
    storage_name: Regex,
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, RuleSetError> {
    Regex::new(pattern).map_err(|source| RuleSetError::InvalidPattern { field, source })
}

impl CompiledRules {
    /// Compile every configurable pattern of the rule set
    pub fn new(rules: RuleSet) -> Result<Self, RuleSetError> {
        let naming = &rules.naming;
        Ok(Self {
            terraform_resource: compile(
                "naming.terraform_resource_pattern",
                &naming.terraform_resource_pattern,
            )?,
            bicep_resource: compile(
                "naming.bicep_resource_pattern",
                &naming.bicep_resource_pattern,
            )?,
            azure_name: compile("naming.azure_name_pattern", &naming.azure_name_pattern)?,
            storage_name: compile("naming.storage_name_pattern", &naming.storage_name_pattern)?,
            rules,
        })
    }

    /// Load, then compile, a rule set from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, RuleSetError> {
        Self::new(RuleSet::from_yaml(yaml)?)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn is_terraform_resource_name(&self, name: &str) -> bool {
        self.terraform_resource.is_match(name)
    }

    pub fn is_bicep_resource_name(&self, name: &str) -> bool {
        self.bicep_resource.is_match(name)
    }

    /// project-service-environment-suffix
    pub fn is_azure_name(&self, value: &str) -> bool {
        self.azure_name.is_match(value)
    }

    pub fn is_storage_name(&self, value: &str) -> bool {
        self.storage_name.is_match(value)
    }

    /// Whether a resource type takes the storage naming pattern
    pub fn uses_storage_naming(&self, resource_type: &str) -> bool {
        self.rules
            .naming
            .storage_resource_types
            .iter()
            .any(|t| t == resource_type)
    }

    /// Required tags whose key text does not appear anywhere in `text`
    pub fn missing_tags_in_text<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.rules
            .required_tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !text.contains(tag))
            .collect()
    }

    /// Inspect the `Project` key of a literal tag block
    pub fn project_tag_in_text(&self, text: &str) -> ProjectTag {
        let Some(caps) = PROJECT_TAG.captures(text) else {
            return ProjectTag::Absent;
        };
        match caps.get(1).or_else(|| caps.get(2)) {
            Some(value) if !is_interpolated(value.as_str()) => {
                ProjectTag::Literal(value.as_str().to_string())
            }
            _ => ProjectTag::Reference,
        }
    }

    pub fn is_expected_project(&self, value: &str) -> bool {
        value == self.rules.expected_project
    }
}

impl Default for CompiledRules {
    fn default() -> Self {
        Self::new(RuleSet::default()).expect("built-in rule set compiles")
    }
}
