// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::rules::{is_interpolated, CompiledRules, Finding, FindingKind};
use crate::scan::syntax::{declarations, SourceSyntax};
use crate::scan::{ReportText, RuleEngine};

static NAME_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+_name)\s*=\s*"([^"]+)""#).expect("name assignment pattern")
});

/// Naming convention rules over resource identifiers and name-bearing values
#[derive(Debug, Clone, Copy)]
pub struct NamingRuleEngine<'a> {
    rules: &'a CompiledRules,
}

impl<'a> NamingRuleEngine<'a> {
    pub fn new(rules: &'a CompiledRules) -> Self {
        Self { rules }
    }

    fn check_declarations(
        &self,
        syntax: SourceSyntax,
        content: &str,
        findings: &mut Vec<Finding>,
    ) {
        let (prefix, casing) = match syntax {
            SourceSyntax::Terraform => ("Resource", "snake_case"),
            SourceSyntax::Bicep => ("Bicep resource", "camelCase"),
        };

        for declaration in declarations(syntax, content) {
            let name = declaration.resource_name;
            debug!(resource = %declaration.address(), "checking resource name");

            let well_cased = match syntax {
                SourceSyntax::Terraform => self.rules.is_terraform_resource_name(name),
                SourceSyntax::Bicep => self.rules.is_bicep_resource_name(name),
            };
            if !well_cased {
                findings.push(Finding::new(
                    FindingKind::ResourceNaming,
                    name,
                    format!("{prefix} '{name}' should use {casing} naming"),
                ));
            }

            if self.rules.rules().is_generic_name(name) {
                findings.push(Finding::new(
                    FindingKind::GenericName,
                    name,
                    format!("{prefix} '{name}' should have a more descriptive name"),
                ));
            }
        }
    }

    fn check_name_values(&self, content: &str, findings: &mut Vec<Finding>) {
        let storage_marker = self.rules.rules().naming.storage_marker.as_str();

        for caps in NAME_ASSIGNMENT.captures_iter(content) {
            let (Some(var_name), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let (var_name, value) = (var_name.as_str(), value.as_str());

            if is_interpolated(value) || self.rules.is_azure_name(value) {
                continue;
            }

            if !storage_marker.is_empty() && var_name.contains(storage_marker) {
                if !self.rules.is_storage_name(value) {
                    findings.push(Finding::new(
                        FindingKind::NameValue,
                        var_name,
                        format!(
                            "Storage account name '{value}' should be lowercase alphanumeric (3-24 characters)"
                        ),
                    ));
                }
                continue;
            }

            // Single lowercase tokens such as `sku_name = "standard"` are
            // attribute values, not resource names.
            if self.rules.is_storage_name(value) {
                continue;
            }

            findings.push(Finding::new(
                FindingKind::NameValue,
                var_name,
                format!(
                    "Resource name '{value}' should follow pattern: project-service-environment-suffix"
                ),
            ));
        }
    }
}

impl RuleEngine for NamingRuleEngine<'_> {
    fn check_source(&self, syntax: SourceSyntax, _file_name: &str, content: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.check_declarations(syntax, content, &mut findings);
        if syntax == SourceSyntax::Terraform {
            self.check_name_values(content, &mut findings);
        }
        findings
    }

    fn text(&self) -> ReportText {
        ReportText {
            checking: "naming conventions",
            clean: "naming",
            total: "naming convention",
            success: "All naming conventions are correct!",
        }
    }

    fn guidelines(&self) -> Vec<String> {
        let names = self
            .rules
            .rules()
            .naming
            .generic_names
            .iter()
            .map(|n| format!("'{n}'"))
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            "Naming Convention Guidelines:".to_string(),
            "- Terraform resources: use snake_case for resource names".to_string(),
            "- Bicep resources: use camelCase for resource names".to_string(),
            "- Azure resource names: use pattern project-service-environment-suffix".to_string(),
            "- Storage accounts: use lowercase alphanumeric only (no hyphens)".to_string(),
            format!("- Use descriptive names, avoid generic names like {names}"),
        ]
    }
}
