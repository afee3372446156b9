// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::rules::{is_interpolated, CompiledRules, Finding, FindingKind, ProjectTag};
use crate::scan::syntax::{blocks, ResourceDeclaration, SourceSyntax, BLOCK_BODY};
use crate::scan::{ReportText, RuleEngine};

/// File whose `tags` variable default is checked
pub const VARIABLES_FILE: &str = "variables.tf";

static TERRAFORM_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"tags\s*=\s*(\{[^}]*\}|\$\{[^}]*\})").expect("terraform tags pattern")
});

static BICEP_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tags:\s*\{([^}]*)\}").expect("bicep tags pattern"));

static TAGS_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"variable\s+"tags"\s*{BLOCK_BODY}"#)).expect("tags variable pattern")
});

static VARIABLE_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"default\s*=\s*\{([^}]*)\}").expect("default pattern"));

/// Body markers meaning tags may come from a variable or expression
const REFERENCE_MARKERS: [&str; 3] = ["${", "var.", "local."];

/// Tagging convention rules over resource blocks and the shared `tags` variable
#[derive(Debug, Clone, Copy)]
pub struct TagRuleEngine<'a> {
    rules: &'a CompiledRules,
}

impl<'a> TagRuleEngine<'a> {
    pub fn new(rules: &'a CompiledRules) -> Self {
        Self { rules }
    }

    fn check_terraform_block(
        &self,
        declaration: &ResourceDeclaration<'_>,
        findings: &mut Vec<Finding>,
    ) {
        let body = declaration.body.unwrap_or_default();
        let address = declaration.address();

        if !body.contains("tags") && !is_interpolated(body) {
            findings.push(Finding::new(
                FindingKind::MissingTags,
                &address,
                format!("Resource '{address}' is missing tags block"),
            ));
            return;
        }

        let Some(block) = TERRAFORM_TAGS.captures(body).and_then(|c| c.get(1)) else {
            if REFERENCE_MARKERS.iter().any(|m| body.contains(m)) {
                debug!(resource = %address, "tags set by reference, skipping");
                return;
            }
            findings.push(Finding::new(
                FindingKind::MissingTagsDefinition,
                &address,
                format!("Resource '{address}' is missing tags definition"),
            ));
            return;
        };
        let block = block.as_str();

        if !block.starts_with("${") {
            for tag in self.rules.missing_tags_in_text(block) {
                findings.push(Finding::new(
                    FindingKind::MissingRequiredTag,
                    &address,
                    format!("Resource '{address}' is missing required tag: {tag}"),
                ));
            }
        }

        self.check_project(block, &address, &format!("Resource '{address}'"), findings);
    }

    fn check_bicep_block(
        &self,
        declaration: &ResourceDeclaration<'_>,
        findings: &mut Vec<Finding>,
    ) {
        let body = declaration.body.unwrap_or_default();
        let name = declaration.resource_name;

        if !body.contains("tags:") && !body.contains("tags =") {
            findings.push(Finding::new(
                FindingKind::MissingTags,
                name,
                format!(
                    "Bicep resource '{name}' ({}) is missing tags property",
                    declaration.resource_type
                ),
            ));
            return;
        }

        let Some(block) = BICEP_TAGS.captures(body).and_then(|c| c.get(1)) else {
            debug!(resource = %name, "tags set by parameter or variable, skipping");
            return;
        };
        let block = block.as_str();

        for tag in self.rules.missing_tags_in_text(block) {
            findings.push(Finding::new(
                FindingKind::MissingRequiredTag,
                name,
                format!("Bicep resource '{name}' is missing required tag: {tag}"),
            ));
        }

        self.check_project(block, name, &format!("Bicep resource '{name}'"), findings);
    }

    fn check_project(&self, block: &str, subject: &str, label: &str, findings: &mut Vec<Finding>) {
        if let ProjectTag::Literal(value) = self.rules.project_tag_in_text(block) {
            if !self.rules.is_expected_project(&value) {
                findings.push(Finding::new(
                    FindingKind::IncorrectProjectTag,
                    subject,
                    format!("{label} has incorrect Project tag value"),
                ));
            }
        }
    }

    /// Required keys missing from the `tags` variable's default value
    pub fn check_tags_variable(&self, content: &str) -> Vec<Finding> {
        let Some(variable) = TAGS_VARIABLE.captures(content).and_then(|c| c.get(1)) else {
            return Vec::new();
        };
        let Some(default) = VARIABLE_DEFAULT
            .captures(variable.as_str())
            .and_then(|c| c.get(1))
        else {
            return Vec::new();
        };

        self.rules
            .missing_tags_in_text(default.as_str())
            .into_iter()
            .map(|tag| {
                Finding::new(
                    FindingKind::TagsVariableDefault,
                    "var.tags",
                    format!("Variable 'tags' default is missing required tag: {tag}"),
                )
            })
            .collect()
    }
}

impl RuleEngine for TagRuleEngine<'_> {
    fn check_source(&self, syntax: SourceSyntax, file_name: &str, content: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for declaration in blocks(syntax, content) {
            if self.rules.rules().is_tag_exempt(declaration.resource_type) {
                debug!(resource = %declaration.address(), "resource type exempt from tagging");
                continue;
            }
            match syntax {
                SourceSyntax::Terraform => self.check_terraform_block(&declaration, &mut findings),
                SourceSyntax::Bicep => self.check_bicep_block(&declaration, &mut findings),
            }
        }

        if syntax == SourceSyntax::Terraform && file_name == VARIABLES_FILE {
            findings.extend(self.check_tags_variable(content));
        }

        findings
    }

    fn text(&self) -> ReportText {
        ReportText {
            checking: "tags",
            clean: "tag",
            total: "tag validation",
            success: "All tag validations passed!",
        }
    }

    fn guidelines(&self) -> Vec<String> {
        let rules = self.rules.rules();
        vec![
            format!("Required tags: {}", rules.required_tags.join(", ")),
            String::new(),
            "Tag Guidelines:".to_string(),
            "- All Azure resources must have the required tags".to_string(),
            format!("- Project tag must be '{}'", rules.expected_project),
            format!(
                "- ManagedBy tag should indicate the IaC tool used ({})",
                rules.managed_by_values.join(", ")
            ),
            format!(
                "- Environment tag should be one of: {}",
                rules.environment_values.join(", ")
            ),
        ]
    }
}
