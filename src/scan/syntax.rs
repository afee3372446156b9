// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Resource declaration extraction for Terraform and Bicep sources.
//!
//! Extraction is a single regex pass. Block bodies must balance their
//! braces and may nest them two levels deep (`site_config { cors { } }`, or
//! `${...}` inside a nested map). A block nested deeper is not extracted.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TERRAFORM_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"resource\s+"([^"]+)"\s+"([^"]+)"\s*\{"#).expect("terraform header pattern")
});

static BICEP_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"resource\s+(\w+)\s+'([^']+)'\s*=").expect("bicep header pattern")
});

/// Balanced block body, inner braces allowed two levels deep
pub(crate) const BLOCK_BODY: &str = r"\{((?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*)\}";

static TERRAFORM_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"resource\s+"([^"]+)"\s+"([^"]+)"\s*{BLOCK_BODY}"#))
        .expect("terraform block pattern")
});

static BICEP_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"resource\s+(\w+)\s+'([^']+)'\s*=\s*{BLOCK_BODY}"))
        .expect("bicep block pattern")
});

/// Source syntax, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSyntax {
    Terraform,
    Bicep,
}

impl SourceSyntax {
    /// `.tf` or `.bicep`; anything else is not scanned
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tf") => Some(SourceSyntax::Terraform),
            Some("bicep") => Some(SourceSyntax::Bicep),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SourceSyntax::Terraform => "tf",
            SourceSyntax::Bicep => "bicep",
        }
    }
}

/// One `resource` declaration found in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDeclaration<'a> {
    pub syntax: SourceSyntax,
    pub resource_type: &'a str,
    pub resource_name: &'a str,
    /// Block text between the outer braces, when extracted with bodies
    pub body: Option<&'a str>,
}

impl ResourceDeclaration<'_> {
    /// `type.name` for Terraform, bare name for Bicep
    pub fn address(&self) -> String {
        match self.syntax {
            SourceSyntax::Terraform => format!("{}.{}", self.resource_type, self.resource_name),
            SourceSyntax::Bicep => self.resource_name.to_string(),
        }
    }
}

/// Resource headers in source order, without bodies
pub fn declarations(syntax: SourceSyntax, content: &str) -> Vec<ResourceDeclaration<'_>> {
    let pattern = match syntax {
        SourceSyntax::Terraform => &*TERRAFORM_HEADER,
        SourceSyntax::Bicep => &*BICEP_HEADER,
    };
    collect(syntax, pattern, content, false)
}

/// Resource blocks in source order, with their bodies
pub fn blocks(syntax: SourceSyntax, content: &str) -> Vec<ResourceDeclaration<'_>> {
    let pattern = match syntax {
        SourceSyntax::Terraform => &*TERRAFORM_BLOCK,
        SourceSyntax::Bicep => &*BICEP_BLOCK,
    };
    collect(syntax, pattern, content, true)
}

fn collect<'a>(
    syntax: SourceSyntax,
    pattern: &Regex,
    content: &'a str,
    with_body: bool,
) -> Vec<ResourceDeclaration<'a>> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| {
            let first = caps.get(1)?.as_str();
            let second = caps.get(2)?.as_str();
            // Terraform declares type then name, Bicep name then type.
            let (resource_type, resource_name) = match syntax {
                SourceSyntax::Terraform => (first, second),
                SourceSyntax::Bicep => (second, first),
            };
            let body = if with_body {
                Some(caps.get(3)?.as_str())
            } else {
                None
            };
            Some(ResourceDeclaration {
                syntax,
                resource_type,
                resource_name,
                body,
            })
        })
        .collect()
}
