// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Text scanners for Terraform and Bicep sources.
//!
//! Both engines read a whole file, extract resource declarations with a
//! regex and report findings. Values they cannot judge (interpolations,
//! variable references) are skipped rather than flagged.

pub mod naming;
pub mod scanner;
pub mod syntax;
pub mod tags;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::rules::Finding;

pub use naming::NamingRuleEngine;
pub use scanner::{discover, FileReport, ScanReport, Scanner};
pub use syntax::{ResourceDeclaration, SourceSyntax};
pub use tags::TagRuleEngine;

/// Errors that can occur while scanning source files
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] glob::GlobError),
}

/// Wording an engine uses in progress and summary output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportText {
    /// "Checking <checking> in: <path>"
    pub checking: &'static str,
    /// "No <clean> issues found"
    pub clean: &'static str,
    /// "Total <total> issues: <n>"
    pub total: &'static str,
    pub success: &'static str,
}

/// A rule engine over Terraform/Bicep source text
pub trait RuleEngine {
    /// Check already-read source text; `file_name` is the path's final component
    fn check_source(&self, syntax: SourceSyntax, file_name: &str, content: &str) -> Vec<Finding>;

    fn text(&self) -> ReportText;

    /// Guideline lines printed after a failing summary
    fn guidelines(&self) -> Vec<String>;

    /// Read and check one file. Files of an unknown syntax yield no findings.
    fn check_file(&self, path: &Path) -> Result<Vec<Finding>, ScanError> {
        let Some(syntax) = SourceSyntax::from_path(path) else {
            return Ok(Vec::new());
        };
        let content = fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        Ok(self.check_source(syntax, &file_name, &content))
    }
}
