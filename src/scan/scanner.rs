// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::rules::Finding;
use crate::scan::{RuleEngine, ScanError, SourceSyntax};

/// Directory searched for `.tf` files when no paths are given
pub const DEFAULT_TERRAFORM_ROOT: &str = "infra/terraform";
/// Directory searched for `.bicep` files when no paths are given
pub const DEFAULT_BICEP_ROOT: &str = "infra/bicep";

/// Findings for one scanned file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
}

/// Result of scanning a list of files with one engine
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
}

impl ScanReport {
    pub fn total_findings(&self) -> usize {
        self.files.iter().map(|f| f.findings.len()).sum()
    }

    /// True when no file produced a finding
    pub fn passed(&self) -> bool {
        self.total_findings() == 0
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.iter().flat_map(|f| f.findings.iter())
    }
}

/// Files under the default roots below `base_dir`, Terraform first
pub fn discover(base_dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let base = glob::Pattern::escape(&base_dir.to_string_lossy());
    let mut paths = Vec::new();
    for (root, extension) in [(DEFAULT_TERRAFORM_ROOT, "tf"), (DEFAULT_BICEP_ROOT, "bicep")] {
        let pattern = format!("{base}/{root}/**/*.{extension}");
        for entry in glob::glob(&pattern)? {
            paths.push(entry?);
        }
    }
    debug!(count = paths.len(), base = %base_dir.display(), "discovered source files");
    Ok(paths)
}

/// Runs one rule engine over a list of files
#[derive(Debug)]
pub struct Scanner<E> {
    engine: E,
}

impl<E: RuleEngine> Scanner<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Scan the given files. Missing paths and unknown extensions are skipped.
    pub fn scan(&self, paths: &[PathBuf]) -> Result<ScanReport, ScanError> {
        let mut report = ScanReport::default();

        for path in paths {
            if !path.exists() {
                debug!(path = %path.display(), "skipping missing path");
                continue;
            }
            if SourceSyntax::from_path(path).is_none() {
                debug!(path = %path.display(), "skipping unsupported file type");
                continue;
            }

            let findings = self.engine.check_file(path)?;
            debug!(path = %path.display(), findings = findings.len(), "scanned file");
            report.files.push(FileReport {
                path: path.clone(),
                findings,
            });
        }

        info!(
            files = report.files.len(),
            findings = report.total_findings(),
            "scan complete"
        );
        Ok(report)
    }

    /// Human-readable report: per-file progress, total and guidelines
    pub fn write_report(&self, report: &ScanReport, out: &mut dyn Write) -> io::Result<()> {
        let text = self.engine.text();

        for file in &report.files {
            let path = file.path.display();
            writeln!(out, "Checking {} in: {path}", text.checking)?;
            if file.findings.is_empty() {
                writeln!(out, "  ✓ No {} issues found", text.clean)?;
            } else {
                writeln!(out, "  Issues found in {path}:")?;
                for finding in &file.findings {
                    writeln!(out, "    - {finding}")?;
                }
            }
        }

        if report.passed() {
            writeln!(out, "\n✓ {}", text.success)?;
        } else {
            writeln!(out, "\nTotal {} issues: {}\n", text.total, report.total_findings())?;
            for line in self.engine.guidelines() {
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }
}
