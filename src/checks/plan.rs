// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::checks::conf::ResourceConf;
use crate::checks::registry::{CheckOutcome, CheckRegistry};
use crate::rules::CompiledRules;

/// Errors that can occur while loading a resource plan
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read plan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse plan JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One resource handed to the checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub config: ResourceConf,
}

impl PlanResource {
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

/// A list of parsed resources to evaluate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub resources: Vec<PlanResource>,
}

/// Check outcomes for one plan resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceOutcome {
    pub address: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl ResourceOutcome {
    pub fn failed(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.result.is_passed())
    }
}

impl Plan {
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PlanError> {
        let json = fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Evaluate every resource; `only` restricts the run to the given check ids
    pub fn evaluate(
        &self,
        registry: &CheckRegistry,
        rules: &CompiledRules,
        only: &[String],
    ) -> Vec<ResourceOutcome> {
        self.resources
            .iter()
            .map(|resource| {
                let mut outcomes =
                    registry.evaluate(&resource.resource_type, &resource.config, rules);
                if !only.is_empty() {
                    outcomes.retain(|o| only.iter().any(|id| id == o.check_id));
                }
                debug!(
                    resource = %resource.address(),
                    checks = outcomes.len(),
                    "evaluated resource"
                );
                ResourceOutcome {
                    address: resource.address(),
                    outcomes,
                }
            })
            .collect()
    }
}
