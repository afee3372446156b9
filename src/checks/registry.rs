// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::checks::builtin;
use crate::checks::conf::ResourceConf;
use crate::rules::CompiledRules;

/// Verdict of one check on one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckResult {
    Passed,
    Failed,
}

impl CheckResult {
    pub fn from_bool(passed: bool) -> Self {
        if passed {
            CheckResult::Passed
        } else {
            CheckResult::Failed
        }
    }

    pub fn is_passed(&self) -> bool {
        *self == CheckResult::Passed
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Passed => f.write_str("PASSED"),
            CheckResult::Failed => f.write_str("FAILED"),
        }
    }
}

/// The resource a check is looking at
#[derive(Debug, Clone, Copy)]
pub struct ResourceContext<'a> {
    pub resource_type: &'a str,
    pub conf: &'a ResourceConf,
}

pub type CheckFn = fn(&ResourceContext<'_>, &CompiledRules) -> CheckResult;

/// A named predicate over resource configurations
#[derive(Debug, Clone)]
pub struct Check {
    pub id: &'static str,
    pub name: &'static str,
    pub categories: &'static [&'static str],
    pub supported_resources: &'static [&'static str],
    pub evaluate: CheckFn,
}

impl Check {
    /// Check if this check applies to the given resource type
    pub fn supports(&self, resource_type: &str) -> bool {
        self.supported_resources.iter().any(|r| *r == resource_type)
    }
}

/// Outcome of one check on one resource
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub check_id: &'static str,
    pub check_name: &'static str,
    pub result: CheckResult,
}

/// Ordered list of checks, evaluated in registration order
#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    checks: Vec<Check>,
}

impl CheckRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The five built-in naming, tagging and security checks
    pub fn builtin() -> Self {
        Self {
            checks: builtin::all(),
        }
    }

    pub fn register(&mut self, check: Check) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.id == id)
    }

    /// Checks that support a resource type
    pub fn applicable<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a Check> {
        self.checks.iter().filter(move |c| c.supports(resource_type))
    }

    /// Run every applicable check on a resource
    pub fn evaluate(
        &self,
        resource_type: &str,
        conf: &ResourceConf,
        rules: &CompiledRules,
    ) -> Vec<CheckOutcome> {
        let ctx = ResourceContext {
            resource_type,
            conf,
        };
        self.applicable(resource_type)
            .map(|check| {
                let result = (check.evaluate)(&ctx, rules);
                debug!(check = check.id, resource_type, %result, "evaluated check");
                CheckOutcome {
                    check_id: check.id,
                    check_name: check.name,
                    result,
                }
            })
            .collect()
    }
}
