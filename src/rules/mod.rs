// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
pub mod compiled;
pub mod config;
pub mod finding;

pub use compiled::{is_interpolated, CompiledRules, ProjectTag, RuleSetError};
pub use config::{NamingRules, RuleSet, SecurityRules, TagRules};
pub use finding::{Finding, FindingKind};
