// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
pub mod builtin;
pub mod conf;
pub mod plan;
pub mod registry;

pub use conf::ResourceConf;
pub use plan::{Plan, PlanError, PlanResource, ResourceOutcome};
pub use registry::{Check, CheckFn, CheckOutcome, CheckRegistry, CheckResult, ResourceContext};
