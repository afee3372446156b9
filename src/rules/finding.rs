// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::Serialize;
use thiserror::Error;

/// Which rule a finding violates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Resource identifier does not match the syntax's casing pattern
    ResourceNaming,
    /// Resource identifier is a generic placeholder
    GenericName,
    /// Name-bearing variable value does not follow the Azure naming pattern
    NameValue,
    MissingTags,
    MissingTagsDefinition,
    MissingRequiredTag,
    IncorrectProjectTag,
    /// Shared `tags` variable default lacks a required key
    TagsVariableDefault,
}

impl FindingKind {
    pub fn is_naming(&self) -> bool {
        matches!(
            self,
            FindingKind::ResourceNaming | FindingKind::GenericName | FindingKind::NameValue
        )
    }
}

/// One reported rule violation
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct Finding {
    pub kind: FindingKind,
    /// Resource, variable or value the finding is about
    pub subject: String,
    pub message: String,
}

impl Finding {
    /// Create a new finding
    pub fn new(kind: FindingKind, subject: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.to_string(),
            message: message.into(),
        }
    }
}
