// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for scene import and export
//!
//! Every failure the transformation core can observe is a [`SceneError`].
//! Some variants are recoverable and end up in a [`crate::io::Report`]
//! instead of aborting the pass; [`SceneError::is_fatal`] tells them apart.

use thiserror::Error;

/// Errors raised while building, reading or writing a scene graph
#[derive(Error, Debug)]
pub enum SceneError {
    /// An instance names a definition that is not part of the session.
    #[error("Instance '{instance}' references unknown definition '{definition}'")]
    UnresolvedReference {
        /// Identifier of the offending instance
        instance: String,
        /// Definition identifier that could not be resolved
        definition: String,
    },

    /// An instance places a definition whose shell is not created yet
    /// because the two are part of a reference cycle.
    #[error("Instance '{instance}' closes a reference cycle through definition '{definition}'")]
    CyclicReference {
        instance: String,
        definition: String,
    },

    /// An external entity could not yield its name, identifier or payload.
    #[error("Malformed entity {entity}: {reason}")]
    MalformedEntity { entity: String, reason: String },

    /// Two definitions claim the same identifier.
    #[error("Duplicate definition identifier: {0}")]
    DuplicateIdentifier(String),

    /// The creation collaborator could not produce a new handle.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SceneError {
    /// Build a [`SceneError::MalformedEntity`]
    pub fn malformed(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        SceneError::MalformedEntity {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts the whole pass rather than a single entity
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SceneError::AllocationFailure(_) | SceneError::Json(_) | SceneError::Io(_)
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SceneError>;
