// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Non-fatal issues collected during import and export

use crate::config::ReferencePolicy;
use crate::error::{Result, SceneError};
use std::fmt;
use tracing::warn;

/// A recovered problem and where in the graph it happened
#[derive(Debug)]
pub struct Issue {
    /// Slash-separated path, e.g. `b/group[0]/instance[2]`
    pub location: String,
    pub error: SceneError,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.error)
    }
}

/// Issues accumulated over one pass
#[derive(Debug, Default)]
pub struct Report {
    issues: Vec<Issue>,
    log: bool,
}

impl Report {
    pub fn new(log: bool) -> Self {
        Self {
            issues: Vec::new(),
            log,
        }
    }

    pub fn record(&mut self, location: impl Into<String>, error: SceneError) {
        let issue = Issue {
            location: location.into(),
            error,
        };
        if self.log {
            warn!("{}", issue);
        }
        self.issues.push(issue);
    }

    /// Record a recoverable error, or hand it back if the pass must stop
    ///
    /// Fatal errors always propagate. Unresolved and cyclic references
    /// propagate under [`ReferencePolicy::Fail`].
    pub fn absorb(
        &mut self,
        location: impl Into<String>,
        error: SceneError,
        policy: ReferencePolicy,
    ) -> Result<()> {
        let is_reference = matches!(
            error,
            SceneError::UnresolvedReference { .. } | SceneError::CyclicReference { .. }
        );
        if error.is_fatal() || (is_reference && policy == ReferencePolicy::Fail) {
            return Err(error);
        }
        self.record(location, error);
        Ok(())
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn unresolved_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i.error, SceneError::UnresolvedReference { .. }))
            .count()
    }

    pub fn malformed_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| {
                matches!(
                    i.error,
                    SceneError::MalformedEntity { .. } | SceneError::DuplicateIdentifier(_)
                )
            })
            .count()
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = Report::new(false);
        report.record(
            "b/instance[0]",
            SceneError::UnresolvedReference {
                instance: "i".into(),
                definition: "x".into(),
            },
        );
        report.record("definition[3]", SceneError::malformed("definition[3]", "no guid"));
        report.record("definition[4]", SceneError::DuplicateIdentifier("a".into()));

        assert_eq!(report.len(), 3);
        assert_eq!(report.unresolved_count(), 1);
        assert_eq!(report.malformed_count(), 2);
        assert_eq!(
            report.issues()[0].to_string(),
            "b/instance[0]: Instance 'i' references unknown definition 'x'"
        );
    }

    #[test]
    fn test_absorb_respects_policy() {
        let unresolved = || SceneError::UnresolvedReference {
            instance: "i".into(),
            definition: "x".into(),
        };

        let mut report = Report::new(false);
        assert!(report.absorb("a", unresolved(), ReferencePolicy::Skip).is_ok());
        assert!(report.absorb("b", unresolved(), ReferencePolicy::Fail).is_err());
        assert!(report
            .absorb("c", SceneError::malformed("group", "bad"), ReferencePolicy::Fail)
            .is_ok());
        assert!(report
            .absorb("d", SceneError::AllocationFailure("full".into()), ReferencePolicy::Skip)
            .is_err());
        assert_eq!(report.len(), 2);
    }
}
