// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures raised by the domain types and the row importers.
#[derive(Debug, Error)]
pub enum SitebookError {
    /// A string did not name any variant of a closed enum.
    #[error("Unknown {kind} '{value}', expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("Completion must be between 0 and 100, got {0}")]
    CompletionOutOfRange(i64),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    /// A row from the hosted store or an import file failed validation.
    #[error("Rejected {table} row '{id}': {reason}")]
    RejectedRow {
        table: &'static str,
        id: String,
        reason: String,
    },
}

impl SitebookError {
    pub fn rejected(table: &'static str, id: impl Into<String>, reason: impl ToString) -> Self {
        SitebookError::RejectedRow {
            table,
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}
