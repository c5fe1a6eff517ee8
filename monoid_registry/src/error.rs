/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Errors raised while resolving and combining values.

use crate::value::TypeTag;
use crate::value::Value;

/// Failure to combine two values.
///
/// Both kinds are deterministic: retrying with the same inputs and
/// registry fails the same way. Embedded value renderings are previews
/// bounded by the registry's configured preview limit.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CombineError {
    /// No structure is registered for the value's tag.
    #[error("{tag} does not have an associated monoid: {preview}")]
    UnsupportedType {
        /// The unregistered tag.
        tag: TypeTag,
        /// Bounded rendering of the offending value.
        preview: String,
    },

    /// The two operands do not resolve to the same structure.
    #[error("cannot get monoid for\n{left}\n---and---\n{right}\nbecause they don't have the same monoid")]
    TypeMismatch {
        /// Bounded rendering of the left operand.
        left: String,
        /// Bounded rendering of the right operand.
        right: String,
    },
}

impl CombineError {
    pub(crate) fn unsupported(value: &Value, limit: usize) -> Self {
        CombineError::UnsupportedType {
            tag: value.tag().clone(),
            preview: value.preview(limit),
        }
    }

    pub(crate) fn mismatch(left: &Value, right: &Value, limit: usize) -> Self {
        CombineError::TypeMismatch {
            left: left.preview(limit),
            right: right.preview(limit),
        }
    }

    /// Is this an [`CombineError::UnsupportedType`]?
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, CombineError::UnsupportedType { .. })
    }

    /// Is this a [`CombineError::TypeMismatch`]?
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, CombineError::TypeMismatch { .. })
    }
}
