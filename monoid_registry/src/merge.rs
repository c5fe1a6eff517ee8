/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The mapping structure: structural merge of key-value collections.
//!
//! Combining two mappings unions their keys. Keys present on both sides
//! are combined recursively under the caller's registry, so nested
//! mappings, sequences and sets merge all the way down:
//!
//! ```
//! use monoid_registry::Value;
//! use monoid_registry::combine;
//!
//! let x = Value::map([("a", Value::seq([1, 2])), ("b", Value::from(1))]);
//! let y = Value::map([("a", Value::seq([3]))]);
//! assert_eq!(
//!     combine(x, y).unwrap(),
//!     Value::map([("a", Value::seq([1, 2, 3])), ("b", Value::from(1))])
//! );
//! ```
//!
//! # Zero-elision
//!
//! When a colliding key combines to its structure's zero, the key is
//! dropped from the result rather than stored as zero. Merged mappings
//! therefore stay sparse:
//!
//! ```
//! use monoid_registry::Value;
//! use monoid_registry::combine;
//!
//! let merged = combine(Value::map([("k", 1)]), Value::map([("k", -1)])).unwrap();
//! assert_eq!(merged, Value::map(Vec::<(Value, Value)>::new()));
//! ```
//!
//! Keys present on one side only are carried over untouched, even when
//! their value is zero.
//!
//! # Ownership
//!
//! Both operands are moved in. The operand with more keys absorbs the
//! other and is returned; the smaller one is consumed entry by entry.

use std::collections::BTreeMap;

use crate::error::CombineError;
use crate::registry::Registry;
use crate::structure::MonoidStructure;
use crate::value::Value;

/// Mappings under recursive, zero-eliding merge.
///
/// - `combine` = key union; colliding values combined by their own
///   structure, dropped when the result is that structure's zero
/// - `zero = {}`
#[derive(Clone, Copy, Debug, Default)]
pub struct MappingMonoid;

impl MonoidStructure for MappingMonoid {
    fn name(&self) -> &'static str {
        "mapping"
    }

    fn zero(&self) -> Value {
        Value::Map(BTreeMap::new())
    }

    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError> {
        match (x, y) {
            (Value::Map(x), Value::Map(y)) => merge(x, y, registry).map(Value::Map),
            (x, y) => Err(registry.mismatch(&x, &y)),
        }
    }

    fn is_non_zero(&self, value: &Value) -> bool {
        !matches!(value, Value::Map(m) if m.is_empty())
    }
}

/// Merge mapping `y` into mapping `x` under `registry`.
///
/// The larger mapping absorbs the smaller; on equal sizes `y` absorbs
/// `x`. Colliding values are always combined in `x`-then-`y` order,
/// whichever side absorbs. A failure on any colliding key fails the
/// whole merge.
pub fn merge(
    x: BTreeMap<Value, Value>,
    y: BTreeMap<Value, Value>,
    registry: &Registry,
) -> Result<BTreeMap<Value, Value>, CombineError> {
    let (mut bigger, smaller, bigger_is_x) = if x.len() > y.len() {
        (x, y, true)
    } else {
        (y, x, false)
    };

    for (key, value) in smaller {
        let Some(existing) = bigger.remove(&key) else {
            bigger.insert(key, value);
            continue;
        };
        let (left, right) = if bigger_is_x {
            (existing, value)
        } else {
            (value, existing)
        };

        let structure = registry.resolve_pair(&left, &right)?;
        let combined = structure.combine(left, right, registry)?;
        if structure.is_non_zero(&combined) {
            bigger.insert(key, combined);
        } else if registry.config().trace_elisions {
            tracing::trace!(
                key = %key.preview(registry.config().preview_limit),
                structure = structure.name(),
                "elided zero entry"
            );
        }
    }

    Ok(bigger)
}
