/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Lattice structures for caller-defined tags: Max, Min, Any, All.
//!
//! These are not part of the built-in set. Each one combines
//! [`Value::Tagged`] values carrying its tag; add them to a registry
//! with [`Registry::with_lattices`].
//!
//! - `max(i)`: combine = max, zero = `max(i64::MIN)`
//! - `min(i)`: combine = min, zero = `min(i64::MAX)`
//! - `any(b)`: combine = OR, zero = `any(false)`
//! - `all(b)`: combine = AND, zero = `all(true)`
//!
//! All four are idempotent, so re-merging the same update is a no-op.
//! Inside a mapping, a lattice value that combines back to its zero is
//! elided like any other.
//!
//! # Example
//!
//! ```
//! use monoid_registry::Registry;
//! use monoid_registry::Value;
//!
//! let registry = Registry::builtin().with_lattices();
//!
//! // Per-rank low watermark.
//! let a = Value::map([("rank0", Value::tagged("min", 100))]);
//! let b = Value::map([
//!     ("rank0", Value::tagged("min", 80)),
//!     ("rank1", Value::tagged("min", 200)),
//! ]);
//! let merged = registry.combine(a, b).unwrap();
//! assert_eq!(merged.as_map().unwrap()[&Value::from("rank0")], Value::tagged("min", 80));
//! assert_eq!(merged.as_map().unwrap().len(), 2);
//! ```

use crate::error::CombineError;
use crate::registry::Registry;
use crate::structure::MonoidStructure;
use crate::value::TypeTag;
use crate::value::Value;

/// Tag for [`MaxMonoid`] values.
pub const MAX: TypeTag = TypeTag::from_static("max");
/// Tag for [`MinMonoid`] values.
pub const MIN: TypeTag = TypeTag::from_static("min");
/// Tag for [`AnyMonoid`] values.
pub const ANY: TypeTag = TypeTag::from_static("any");
/// Tag for [`AllMonoid`] values.
pub const ALL: TypeTag = TypeTag::from_static("all");

impl Registry {
    /// A copy of this registry with the [`MAX`], [`MIN`], [`ANY`] and
    /// [`ALL`] lattices added.
    pub fn with_lattices(&self) -> Registry {
        self.register(MAX, MaxMonoid)
            .register(MIN, MinMonoid)
            .register(ANY, AnyMonoid)
            .register(ALL, AllMonoid)
    }
}

/// Unwrap two tagged payloads, keeping the left tag.
fn payloads(
    x: Value,
    y: Value,
    registry: &Registry,
) -> Result<(TypeTag, Value, Value), CombineError> {
    match (x, y) {
        (Value::Tagged(tag, x), Value::Tagged(_, y)) => Ok((tag, *x, *y)),
        (x, y) => Err(registry.mismatch(&x, &y)),
    }
}

fn int_lattice(
    x: Value,
    y: Value,
    registry: &Registry,
    join: fn(i64, i64) -> i64,
) -> Result<Value, CombineError> {
    match payloads(x, y, registry)? {
        (tag, Value::Int(a), Value::Int(b)) => Ok(Value::tagged(tag, join(a, b))),
        (tag, a, b) => Err(registry.mismatch(
            &Value::tagged(tag.clone(), a),
            &Value::tagged(tag, b),
        )),
    }
}

fn bool_lattice(
    x: Value,
    y: Value,
    registry: &Registry,
    join: fn(bool, bool) -> bool,
) -> Result<Value, CombineError> {
    match payloads(x, y, registry)? {
        (tag, Value::Bool(a), Value::Bool(b)) => Ok(Value::tagged(tag, join(a, b))),
        (tag, a, b) => Err(registry.mismatch(
            &Value::tagged(tag.clone(), a),
            &Value::tagged(tag, b),
        )),
    }
}

// Max: join = max

/// Tagged integers where combine is `max`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxMonoid;

impl MonoidStructure for MaxMonoid {
    fn name(&self) -> &'static str {
        "max"
    }

    fn zero(&self) -> Value {
        Value::tagged(MAX, i64::MIN)
    }

    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError> {
        int_lattice(x, y, registry, i64::max)
    }
}

// Min: join = min

/// Tagged integers where combine is `min`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinMonoid;

impl MonoidStructure for MinMonoid {
    fn name(&self) -> &'static str {
        "min"
    }

    fn zero(&self) -> Value {
        Value::tagged(MIN, i64::MAX)
    }

    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError> {
        int_lattice(x, y, registry, i64::min)
    }
}

// Any: join = OR

/// Tagged booleans where combine is logical OR.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyMonoid;

impl MonoidStructure for AnyMonoid {
    fn name(&self) -> &'static str {
        "any"
    }

    fn zero(&self) -> Value {
        Value::tagged(ANY, false)
    }

    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError> {
        bool_lattice(x, y, registry, |a, b| a || b)
    }
}

// All: join = AND (dual order)

/// Tagged booleans where combine is logical AND.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllMonoid;

impl MonoidStructure for AllMonoid {
    fn name(&self) -> &'static str {
        "all"
    }

    fn zero(&self) -> Value {
        Value::tagged(ALL, true)
    }

    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError> {
        bool_lattice(x, y, registry, |a, b| a && b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::builtin().with_lattices()
    }

    #[test]
    fn max_combine_is_maximum() {
        let r = registry();
        assert_eq!(
            r.combine(Value::tagged(MAX, 5), Value::tagged(MAX, 10))
                .unwrap(),
            Value::tagged(MAX, 10)
        );
        assert_eq!(
            r.combine(Value::tagged(MAX, 10), Value::tagged(MAX, 5))
                .unwrap(),
            Value::tagged(MAX, 10)
        );
    }

    #[test]
    fn min_combine_is_minimum() {
        let r = registry();
        assert_eq!(
            r.combine(Value::tagged(MIN, 5), Value::tagged(MIN, 10))
                .unwrap(),
            Value::tagged(MIN, 5)
        );
    }

    #[test]
    fn any_and_all() {
        let r = registry();
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            assert_eq!(
                r.combine(Value::tagged(ANY, a), Value::tagged(ANY, b))
                    .unwrap(),
                Value::tagged(ANY, a || b)
            );
            assert_eq!(
                r.combine(Value::tagged(ALL, a), Value::tagged(ALL, b))
                    .unwrap(),
                Value::tagged(ALL, a && b)
            );
        }
    }

    #[test]
    fn zero_is_identity() {
        let r = registry();
        let cases: [(&dyn MonoidStructure, Value); 4] = [
            (&MaxMonoid, Value::tagged(MAX, 42)),
            (&MinMonoid, Value::tagged(MIN, 42)),
            (&AnyMonoid, Value::tagged(ANY, true)),
            (&AllMonoid, Value::tagged(ALL, false)),
        ];
        for (s, v) in cases {
            assert_eq!(s.combine(s.zero(), v.clone(), &r).unwrap(), v);
            assert_eq!(s.combine(v.clone(), s.zero(), &r).unwrap(), v);
        }
    }

    #[test]
    fn idempotent() {
        let r = registry();
        let v = Value::tagged(MAX, 7);
        assert_eq!(r.combine(v.clone(), v.clone()).unwrap(), v);
    }

    #[test]
    fn different_lattices_do_not_mix() {
        let r = registry();
        let err = r
            .combine(Value::tagged(MAX, 1), Value::tagged(MIN, 1))
            .unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn wrong_payload_is_a_mismatch() {
        let r = registry();
        let err = r
            .combine(Value::tagged(MAX, 1), Value::tagged(MAX, true))
            .unwrap_err();
        assert_eq!(
            err,
            CombineError::TypeMismatch {
                left: "max(1)".to_string(),
                right: "max(true)".to_string(),
            }
        );
    }

    #[test]
    fn lattices_nest_in_mappings() {
        let r = registry();
        let x = Value::map([
            ("seen", Value::tagged(ANY, false)),
            ("hi", Value::tagged(MAX, 3)),
        ]);
        let y = Value::map([
            ("seen", Value::tagged(ANY, false)),
            ("hi", Value::tagged(MAX, 9)),
        ]);
        // any(false) | any(false) is the Any zero, so "seen" is elided.
        assert_eq!(
            r.combine(x, y).unwrap(),
            Value::map([("hi", Value::tagged(MAX, 9))])
        );
    }

    #[test]
    fn lattices_are_not_builtin() {
        let err = Registry::builtin()
            .combine(Value::tagged(MAX, 1), Value::tagged(MAX, 2))
            .unwrap_err();
        assert!(err.is_unsupported_type());
    }
}
