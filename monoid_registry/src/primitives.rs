/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Built-in structures: Integer, Sequence, Set.

use std::collections::BTreeSet;

use crate::error::CombineError;
use crate::registry::Registry;
use crate::structure::MonoidStructure;
use crate::value::Value;

// Integer: combine = +

/// Integers under addition.
///
/// - `combine = x + y` (wrapping at the `i64` bounds)
/// - `zero = 0`
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerMonoid;

impl MonoidStructure for IntegerMonoid {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn zero(&self) -> Value {
        Value::Int(0)
    }

    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError> {
        match (x, y) {
            (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x.wrapping_add(y))),
            (x, y) => Err(registry.mismatch(&x, &y)),
        }
    }

    fn is_non_zero(&self, value: &Value) -> bool {
        !matches!(value, Value::Int(0))
    }
}

// Sequence: combine = concatenation

/// Sequences under concatenation.
///
/// - `combine = x ++ y` (x's elements first)
/// - `zero = []`
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceMonoid;

impl MonoidStructure for SequenceMonoid {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn zero(&self) -> Value {
        Value::Seq(Vec::new())
    }

    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError> {
        match (x, y) {
            (Value::Seq(mut x), Value::Seq(y)) => {
                x.extend(y);
                Ok(Value::Seq(x))
            }
            (x, y) => Err(registry.mismatch(&x, &y)),
        }
    }
}

// Set: combine = union

/// Sets under union.
///
/// - `combine = x ∪ y`
/// - `zero = ∅`
#[derive(Clone, Copy, Debug, Default)]
pub struct SetMonoid;

impl MonoidStructure for SetMonoid {
    fn name(&self) -> &'static str {
        "set"
    }

    fn zero(&self) -> Value {
        Value::Set(BTreeSet::new())
    }

    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError> {
        match (x, y) {
            (Value::Set(x), Value::Set(y)) => {
                // Insert the smaller side into the larger.
                let (mut into, from) = if x.len() >= y.len() { (x, y) } else { (y, x) };
                into.extend(from);
                Ok(Value::Set(into))
            }
            (x, y) => Err(registry.mismatch(&x, &y)),
        }
    }
}
