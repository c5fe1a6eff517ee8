/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based generators for [`Value`]s of each built-in shape.
//!
//! These strategies are used in `proptest`-based tests of the monoid
//! laws. The main entry point is [`gen_sparse_map`], which generates
//! nested mappings of bounded depth whose every key has a fixed shape,
//! so that any two generated mappings can be combined.
//!
//! Generated mappings are *sparse*: no entry holds its structure's
//! zero. Sparse mappings are closed under combine and are what the
//! associativity law holds for; a mapping that stores an explicit zero
//! behaves differently from one that omits the key.
//!
//! This module is only included in test builds (`#[cfg(test)]`).

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::registry::Registry;
use crate::value::Value;

/// Any integer.
pub fn gen_int() -> impl Strategy<Value = Value> {
    any::<i64>().prop_map(Value::Int)
}

/// Small non-zero integers, chosen so that sums cancel often.
fn gen_non_zero_int() -> impl Strategy<Value = Value> {
    prop_oneof![-5i64..0, 1i64..=5].prop_map(Value::Int)
}

/// Sequences of up to `max_len` scalars (integers and short strings).
pub fn gen_seq(max_len: usize) -> impl Strategy<Value = Value> {
    let scalar = prop_oneof![
        (-20i64..20).prop_map(Value::Int),
        "[a-z]{1,3}".prop_map(Value::Str),
    ];
    prop::collection::vec(scalar, 0..=max_len).prop_map(Value::Seq)
}

/// Sets of up to `max_len` small integers.
pub fn gen_set(max_len: usize) -> impl Strategy<Value = Value> {
    prop::collection::btree_set(-10i64..10, 0..=max_len)
        .prop_map(|s| Value::Set(s.into_iter().map(Value::Int).collect()))
}

fn non_empty(v: &Value) -> bool {
    match v {
        Value::Seq(s) => !s.is_empty(),
        Value::Set(s) => !s.is_empty(),
        Value::Map(m) => !m.is_empty(),
        _ => true,
    }
}

fn entries<S>(
    keys: &'static [&'static str],
    values: S,
) -> impl Strategy<Value = Vec<(Value, Value)>>
where
    S: Strategy<Value = Value>,
{
    prop::collection::btree_map(prop::sample::select(keys), values, 0..=keys.len()).prop_map(
        |m| {
            m.into_iter()
                .map(|(k, v)| (Value::from(k), v))
                .collect::<Vec<_>>()
        },
    )
}

/// Generates a sparse mapping nested up to `depth` levels.
///
/// Keys are drawn from per-shape vocabularies (`i*` integers, `t*`
/// sets, `l*` sequences, `m*` nested mappings), so two generated
/// mappings never disagree on the shape stored under a key. When
/// `with_sequences` is false no sequences are generated, leaving only
/// commutative shapes.
pub fn gen_sparse_map(depth: u32, with_sequences: bool) -> BoxedStrategy<Value> {
    let ints = entries(&["i0", "i1", "i2"], gen_non_zero_int());
    let sets = entries(&["t0", "t1"], gen_set(3).prop_filter("non-empty", non_empty));
    let seqs = if with_sequences {
        entries(&["l0", "l1"], gen_seq(3).prop_filter("non-empty", non_empty)).boxed()
    } else {
        Just(Vec::new()).boxed()
    };
    let maps = if depth == 0 {
        Just(Vec::new()).boxed()
    } else {
        entries(
            &["m0", "m1"],
            gen_sparse_map(depth - 1, with_sequences).prop_filter("non-empty", non_empty),
        )
        .boxed()
    };

    (ints, sets, seqs, maps)
        .prop_map(|(ints, sets, seqs, maps)| {
            Value::Map(
                ints.into_iter()
                    .chain(sets)
                    .chain(seqs)
                    .chain(maps)
                    .collect::<BTreeMap<_, _>>(),
            )
        })
        .boxed()
}

/// Does `value` hold no zero entries at any depth, judged by the
/// structures in `registry`?
pub fn is_sparse(value: &Value, registry: &Registry) -> bool {
    match value {
        Value::Map(m) => m.values().all(|v| {
            registry
                .resolve(v)
                .map(|s| s.is_non_zero(v))
                .unwrap_or(true)
                && is_sparse(v, registry)
        }),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_maps_are_sparse(v in gen_sparse_map(3, true)) {
            prop_assert!(is_sparse(&v, &Registry::builtin()));
        }

        #[test]
        fn commutative_maps_hold_no_sequences(v in gen_sparse_map(2, false)) {
            fn has_seq(v: &Value) -> bool {
                match v {
                    Value::Seq(_) => true,
                    Value::Map(m) => m.values().any(has_seq),
                    _ => false,
                }
            }
            prop_assert!(!has_seq(&v));
        }
    }
}
