/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

#![deny(missing_docs)]

//! Generic combination of heterogeneous values through a registry of
//! monoid structures.
//!
//! Aggregation code (counters, accumulators, merging partial results at a
//! reduce boundary) often needs to combine values of several shapes:
//! integers add, sequences concatenate, sets union, and mappings merge key
//! by key. This crate provides one entry point, [`combine`], which looks
//! up the right structure for the operands' shape and applies it,
//! recursing through nested mappings.
//!
//! # Quick Start
//!
//! ```rust
//! use monoid_registry::Value;
//! use monoid_registry::combine;
//! use monoid_registry::total;
//!
//! assert_eq!(combine(1.into(), 2.into()).unwrap(), Value::from(3));
//! assert_eq!(
//!     combine(Value::set([1, 2]), Value::set([2, 3])).unwrap(),
//!     Value::set([1, 2, 3])
//! );
//!
//! // Mappings merge recursively; keys that cancel out disappear.
//! let x = Value::map([("hits", 5), ("misses", 2)]);
//! let y = Value::map([("hits", 1), ("misses", -2)]);
//! assert_eq!(combine(x, y).unwrap(), Value::map([("hits", 6)]));
//!
//! // Fold a sequence of values; `None` when there is nothing to fold.
//! let parts = vec![Value::seq([1]), Value::seq([2, 3]), Value::seq([4, 5])];
//! assert_eq!(total(parts).unwrap(), Some(Value::seq([1, 2, 3, 4, 5])));
//! assert_eq!(total(Vec::new()).unwrap(), None);
//! ```
//!
//! # Core Concepts
//!
//! - **Value**: a dynamically typed datum ([`Value`]) whose shape is
//!   named by a [`TypeTag`].
//!
//! - **MonoidStructure**: the capability for one shape: an identity
//!   element (`zero`) and an associative `combine`. See
//!   [`MonoidStructure`].
//!
//! - **Registry**: an immutable mapping from tag to structure
//!   ([`Registry`]). Two values combine only if they resolve to the
//!   *same structure instance*. [`Registry::register`] returns a new
//!   registry, so overrides never leak into the default.
//!
//! - **Zero-elision**: when merging mappings, a key whose combined
//!   value equals its structure's zero is dropped. See [`merge`].
//!
//! # Provided Structures
//!
//! Built in ([`Registry::builtin`], [`Registry::global`]):
//!
//! - [`IntegerMonoid`]: `int` under `+`, zero `0`.
//! - [`SequenceMonoid`]: `seq` under concatenation, zero `[]`.
//! - [`SetMonoid`]: `set` under union, zero `set()`.
//! - [`MappingMonoid`]: `map` under recursive merge, zero `{}`.
//!
//! Opt-in ([`Registry::with_lattices`]): [`lattice::MaxMonoid`],
//! [`lattice::MinMonoid`], [`lattice::AnyMonoid`],
//! [`lattice::AllMonoid`].
//!
//! # Errors
//!
//! Combining fails with [`CombineError::UnsupportedType`] when a value's
//! tag has no structure, and with [`CombineError::TypeMismatch`] when the
//! operands resolve to different structures. Both carry bounded previews
//! of the offending values (see [`config::Config::preview_limit`]).
//!
//! # Ownership
//!
//! [`combine`] takes its operands by value. The mapping structure reuses
//! the larger operand's storage for the result.

pub mod config;
mod error;
pub mod lattice;
pub mod merge;
mod primitives;
mod registry;
#[cfg(test)]
mod strategy;
mod structure;
mod value;

pub use error::CombineError;
pub use merge::MappingMonoid;
pub use primitives::IntegerMonoid;
pub use primitives::SequenceMonoid;
pub use primitives::SetMonoid;
pub use registry::Registry;
pub use structure::MonoidStructure;
pub use value::FromJsonError;
pub use value::TypeTag;
pub use value::Value;

/// Combine `x` and `y` under the default registry ([`Registry::global`]).
pub fn combine(x: Value, y: Value) -> Result<Value, CombineError> {
    Registry::global().combine(x, y)
}

/// Fold `items` under the default registry ([`Registry::global`]),
/// seeded by the first item. Returns `None` when there are no items.
pub fn total<I>(items: I) -> Result<Option<Value>, CombineError>
where
    I: IntoIterator<Item = Value>,
{
    Registry::global().total(items)
}
