/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Monoid structure: an identity element plus an associative combine,
//! dispatched at runtime.

use crate::error::CombineError;
use crate::registry::Registry;
use crate::value::Value;

/// The monoid capability for one shape of [`Value`].
///
/// Laws (not enforced by type system):
/// - Identity: `combine(zero(), a) == a` and `combine(a, zero()) == a`
/// - Associativity: `combine(combine(a, b), c) == combine(a, combine(b, c))`
///
/// Implementations are stateless and shared across threads. `combine`
/// receives the caller's registry so that structures which recurse into
/// nested values resolve them under the same registry (and so under the
/// same overrides) as the outer call.
///
/// # Example
///
/// ```
/// use monoid_registry::CombineError;
/// use monoid_registry::MonoidStructure;
/// use monoid_registry::Registry;
/// use monoid_registry::Value;
///
/// // Concatenate strings.
/// struct Concat;
///
/// impl MonoidStructure for Concat {
///     fn name(&self) -> &'static str {
///         "concat"
///     }
///
///     fn zero(&self) -> Value {
///         Value::from("")
///     }
///
///     fn combine(&self, x: Value, y: Value, r: &Registry) -> Result<Value, CombineError> {
///         match (x, y) {
///             (Value::Str(x), Value::Str(y)) => Ok(Value::Str(x + &y)),
///             (x, y) => Err(r.mismatch(&x, &y)),
///         }
///     }
/// }
///
/// let registry = Registry::builtin().register("str", Concat);
/// let joined = registry.combine("ab".into(), "cd".into()).unwrap();
/// assert_eq!(joined, Value::from("abcd"));
/// ```
pub trait MonoidStructure: Send + Sync + 'static {
    /// A short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// The identity element.
    fn zero(&self) -> Value;

    /// Combine two values associatively, `x` first.
    ///
    /// Both operands are consumed; an implementation may reuse either
    /// one's storage for the result.
    fn combine(&self, x: Value, y: Value, registry: &Registry) -> Result<Value, CombineError>;

    /// Does `value` differ from the identity element?
    fn is_non_zero(&self, value: &Value) -> bool {
        *value != self.zero()
    }
}
