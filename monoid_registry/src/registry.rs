/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The type-tag → structure registry and its resolver.
//!
//! A [`Registry`] is immutable once built. [`Registry::register`]
//! returns a new registry and leaves the receiver untouched, so an
//! override (say, a non-commutative Integer in a test) is scoped to the
//! registry it was added to:
//!
//! ```
//! use monoid_registry::CombineError;
//! use monoid_registry::MonoidStructure;
//! use monoid_registry::Registry;
//! use monoid_registry::TypeTag;
//! use monoid_registry::Value;
//!
//! struct Subtract;
//!
//! impl MonoidStructure for Subtract {
//!     fn name(&self) -> &'static str {
//!         "subtract"
//!     }
//!
//!     fn zero(&self) -> Value {
//!         Value::from(0)
//!     }
//!
//!     fn combine(&self, x: Value, y: Value, r: &Registry) -> Result<Value, CombineError> {
//!         match (x, y) {
//!             (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x - y)),
//!             (x, y) => Err(r.mismatch(&x, &y)),
//!         }
//!     }
//! }
//!
//! let default = Registry::builtin();
//! let overridden = default.register(TypeTag::INT, Subtract);
//!
//! let a = || Value::map([("a", 1)]);
//! let b = || Value::map([("a", 2)]);
//! assert_eq!(default.combine(a(), b()).unwrap(), Value::map([("a", 3)]));
//! assert_eq!(overridden.combine(a(), b()).unwrap(), Value::map([("a", -1)]));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;

use crate::config::Config;
use crate::error::CombineError;
use crate::merge::MappingMonoid;
use crate::primitives::IntegerMonoid;
use crate::primitives::SequenceMonoid;
use crate::primitives::SetMonoid;
use crate::structure::MonoidStructure;
use crate::value::TypeTag;
use crate::value::Value;

/// Registry entries, keyed by tag.
type Structures = BTreeMap<TypeTag, Arc<dyn MonoidStructure>>;

/// An immutable mapping from [`TypeTag`] to [`MonoidStructure`].
///
/// Cloning is cheap: clones share the underlying table.
#[derive(Clone)]
pub struct Registry {
    structures: Arc<Structures>,
    config: Config,
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::builtin);

impl Registry {
    /// A registry with no structures, using [`Config::global`].
    pub fn empty() -> Self {
        Registry {
            structures: Arc::new(BTreeMap::new()),
            config: Config::global().clone(),
        }
    }

    /// A fresh registry holding the built-in structures: Integer,
    /// Sequence, Set and Mapping.
    ///
    /// Each call builds new structure instances, so values resolved
    /// under two different `builtin()` registries never share a
    /// structure.
    pub fn builtin() -> Self {
        let structures: Structures = BTreeMap::from([
            (TypeTag::INT, Arc::new(IntegerMonoid) as Arc<dyn MonoidStructure>),
            (TypeTag::SEQ, Arc::new(SequenceMonoid) as Arc<dyn MonoidStructure>),
            (TypeTag::SET, Arc::new(SetMonoid) as Arc<dyn MonoidStructure>),
            (TypeTag::MAP, Arc::new(MappingMonoid) as Arc<dyn MonoidStructure>),
        ]);
        Registry {
            structures: Arc::new(structures),
            config: Config::global().clone(),
        }
    }

    /// The process-wide default registry: the built-in set, created on
    /// first use and never modified.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// A copy of this registry using `config`.
    pub fn with_config(&self, config: Config) -> Registry {
        Registry {
            structures: Arc::clone(&self.structures),
            config,
        }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A copy of this registry with `structure` registered under `tag`,
    /// replacing any existing entry for that tag.
    pub fn register(&self, tag: impl Into<TypeTag>, structure: impl MonoidStructure) -> Registry {
        self.register_shared(tag, Arc::new(structure))
    }

    /// Like [`Registry::register`], but takes an already shared
    /// structure. Registering one instance under several tags makes
    /// values of those tags combinable with one another.
    pub fn register_shared(
        &self,
        tag: impl Into<TypeTag>,
        structure: Arc<dyn MonoidStructure>,
    ) -> Registry {
        let tag = tag.into();
        let name = structure.name();
        let mut structures = Structures::clone(&self.structures);
        let replaced = structures.insert(tag.clone(), structure).is_some();
        tracing::debug!(%tag, structure = name, replaced, "registered monoid structure");
        Registry {
            structures: Arc::new(structures),
            config: self.config.clone(),
        }
    }

    /// The structure registered for `tag`, if any.
    pub fn get(&self, tag: &TypeTag) -> Option<&Arc<dyn MonoidStructure>> {
        self.structures.get(tag)
    }

    /// Is a structure registered for `tag`?
    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.structures.contains_key(tag)
    }

    /// Registered tags, in order.
    pub fn tags(&self) -> impl Iterator<Item = &TypeTag> {
        self.structures.keys()
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// Does this registry have no entries?
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Resolve the structure for `value`.
    pub fn resolve(&self, value: &Value) -> Result<&Arc<dyn MonoidStructure>, CombineError> {
        self.structures
            .get(value.tag())
            .ok_or_else(|| CombineError::unsupported(value, self.config.preview_limit))
    }

    /// Resolve the structure shared by `x` and `y`.
    ///
    /// `x` is resolved first. The two operands are compatible only if
    /// they resolve to the very same structure instance.
    pub fn resolve_pair(
        &self,
        x: &Value,
        y: &Value,
    ) -> Result<&Arc<dyn MonoidStructure>, CombineError> {
        let x_structure = self.resolve(x)?;
        let y_structure = self.resolve(y)?;
        if !same_structure(x_structure, y_structure) {
            return Err(self.mismatch(x, y));
        }
        tracing::trace!(structure = x_structure.name(), "resolved pair");
        Ok(x_structure)
    }

    /// Combine `x` and `y` under this registry.
    pub fn combine(&self, x: Value, y: Value) -> Result<Value, CombineError> {
        let structure = self.resolve_pair(&x, &y)?;
        structure.combine(x, y, self)
    }

    /// Fold `items` with [`Registry::combine`], seeded by the first
    /// item. Returns `None` when there are no items.
    pub fn total<I>(&self, items: I) -> Result<Option<Value>, CombineError>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut items = items.into_iter();
        let Some(first) = items.next() else {
            return Ok(None);
        };
        items
            .try_fold(first, |acc, item| self.combine(acc, item))
            .map(Some)
    }

    /// A [`CombineError::TypeMismatch`] for `x` and `y`, with previews
    /// bounded by this registry's configuration. For use by structures
    /// handed operands of the wrong shape.
    pub fn mismatch(&self, x: &Value, y: &Value) -> CombineError {
        CombineError::mismatch(x, y, self.config.preview_limit)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::builtin()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "structures",
                &self
                    .structures
                    .iter()
                    .map(|(tag, s)| (tag.as_str(), s.name()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

/// Instance identity. Compares data addresses only: vtable pointers are
/// not guaranteed unique per type.
fn same_structure(a: &Arc<dyn MonoidStructure>, b: &Arc<dyn MonoidStructure>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
