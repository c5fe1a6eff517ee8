/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use monoid_registry::CombineError;
use monoid_registry::MonoidStructure;
use monoid_registry::Registry;
use monoid_registry::TypeTag;
use monoid_registry::Value;

#[derive(clap::Args, Debug)]
pub struct SelftestCommand {
    /// Only run scenarios whose name contains this substring.
    #[arg(long)]
    filter: Option<String>,
}

struct Scenario {
    name: &'static str,
    run: fn(&Registry) -> anyhow::Result<()>,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "integers",
        run: integers,
    },
    Scenario {
        name: "sequences",
        run: sequences,
    },
    Scenario {
        name: "sets",
        run: sets,
    },
    Scenario {
        name: "flat_mappings",
        run: flat_mappings,
    },
    Scenario {
        name: "zero_elision",
        run: zero_elision,
    },
    Scenario {
        name: "recursive_merge",
        run: recursive_merge,
    },
    Scenario {
        name: "nested_structures",
        run: nested_structures,
    },
    Scenario {
        name: "type_mismatch",
        run: type_mismatch,
    },
    Scenario {
        name: "unsupported_type",
        run: unsupported_type,
    },
    Scenario {
        name: "totals",
        run: totals,
    },
    Scenario {
        name: "override_scoping",
        run: override_scoping,
    },
];

impl SelftestCommand {
    pub fn run(self, registry: &Registry) -> anyhow::Result<()> {
        let selected = self.selected();

        let mut failed = 0;
        for scenario in &selected {
            match (scenario.run)(registry) {
                Ok(()) => println!("{:<24} ok", scenario.name),
                Err(err) => {
                    failed += 1;
                    println!("{:<24} FAILED: {:#}", scenario.name, err);
                }
            }
        }
        tracing::info!(total = selected.len(), failed, "selftest finished");

        anyhow::ensure!(
            failed == 0,
            "{} of {} scenarios failed",
            failed,
            selected.len()
        );
        Ok(())
    }

    fn selected(&self) -> Vec<&'static Scenario> {
        SCENARIOS
            .iter()
            .filter(|s| self.filter.as_deref().is_none_or(|f| s.name.contains(f)))
            .collect()
    }
}

fn check(actual: Value, expected: Value) -> anyhow::Result<()> {
    anyhow::ensure!(actual == expected, "expected {}, got {}", expected, actual);
    Ok(())
}

fn integers(r: &Registry) -> anyhow::Result<()> {
    check(r.combine(1.into(), 2.into())?, 3.into())
}

fn sequences(r: &Registry) -> anyhow::Result<()> {
    check(
        r.combine(Value::seq([1]), Value::seq([2, 3]))?,
        Value::seq([1, 2, 3]),
    )
}

fn sets(r: &Registry) -> anyhow::Result<()> {
    check(
        r.combine(Value::set([1, 2]), Value::set([2, 3]))?,
        Value::set([1, 2, 3]),
    )
}

fn flat_mappings(r: &Registry) -> anyhow::Result<()> {
    check(
        r.combine(Value::map([("a", 1)]), Value::map([("a", 2)]))?,
        Value::map([("a", 3)]),
    )?;
    check(
        r.combine(
            Value::map([(Value::from("a"), 1), (Value::from(0), 1)]),
            Value::map([("a", 2)]),
        )?,
        Value::map([(Value::from("a"), 3), (Value::from(0), 1)]),
    )
}

fn zero_elision(r: &Registry) -> anyhow::Result<()> {
    check(
        r.combine(Value::map([("k", 1)]), Value::map([("k", -1)]))?,
        Value::map(Vec::<(Value, Value)>::new()),
    )?;
    // An inner mapping that empties out is dropped from its parent.
    check(
        r.combine(
            Value::map([("outer", Value::map([("k", 1)])), ("keep", Value::from(1))]),
            Value::map([("outer", Value::map([("k", -1)]))]),
        )?,
        Value::map([("keep", 1)]),
    )
}

fn recursive_merge(r: &Registry) -> anyhow::Result<()> {
    let expected = Value::map([("a", Value::seq([1, 2, 3])), ("b", Value::from(1))]);
    check(
        r.combine(
            Value::map([("a", Value::seq([1, 2])), ("b", Value::from(1))]),
            Value::map([("a", Value::seq([3]))]),
        )?,
        expected.clone(),
    )?;
    check(
        r.combine(
            Value::map([("a", Value::seq([1]))]),
            Value::map([("a", Value::seq([2, 3])), ("b", Value::from(1))]),
        )?,
        expected,
    )
}

fn nested_structures(r: &Registry) -> anyhow::Result<()> {
    let x = Value::map([
        ("a", Value::from(1)),
        ("b", Value::seq(["x", "y", "z"])),
        (
            "c",
            Value::map([("a", Value::set([1, 2, 3])), ("b", Value::from(1))]),
        ),
        ("q", Value::from(3)),
        ("x", Value::from(5)),
    ]);
    let y = Value::map([
        ("a", Value::from(3)),
        ("b", Value::seq([1, 2, 3])),
        (
            "c",
            Value::map([
                ("a", Value::set([1, 2, 5, 6])),
                ("b", Value::from(7)),
                ("d", Value::from(3)),
            ]),
        ),
        ("p", Value::from(5)),
        ("x", Value::from(-5)),
    ]);
    let expected = Value::map([
        ("a", Value::from(4)),
        (
            "b",
            Value::seq([
                Value::from("x"),
                Value::from("y"),
                Value::from("z"),
                Value::from(1),
                Value::from(2),
                Value::from(3),
            ]),
        ),
        (
            "c",
            Value::map([
                ("a", Value::set([1, 2, 3, 5, 6])),
                ("b", Value::from(8)),
                ("d", Value::from(3)),
            ]),
        ),
        ("q", Value::from(3)),
        ("p", Value::from(5)),
    ]);
    check(r.combine(x, y)?, expected)
}

fn type_mismatch(r: &Registry) -> anyhow::Result<()> {
    match r.combine(1.into(), Value::map([("a", 1)])) {
        Err(CombineError::TypeMismatch { .. }) => Ok(()),
        other => anyhow::bail!("expected a type mismatch, got {:?}", other),
    }
}

fn unsupported_type(r: &Registry) -> anyhow::Result<()> {
    match r.combine(2.5.into(), 2.5.into()) {
        Err(CombineError::UnsupportedType { tag, .. }) if tag == TypeTag::FLOAT => Ok(()),
        other => anyhow::bail!("expected an unsupported type, got {:?}", other),
    }
}

fn totals(r: &Registry) -> anyhow::Result<()> {
    anyhow::ensure!(
        r.total(Vec::new())?.is_none(),
        "empty total should be absent"
    );
    let total = r.total(vec![Value::seq([1]), Value::seq([2, 3]), Value::seq([4, 5])])?;
    anyhow::ensure!(
        total == Some(Value::seq([1, 2, 3, 4, 5])),
        "unexpected total {:?}",
        total
    );
    Ok(())
}

/// Integer under subtraction, used to show that overrides reach nested values.
struct Subtract;

impl MonoidStructure for Subtract {
    fn name(&self) -> &'static str {
        "subtract"
    }

    fn zero(&self) -> Value {
        Value::from(0)
    }

    fn combine(&self, x: Value, y: Value, r: &Registry) -> Result<Value, CombineError> {
        match (x, y) {
            (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x.wrapping_sub(y))),
            (x, y) => Err(r.mismatch(&x, &y)),
        }
    }
}

fn override_scoping(r: &Registry) -> anyhow::Result<()> {
    let overridden = r.register(TypeTag::INT, Subtract);
    check(
        overridden.combine(Value::map([("a", 1)]), Value::map([("a", 2)]))?,
        Value::map([("a", -1)]),
    )?;
    check(
        r.combine(Value::map([("a", 1)]), Value::map([("a", 2)]))?,
        Value::map([("a", 3)]),
    )
}
