/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use monoid_registry::Registry;

use crate::commands::parse_value;

#[derive(clap::Args, Debug)]
pub struct CombineCommand {
    /// The left operand, as JSON.
    x: String,

    /// The right operand, as JSON.
    y: String,
}

impl CombineCommand {
    pub fn run(self, registry: &Registry) -> anyhow::Result<()> {
        let limit = registry.config().preview_limit;
        let x = parse_value(&self.x, limit)?;
        let y = parse_value(&self.y, limit)?;
        println!("{}", registry.combine(x, y)?);
        Ok(())
    }
}
