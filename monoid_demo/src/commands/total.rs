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
pub struct TotalCommand {
    /// The values to fold, as JSON documents, in order.
    values: Vec<String>,
}

impl TotalCommand {
    pub fn run(self, registry: &Registry) -> anyhow::Result<()> {
        let limit = registry.config().preview_limit;
        let values = self
            .values
            .iter()
            .map(|json| parse_value(json, limit))
            .collect::<anyhow::Result<Vec<_>>>()?;
        match registry.total(values)? {
            Some(total) => println!("{}", total),
            None => println!("(no values)"),
        }
        Ok(())
    }
}
