/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod commands;

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use monoid_registry::Registry;
use monoid_registry::config::Config;
use tracing_subscriber::EnvFilter;

use crate::commands::combine::CombineCommand;
use crate::commands::selftest::SelftestCommand;
use crate::commands::total::TotalCommand;

#[derive(Parser)]
#[command(about = "Combine values through a registry of monoid structures")]
struct Cli {
    /// YAML configuration file. Environment variables take precedence
    /// over values from the file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[clap(about = r#"Run the built-in scenario suite"#)]
    Selftest(SelftestCommand),

    #[clap(about = r#"Combine two JSON values"#)]
    Combine(CombineCommand),

    #[clap(about = r#"Fold any number of JSON values"#)]
    Total(TotalCommand),
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let registry = registry(args.config.as_deref())?;

    match args.command {
        Command::Selftest(command) => command.run(&registry),
        Command::Combine(command) => command.run(&registry),
        Command::Total(command) => command.run(&registry),
    }
}

fn registry(config: Option<&Path>) -> Result<Registry, anyhow::Error> {
    let Some(path) = config else {
        return Ok(Registry::builtin());
    };
    let config = Config::from_yaml(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?
        .with_env();
    tracing::info!(?config, "loaded configuration from {}", path.display());
    Ok(Registry::builtin().with_config(config))
}
