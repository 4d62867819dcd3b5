//! Rulebook CLI — compiles metadata-tagged rule files into a single
//! canonical reference document, and validates each rule against the
//! required schema.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
