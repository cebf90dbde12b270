#![deny(missing_docs)]

//! # Accom Patch CLI
//!
//! Maintenance tool for the accommodation merchant dashboard: locates the
//! dashboard source file and reroutes its profile-picture upload through
//! the backend API, matching the marketplace profile upload flow.
//!
//! Safe to run repeatedly: every patch carries an idempotence guard.

use accom_patch_core::AppResult;
use clap::Parser;

mod apply;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Patches the accommodation merchant dashboard's profile upload flow"
)]
struct Cli {
    #[clap(flatten)]
    args: apply::ApplyArgs,
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    apply::execute(&cli.args)
}
