//! `devtrack` (dt) - project issue tracker
//!
//! Issues move `open -> in_progress -> closed` inside projects; every
//! mutation is authorized against ownership, membership and assignment.

use clap::Parser;
use devtrack::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    if let Err(e) = cli::run(cli) {
        cli::report_error(&e, json);
        std::process::exit(1);
    }
}
