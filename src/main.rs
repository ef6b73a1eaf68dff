//! memodb entry point
//!
//! Minimal by design: parse and dispatch via `cli::run`, print errors to
//! stderr, exit non-zero on failure. All startup logic lives in the CLI
//! module.

use memodb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
