//! statpipe CLI entry point
//!
//! Minimal entrypoint: argument parsing and execution live in the `cli`
//! module; this logs the failure and exits non-zero.

use statpipe::cli;
use statpipe::observability::Logger;

fn main() {
    if let Err(e) = cli::run() {
        Logger::fatal("statpipe_failed", &[("error", &e.to_string())]);
        std::process::exit(1);
    }
}
