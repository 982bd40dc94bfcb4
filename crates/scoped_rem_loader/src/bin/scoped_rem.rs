//! Rewrite `rem` lengths in a stylesheet file.

use env_logger::{Builder, Env};
use log::error;
use scoped_rem_loader::cli::{USAGE, parse_args, run};
use std::env;
use std::process::exit;

fn main() {
    let _log_init: Result<(), _> =
        Builder::from_env(Env::default().filter_or("RUST_LOG", "warn")).try_init();
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            error!("error: {err}");
            error!("{USAGE}");
            exit(2);
        }
    };
    match run(&args) {
        Ok(0) => {}
        Ok(count) => {
            error!("{count} error(s) reported, input passed through unchanged");
            exit(1);
        }
        Err(err) => {
            error!("error: {err:#}");
            exit(1);
        }
    }
}
