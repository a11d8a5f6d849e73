//! Command-line definition for the `spindle` binary.

use std::path::PathBuf;

use clap::{Arg, Command, value_parser};

/// Script files to run in order (positional).
fn script_arg() -> Arg {
    Arg::new("script")
        .value_name("SCRIPT")
        .value_parser(value_parser!(PathBuf))
        .num_args(0..)
        .help("Script files to run in order")
}

/// Inline program text (-e/--eval).
fn eval_arg() -> Arg {
    Arg::new("eval")
        .short('e')
        .long("eval")
        .value_name("TEXT")
        .help("Evaluate TEXT before any scripts")
}

pub fn build_cli() -> Command {
    Command::new("spindle")
        .about("Stack-based word runtime with an execute/compile REPL")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(script_arg())
        .arg(eval_arg())
}
