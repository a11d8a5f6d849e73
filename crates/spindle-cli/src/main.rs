mod cli;
mod console;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use spindle_vm::{Interpreter, ScriptSource, WordSource};

use console::ConsoleSource;

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();

    let mut source = ScriptSource::new();
    if let Some(text) = matches.get_one::<String>("eval") {
        for line in text.lines() {
            source.push_line(line);
        }
    }

    let mut loaded_any = false;
    if let Some(paths) = matches.get_many::<PathBuf>("script") {
        for path in paths {
            match fs::read_to_string(path) {
                Ok(text) => {
                    for line in text.lines() {
                        source.push_line(line);
                    }
                    loaded_any = true;
                }
                Err(err) => {
                    eprintln!("error: cannot read {}: {err}", path.display());
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    if loaded_any || !source.at_eof() {
        return run(source);
    }

    repl()
}

fn repl() -> ExitCode {
    let console = match ConsoleSource::new() {
        Ok(console) => console,
        Err(err) => {
            eprintln!("error: cannot open terminal: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("spindle {}", env!("CARGO_PKG_VERSION"));
    println!("type `exit` or press Ctrl-D to leave");
    run(console)
}

fn run<S: WordSource>(source: S) -> ExitCode {
    let mut interp = Interpreter::new(source);
    match interp.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
