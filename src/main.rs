//! stackvm CLI: compile source files, run bytecode, or inspect it.

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use colored::Colorize;

use stackvm::bytecode::{print_disassembly, RunOptions, Word};
use stackvm::error::StackVmError;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that turns on execution tracing.
const TRACE_ENV: &str = "STACKVM_TRACE";

/// CLI command to execute.
enum Command {
    /// Compile a source file into a bytecode file
    Compile { source: String, output: String },
    /// Run a bytecode file
    Run { file: String },
    /// Compile and run a source file
    Exec { file: String },
    /// Print the disassembly of a bytecode or source file
    Disasm { file: String, from_source: bool },
}

/// CLI options parsed from arguments.
struct Options {
    command: Command,
    run: RunOptions,
}

fn print_usage() {
    eprintln!("stackvm {} - word compiler and stack machine", VERSION);
    eprintln!();
    eprintln!("Usage: stackvm compile <source> <output>");
    eprintln!("       stackvm run <bytecode> [--trace]");
    eprintln!("       stackvm exec <source> [--trace]");
    eprintln!("       stackvm disasm <file> [--source]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --trace      Print every executed instruction to stderr");
    eprintln!("  --source     Treat the disasm input as source text");
    eprintln!("  --help, -h   Show this help message");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {}=1  Same as --trace", TRACE_ENV);
}

fn trace_from_env() -> bool {
    matches!(
        env::var(TRACE_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    )
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(64);
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut run = RunOptions {
        trace: trace_from_env(),
    };
    let mut from_source = false;
    let mut positional = Vec::new();

    for arg in &args {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--trace" => run.trace = true,
            "--source" => from_source = true,
            arg if arg.starts_with('-') => usage_error(&format!("Unknown option: {}", arg)),
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("compile") => match (positional.next(), positional.next()) {
            (Some(source), Some(output)) => Command::Compile { source, output },
            _ => usage_error("compile requires a source and an output file"),
        },
        Some("run") => match positional.next() {
            Some(file) => Command::Run { file },
            None => usage_error("run requires a bytecode file"),
        },
        Some("exec") => match positional.next() {
            Some(file) => Command::Exec { file },
            None => usage_error("exec requires a source file"),
        },
        Some("disasm") => match positional.next() {
            Some(file) => Command::Disasm { file, from_source },
            None => usage_error("disasm requires a file"),
        },
        Some(other) => usage_error(&format!("Unknown command: {}", other)),
        None => usage_error("No command given"),
    };

    if let Some(extra) = positional.next() {
        usage_error(&format!("Unexpected argument: {}", extra));
    }

    Options { command, run }
}

fn load_source(path: &Path) -> Result<Vec<Word>, StackVmError> {
    let source = fs::read_to_string(path)?;
    Ok(stackvm::compile(&source)?)
}

fn load_bytecode(path: &Path) -> Result<Vec<Word>, StackVmError> {
    let bytes = fs::read(path)?;
    Ok(stackvm::deserialize(&bytes)?)
}

fn execute(options: Options) -> Result<(), StackVmError> {
    match options.command {
        Command::Compile { source, output } => {
            let code = load_source(Path::new(&source))?;
            fs::write(&output, stackvm::serialize(&code))?;
        }
        Command::Run { file } => {
            let code = load_bytecode(Path::new(&file))?;
            println!("{}", stackvm::run_with_options(&code, options.run)?);
        }
        Command::Exec { file } => {
            let code = load_source(Path::new(&file))?;
            println!("{}", stackvm::run_with_options(&code, options.run)?);
        }
        Command::Disasm { file, from_source } => {
            let code = if from_source {
                load_source(Path::new(&file))?
            } else {
                load_bytecode(Path::new(&file))?
            };
            print_disassembly(&code);
        }
    }
    Ok(())
}

fn main() {
    let options = parse_args();
    if let Err(e) = execute(options) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}
