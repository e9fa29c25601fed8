use clap::Parser;
use stoplang::Error;

use std::fs::read_to_string;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

/// Interpreter for programs written between `start` and `stop`.
#[derive(Parser, Debug)]
#[command(name = "stoplang", version)]
struct Args {
    /// Program file; without it the program is read from stdin up to the line
    /// ending with `stop;`
    file: Option<PathBuf>,

    /// Maximum size in bytes of a program read from stdin
    #[arg(long, default_value_t = stoplang::MAX_PROGRAM_SIZE)]
    max_size: usize,

    /// Do not print the prompt before reading the program from stdin
    #[arg(long)]
    no_prompt: bool,

    /// Log filter, e.g. `debug` or `stoplang=trace`
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn run(args: &Args) -> Result<(), Error> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();

    let program = match args.file {
        Some(ref file) => read_to_string(file)?,
        None => {
            if !args.no_prompt {
                let mut output = stdout.lock();
                writeln!(output, "Enter your program (execution starts after 'stop;'):")?;
                output.flush()?;
            }
            stoplang::acquire(&mut input, args.max_size)?
        }
    };

    stoplang::execute(&program, &mut input, stdout.lock(), io::stderr())
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&args) {
        println!("{}", e);
        process::exit(1);
    }
}
