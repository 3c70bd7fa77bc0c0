use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tx_core::VmOptions;
use virtual_machine::{InterpretResult, VM};

// Exit codes follow sysexits.
const EXT_USAGE_ERROR: i32 = 64;
const EXT_DATA_ERROR: i32 = 65;
const EXT_NO_INPUT: i32 = 66;
const EXT_SOFTWARE_INTERNAL_ERROR: i32 = 70;
const EXT_IO_ERROR: i32 = 74;

#[derive(Parser)]
#[command(name = "tx", version = tx_core::VERSION, about = "The tx interpreter")]
struct Cli {
  /// Script file to run; starts a REPL when omitted.
  file: Option<PathBuf>,

  /// Arguments passed through to the script.
  #[arg(trailing_var_arg = true)]
  args: Vec<String>,

  /// Implementation-specific option; may be repeated. Available:
  /// print-tokens, print-bytecode, trace-execution.
  #[arg(short = 'X', value_name = "OPT")]
  x_options: Vec<String>,
}

fn main() {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      let failed = err.use_stderr();
      let _ = err.print();
      process::exit(if failed { EXT_USAGE_ERROR } else { 0 });
    }
  };

  let mut options = VmOptions::default();
  for opt in &cli.x_options {
    match opt.as_str() {
      "print-tokens" => options.print_tokens = true,
      "print-bytecode" => options.print_bytecode = true,
      "trace-execution" => options.trace_execution = true,
      other => {
        eprintln!("Unknown -X option '{}'.", other);
        process::exit(EXT_USAGE_ERROR);
      }
    }
  }

  match cli.file {
    Some(path) => run_file(&path, options),
    None => run_repl(options),
  }
}

fn run_file(path: &Path, options: VmOptions) -> ! {
  let source = match fs::read_to_string(path) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("Could not read '{}': {}", path.display(), err);
      let code = if err.kind() == io::ErrorKind::NotFound {
        EXT_NO_INPUT
      } else {
        EXT_IO_ERROR
      };
      process::exit(code);
    }
  };

  let mut vm = VM::new(options);
  match vm.interpret(&source) {
    InterpretResult::Ok => process::exit(0),
    InterpretResult::CompileError => process::exit(EXT_DATA_ERROR),
    InterpretResult::RuntimeError => process::exit(EXT_SOFTWARE_INTERNAL_ERROR),
  }
}

fn run_repl(mut options: VmOptions) -> ! {
  // Typing `let x = ...` twice in a session must work.
  options.allow_global_redefinition = true;

  println!("tx {}", tx_core::VERSION);
  let mut vm = VM::new(options);

  let stdin = io::stdin();
  let mut lines = stdin.lock().lines();
  loop {
    print!("> ");
    let _ = io::stdout().flush();

    let line = match lines.next() {
      Some(Ok(line)) => line,
      Some(Err(err)) => {
        eprintln!("Could not read input: {}", err);
        process::exit(EXT_IO_ERROR);
      }
      None => break,
    };
    if line.trim().is_empty() {
      continue;
    }
    // Errors are already reported; the session continues.
    vm.interpret(&line);
  }
  process::exit(0)
}
