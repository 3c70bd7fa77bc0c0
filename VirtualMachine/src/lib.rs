use compiler::Compiler;
use tx_core::errors::{report_runtime_error, RuntimeErrorType};
use tx_core::globals::GlobalTable;
use tx_core::interner::StringInterner;
use tx_core::values::Value;
use tx_core::{VmOptions, STACK_MAX};

mod run;

#[cfg(test)]
mod tests;

/// The types of results the interpreter can return.
pub enum InterpretResult {
  Ok,
  CompileError,
  RuntimeError,
}

/// How one run of a chunk ended.
pub(crate) enum RuntimeResult {
  /// Execution reached `RETURN`; the payload is the script's
  /// value.
  Ok(Value),
  Error {
    error: RuntimeErrorType,
    message: String,
    line: usize,
  },
}

/// A tx virtual machine.
///
/// One instance owns its value stack, its global environment and
/// its string-intern set; globals and interned strings persist
/// across `interpret` calls, which is what lets a REPL build up
/// state line by line. Instances are independent; none of this is
/// shared or thread-safe.
pub struct VM {
  options: VmOptions,
  stack: Vec<Value>,
  globals: GlobalTable,
  strings: StringInterner,
  last_value: Value,
}

impl Default for VM {
  fn default() -> VM {
    VM::new(VmOptions::default())
  }
}

impl VM {
  pub fn new(options: VmOptions) -> VM {
    VM {
      options,
      stack: Vec::with_capacity(STACK_MAX),
      globals: GlobalTable::new(),
      strings: StringInterner::new(),
      last_value: Value::None,
    }
  }

  /// Compiles and runs a source string.
  ///
  /// A non-`nil` script value (the trailing expression of the
  /// script) is printed to stdout and kept for `last_value`.
  pub fn interpret(&mut self, source: &str) -> InterpretResult {
    if self.options.print_tokens {
      plv::print_tokens(source);
    }

    let script = match Compiler::compile(source, &mut self.strings, &mut self.globals, &self.options)
    {
      Some(script) => script,
      None => return InterpretResult::CompileError,
    };

    match self.run(&script.chunk) {
      RuntimeResult::Ok(value) => {
        if !value.is_nil() && !value.is_none() {
          println!("{}", value);
        }
        self.last_value = value;
        InterpretResult::Ok
      }
      RuntimeResult::Error {
        error,
        message,
        line,
      } => {
        report_runtime_error(error, &message, line);
        self.stack.clear();
        InterpretResult::RuntimeError
      }
    }
  }

  /// The value of the most recent successfully executed script.
  pub fn last_value(&self) -> &Value {
    &self.last_value
  }

  pub fn options(&self) -> &VmOptions {
    &self.options
  }
}
