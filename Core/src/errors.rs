/// The classes of errors the VM can raise while executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorType {
  /// An operand of the wrong type, or an unsupported operation.
  TypeError,
  /// A read or write of an undefined global.
  ReferenceError,
  /// Integer division by zero.
  ZeroDivision,
  /// The value stack is full.
  StackOverflow,
  /// A reserved instruction reached the dispatch loop.
  Internal,
}

impl RuntimeErrorType {
  pub fn name(&self) -> &'static str {
    match self {
      RuntimeErrorType::TypeError => "TypeError",
      RuntimeErrorType::ReferenceError => "ReferenceError",
      RuntimeErrorType::ZeroDivision => "ZeroDivisionError",
      RuntimeErrorType::StackOverflow => "StackOverflowError",
      RuntimeErrorType::Internal => "InternalError",
    }
  }
}

/// Reports a runtime error to the console, resolving the
/// offending line through the chunk's line table beforehand.
pub fn report_runtime_error(error: RuntimeErrorType, message: &str, line: usize) {
  eprintln!("\x1b[31;1m{}:\x1b[0m\x1b[1m {}\x1b[0m", error.name(), message);
  eprintln!("[line {}] in script", line);
}
