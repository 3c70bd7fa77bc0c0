pub mod bytecode;
pub mod chunk;
pub mod errors;
pub mod globals;
pub mod interner;
pub mod objects;
pub mod tokens;
pub mod utils;
pub mod values;

#[cfg(test)]
mod tests;

/// The current version of the interpreter.
pub const VERSION: &str = "0.1.0";

/// The max number of values on the VM's stack.
pub const STACK_MAX: usize = 256;
/// The max number of local variables per function.
pub const LOCALS_MAX: usize = 256;
/// The max nesting depth for string interpolation.
pub const MAX_INTERP_DEPTH: usize = 4;
/// The max number of characters in a numeric literal.
pub const MAX_CHARS_IN_NUMERIC_LITERAL: usize = 256;
/// The max number of constants in a single chunk, bound by the
/// three-byte operand of the `_LONG` instruction forms.
pub const MAX_CONSTANTS: usize = 1 << 24;

/// Host-configurable switches for a virtual machine instance.
#[derive(Debug, Default, Clone)]
pub struct VmOptions {
  /// Print the token stream before compiling.
  pub print_tokens: bool,
  /// Disassemble each chunk after it is compiled.
  pub print_bytecode: bool,
  /// Print the stack and each instruction while executing.
  pub trace_execution: bool,
  /// Permit `let`/`var` to redefine an already defined global.
  pub allow_global_redefinition: bool,
}
