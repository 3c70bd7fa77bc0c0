use std::rc::Rc;

use lexer::Scanner;
use tx_core::bytecode::OpCode;
use tx_core::chunk::Chunk;
use tx_core::globals::GlobalTable;
use tx_core::interner::StringInterner;
use tx_core::objects::{FuncObj, StrObj};
use tx_core::tokens::{Token, TokenKind};
use tx_core::values::Value;
use tx_core::{VmOptions, MAX_CONSTANTS};

mod expressions;
mod functions;
mod loops;
mod precedence;
mod resolver;
mod statements;


use loops::{BreakSite, Loop};

/// What kind of function a `FuncScope` is compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionKind {
  Script,
  Function,
}

/// A local variable slot known to the compiler. Slot N lives at
/// stack offset N of the enclosing function at runtime.
pub(crate) struct Local<'src> {
  name: &'src str,
  /// The scope depth the local was defined at, or -1 while it is
  /// declared but not yet initialized.
  depth: i32,
  is_const: bool,
}

/// Per-function compiler state. Nested `fn` expressions push a
/// new scope; the enclosing one resumes when the body ends.
pub(crate) struct FuncScope<'src> {
  kind: FunctionKind,
  name: Option<Rc<StrObj>>,
  arity: u8,
  chunk: Chunk,
  locals: Vec<Local<'src>>,
  scope_depth: i32,
  loops: Vec<Loop>,
  breaks: Vec<BreakSite>,
}

/// The single-pass compiler: pulls tokens from the scanner and
/// emits bytecode straight into the current function's chunk. No
/// AST is materialized.
pub struct Compiler<'src, 'ctx> {
  scanner: Scanner<'src>,
  previous: Token<'src>,
  current: Token<'src>,
  had_error: bool,
  panic_mode: bool,
  scopes: Vec<FuncScope<'src>>,
  strings: &'ctx mut StringInterner,
  globals: &'ctx mut GlobalTable,
  options: &'ctx VmOptions,
}

impl<'src, 'ctx> Compiler<'src, 'ctx> {
  /// Compiles a source string into the script function.
  ///
  /// Globals declared by the script are registered in `globals`
  /// so that their indices stay stable across compilations on the
  /// same VM; identifier and string-literal names are interned
  /// through `strings`.
  ///
  /// # Returns
  /// The compiled script, or `None` when any diagnostic was
  /// emitted. Diagnostics go to stderr as they are found.
  pub fn compile(
    source: &'src str,
    strings: &'ctx mut StringInterner,
    globals: &'ctx mut GlobalTable,
    options: &'ctx VmOptions,
  ) -> Option<FuncObj> {
    let mut compiler = Compiler {
      scanner: Scanner::new(source),
      previous: Token::empty(),
      current: Token::empty(),
      had_error: false,
      panic_mode: false,
      scopes: vec![],
      strings,
      globals,
      options,
    };

    compiler.begin_func_scope(FunctionKind::Script, None);
    compiler.advance();
    compiler.script_body();
    let script = compiler.end_func_scope();

    if !compiler.globals.all_defined() {
      compiler.error("Global variable declared but not defined.");
    }

    if compiler.had_error {
      None
    } else {
      Some(script)
    }
  }

  // ------------------------------------------------------------
  // Token flow
  // ------------------------------------------------------------

  /// Advances to the next token, reporting any error tokens the
  /// scanner hands over and skipping past them.
  pub(crate) fn advance(&mut self) {
    self.previous = self.current.clone();
    loop {
      self.current = self.scanner.scan_token();
      if self.current.kind != TokenKind::ERROR {
        break;
      }
      let message = self.current.lexeme;
      self.error_at_current(message);
    }
  }

  /// Checks the current token against an expected type without
  /// consuming it.
  pub(crate) fn check(&self, kind: TokenKind) -> bool {
    self.current.kind == kind
  }

  /// Consumes the current token if it matches the expected type.
  pub(crate) fn matches(&mut self, kind: TokenKind) -> bool {
    if !self.check(kind) {
      return false;
    }
    self.advance();
    true
  }

  /// Consumes the current token, emitting a diagnostic when it is
  /// not of the expected type.
  pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) {
    if self.check(kind) {
      self.advance();
      return;
    }
    self.error_at_current(message);
  }

  // ------------------------------------------------------------
  // Bytecode emission
  // ------------------------------------------------------------

  pub(crate) fn current_scope(&self) -> &FuncScope<'src> {
    self.scopes.last().expect("No active function scope.")
  }

  pub(crate) fn current_scope_mut(&mut self) -> &mut FuncScope<'src> {
    self.scopes.last_mut().expect("No active function scope.")
  }

  fn current_chunk_mut(&mut self) -> &mut Chunk {
    &mut self.current_scope_mut().chunk
  }

  /// Emits a zero-operand instruction, recording the line of the
  /// previous token for the line table.
  pub(crate) fn emit_op_code(&mut self, op: OpCode) {
    let line = self.previous.line;
    let chunk = self.current_chunk_mut();
    chunk.write_line(line);
    chunk.push_op_code(op);
  }

  pub(crate) fn emit_with_byte(&mut self, op: OpCode, operand: u8) {
    let line = self.previous.line;
    let chunk = self.current_chunk_mut();
    chunk.write_line(line);
    chunk.push_op_code(op);
    chunk.push_byte(operand);
  }

  pub(crate) fn emit_with_short(&mut self, op: OpCode, operand: u16) {
    let line = self.previous.line;
    let chunk = self.current_chunk_mut();
    chunk.write_line(line);
    chunk.push_op_code(op);
    chunk.push_short(operand);
  }

  /// Emits an instruction with a pool/slot index operand, picking
  /// the narrowest form that fits: the one-byte base form for
  /// indices up to 255, the three-byte `_LONG` form otherwise.
  pub(crate) fn emit_var_length(&mut self, op: OpCode, index: usize) {
    debug_assert!(index < MAX_CONSTANTS);
    if index < 256 {
      self.emit_with_byte(op, index as u8);
      return;
    }
    let line = self.previous.line;
    let chunk = self.current_chunk_mut();
    chunk.write_line(line);
    chunk.push_op_code(op.long_variant());
    chunk.push_u24(index);
  }

  /// Adds a constant to the current chunk's pool and emits the
  /// instruction loading it.
  pub(crate) fn emit_constant(&mut self, value: Value) {
    match self.current_chunk_mut().add_constant(value) {
      Ok(index) => self.emit_var_length(OpCode::Constant, index),
      Err(()) => self.error("Too many constants in one chunk."),
    }
  }

  /// Emits a forward jump with a placeholder offset.
  ///
  /// # Returns
  /// The chunk offset of the operand, for `patch_jump`.
  pub(crate) fn emit_jump(&mut self, op: OpCode) -> usize {
    self.emit_with_short(op, 0xffff);
    self.current_scope().chunk.len() - 2
  }

  /// Back-patches a forward jump to land just past the last
  /// emitted instruction.
  pub(crate) fn patch_jump(&mut self, operand_pos: usize) {
    let distance = self.current_scope().chunk.len() - operand_pos - 2;
    if distance > u16::MAX as usize {
      self.error("Too much code to jump over.");
      return;
    }
    self.current_chunk_mut().patch_short(operand_pos, distance as u16);
  }

  /// Emits a backward jump to the given loop start.
  pub(crate) fn emit_loop(&mut self, loop_start: usize) {
    // The ip has moved past the three bytes of this instruction
    // by the time the VM applies the offset.
    let offset = self.current_scope().chunk.len() - loop_start + 3;
    if offset > u16::MAX as usize {
      self.error("Loop body too large.");
      return;
    }
    self.emit_with_short(OpCode::Loop, offset as u16);
  }

  // ------------------------------------------------------------
  // Block scopes and function scopes
  // ------------------------------------------------------------

  pub(crate) fn begin_scope(&mut self) {
    self.current_scope_mut().scope_depth += 1;
  }

  /// Leaves a block scope, discarding its locals beneath the
  /// block's value with a single `END_SCOPE`.
  pub(crate) fn end_scope(&mut self) {
    let scope = self.current_scope_mut();
    scope.scope_depth -= 1;
    let mut count: usize = 0;
    while scope
      .locals
      .last()
      .map_or(false, |local| local.depth > scope.scope_depth)
    {
      scope.locals.pop();
      count += 1;
    }
    if count > 0 {
      self.emit_var_length(OpCode::EndScope, count);
    }
  }

  pub(crate) fn begin_func_scope(&mut self, kind: FunctionKind, name: Option<Rc<StrObj>>) {
    let mut locals = Vec::new();
    if kind == FunctionKind::Function {
      // Stack slot zero of a call frame holds the callee.
      locals.push(Local {
        name: "",
        depth: 0,
        is_const: true,
      });
    }
    self.scopes.push(FuncScope {
      kind,
      name,
      arity: 0,
      chunk: Chunk::new(),
      locals,
      scope_depth: 0,
      loops: vec![],
      breaks: vec![],
    });
  }

  /// Terminates the current function scope and returns the
  /// finished function object.
  pub(crate) fn end_func_scope(&mut self) -> FuncObj {
    self.emit_op_code(OpCode::Return);
    let scope = self.scopes.pop().expect("No active function scope.");
    let function = FuncObj {
      name: scope.name,
      arity: scope.arity,
      chunk: scope.chunk,
    };
    if self.options.print_bytecode && !self.had_error {
      plv::disassemble_chunk(&function.chunk, &function.display_name());
    }
    function
  }

  // ------------------------------------------------------------
  // Diagnostics
  // ------------------------------------------------------------

  /// Reports an error at the previous token.
  pub(crate) fn error(&mut self, message: &str) {
    let (line, kind, lexeme) = (self.previous.line, self.previous.kind, self.previous.lexeme);
    self.error_at(line, kind, lexeme, message);
  }

  /// Reports an error at the current token.
  pub(crate) fn error_at_current(&mut self, message: &str) {
    let (line, kind, lexeme) = (self.current.line, self.current.kind, self.current.lexeme);
    self.error_at(line, kind, lexeme, message);
  }

  fn error_at(&mut self, line: usize, kind: TokenKind, lexeme: &str, message: &str) {
    // Suppress the cascade while panicking; `synchronize` clears
    // the flag at the next statement boundary.
    if self.panic_mode {
      return;
    }
    self.panic_mode = true;
    self.had_error = true;

    eprint!("[line {}] Error", line);
    match kind {
      TokenKind::EOF => eprint!(" at end"),
      TokenKind::ERROR => {}
      _ => eprint!(" at '{}'", lexeme),
    }
    eprintln!(": {}", message);
  }

  /// Skips tokens until a statement boundary so that one mistake
  /// produces one diagnostic.
  pub(crate) fn synchronize(&mut self) {
    use TokenKind::*;

    self.panic_mode = false;
    while self.current.kind != EOF {
      if self.previous.kind == SEMICOLON {
        return;
      }
      match self.current.kind {
        STRUCT | FN | LET | VAR | IF | MATCH | LOOP | WHILE | FOR | RETURN | IMPORT => return,
        _ => {}
      }
      self.advance();
    }
  }
}
