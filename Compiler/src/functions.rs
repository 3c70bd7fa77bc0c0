use std::rc::Rc;

use tx_core::bytecode::OpCode;
use tx_core::objects::{Object, StrObj};
use tx_core::tokens::TokenKind;
use tx_core::values::Value;

use crate::{Compiler, FunctionKind};

impl<'src, 'ctx> Compiler<'src, 'ctx> {
  /// Compiles a function body into its own `FuncScope` and emits
  /// the finished function object as a constant. Parameters are
  /// the function's first locals and are immutable.
  pub(crate) fn function(&mut self, kind: FunctionKind, name: Option<Rc<StrObj>>) {
    let named = name.as_ref().map_or(false, |n| !n.content.is_empty());
    self.begin_func_scope(kind, name);
    self.begin_scope();

    let message = if named {
      "Expect '(' after function name."
    } else {
      "Expect '(' after 'fn'."
    };
    self.consume(TokenKind::LEFT_PAREN, message);

    loop {
      if self.check(TokenKind::RIGHT_PAREN) {
        break;
      }
      if self.current_scope().arity == u8::MAX {
        self.error_at_current("Can't have more than 255 parameters.");
      } else {
        self.current_scope_mut().arity += 1;
      }
      let parameter = self.parse_variable("Expect parameter name.");
      self.define_variable(parameter);
      if !self.matches(TokenKind::COMMA) {
        break;
      }
    }
    self.consume(TokenKind::RIGHT_PAREN, "Expect ')' after parameters.");

    self.consume(TokenKind::LEFT_BRACE, "Expect '{' before function body.");
    // The parameters already opened the function's scope; the
    // body shares it.
    self.block_no_scope();

    let function = self.end_func_scope();
    self.emit_constant(Value::Obj(Object::Func(Rc::new(function))));
  }

  /// `fn name(params) { body }` — declares a `let`-like global
  /// (or local) bound to the function.
  pub(crate) fn fn_declaration(&mut self) {
    let global_idx = self.parse_variable("Expect function name.");
    let name_lexeme = self.previous.lexeme;

    // Initialized before the body so the function can refer to
    // itself recursively.
    self.mark_initialized(global_idx);

    let name = self.strings.intern(name_lexeme);
    self.function(FunctionKind::Function, Some(name));
    self.define_variable(global_idx);
  }

  /// `return [expr];` — only valid inside a function body.
  pub(crate) fn return_statement(&mut self) {
    if self.current_scope().kind == FunctionKind::Script {
      self.error("Can't return from top-level code.");
    }

    if self.matches(TokenKind::SEMICOLON) {
      self.emit_op_code(OpCode::Nil);
    } else {
      self.expression();
      self.consume(TokenKind::SEMICOLON, "Expect ';' after return value.");
    }
    self.emit_op_code(OpCode::Return);
  }
}
