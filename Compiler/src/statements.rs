use tx_core::bytecode::OpCode;
use tx_core::tokens::TokenKind;

use crate::Compiler;

/// Block-valued expressions may stand as statements without a
/// terminating `;`.
pub(crate) fn is_block_expr(kind: TokenKind) -> bool {
  matches!(kind, TokenKind::LEFT_BRACE | TokenKind::IF | TokenKind::LOOP)
}

impl<'src, 'ctx> Compiler<'src, 'ctx> {
  /// Compiles the top level of a script. Works like a block body
  /// terminated by EOF: a trailing expression without `;` is the
  /// script's value, otherwise the script yields `nil`.
  pub(crate) fn script_body(&mut self) {
    let mut has_final_expression = false;

    while !self.check(TokenKind::EOF) {
      if let Some(expr_kind) = self.statement_or_expression() {
        match self.current.kind {
          TokenKind::EOF => has_final_expression = true,
          TokenKind::SEMICOLON => {
            self.advance();
            self.emit_op_code(OpCode::Pop);
          }
          _ if is_block_expr(expr_kind) => self.emit_op_code(OpCode::Pop),
          _ => self.error_at_current("Expect ';' after expression."),
        }
      }
      if self.panic_mode {
        self.synchronize();
      }
    }

    if !has_final_expression {
      self.emit_op_code(OpCode::Nil);
    }
  }

  /// Dispatches one statement, or compiles one expression.
  ///
  /// # Returns
  /// `None` for statements; for expressions, the kind of the
  /// token the expression started with.
  pub(crate) fn statement_or_expression(&mut self) -> Option<TokenKind> {
    if self.matches(TokenKind::FN) {
      // A name after `fn` makes it a declaration; otherwise the
      // keyword opens an anonymous function expression.
      if self.check(TokenKind::IDENTIFIER) {
        self.fn_declaration();
        return None;
      }
      return Some(self.expression_from_previous());
    }
    if self.matches(TokenKind::VAR) || self.matches(TokenKind::LET) {
      self.var_declaration();
      return None;
    }
    if self.matches(TokenKind::RETURN) {
      self.return_statement();
      return None;
    }
    if self.matches(TokenKind::WHILE) {
      self.while_statement();
      return None;
    }
    if self.matches(TokenKind::BREAK) {
      self.break_statement();
      return None;
    }
    if self.matches(TokenKind::CONTINUE) {
      self.continue_statement();
      return None;
    }
    Some(self.expression())
  }

  /// A `let`/`var` declaration. At the top level a declaration
  /// without an initializer forward-declares the global; locals
  /// must be initialized.
  pub(crate) fn var_declaration(&mut self) {
    let global_idx = self.parse_variable("Expect variable name.");

    if self.matches(TokenKind::EQUAL) {
      self.expression();
      self.define_variable(global_idx);
    } else if self.current_scope().scope_depth > 0 {
      self.error("Local variable should be initialized in declaration.");
    }

    self.consume(TokenKind::SEMICOLON, "Expect ';' after variable declaration.");
  }
}
