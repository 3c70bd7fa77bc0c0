use tx_core::bytecode::OpCode;
use tx_core::objects::Object;
use tx_core::tokens::{Literal, TokenKind};
use tx_core::values::Value;

use crate::precedence::{get_rule, ParseFn, Precedence};
use crate::Compiler;

impl<'src, 'ctx> Compiler<'src, 'ctx> {
  /// Compiles one expression.
  ///
  /// # Returns
  /// The kind of the token the expression started with, so that
  /// callers can tell block-valued expressions apart.
  pub(crate) fn expression(&mut self) -> TokenKind {
    self.parse_precedence(Precedence::Assignment, true)
  }

  /// Compiles an expression whose leading token has already been
  /// consumed (it is in `previous`).
  pub(crate) fn expression_from_previous(&mut self) -> TokenKind {
    self.parse_precedence(Precedence::Assignment, false)
  }

  /// The Pratt core: consume the prefix rule of the leading
  /// token, then fold in infix rules of at least the requested
  /// precedence.
  pub(crate) fn parse_precedence(&mut self, precedence: Precedence, do_advance: bool) -> TokenKind {
    if do_advance {
      self.advance();
    }
    let lead = self.previous.kind;

    let prefix = match get_rule(lead).prefix {
      Some(rule) => rule,
      None => {
        self.error("Expect expression.");
        return TokenKind::ERROR;
      }
    };

    // Assignment is only legal when parsing started at the
    // lowest expression precedence.
    let can_assign = precedence <= Precedence::Assignment;
    self.dispatch_prefix(prefix, can_assign);

    while precedence <= get_rule(self.current.kind).precedence {
      self.advance();
      if let Some(infix) = get_rule(self.previous.kind).infix {
        self.dispatch_infix(infix);
      }
    }

    if can_assign && self.matches(TokenKind::EQUAL) {
      self.error("Invalid assignment target.");
    }
    lead
  }

  fn dispatch_prefix(&mut self, rule: ParseFn, can_assign: bool) {
    match rule {
      ParseFn::Grouping => self.grouping(),
      ParseFn::Unary => self.unary(),
      ParseFn::Literal => self.literal(),
      ParseFn::Interpolation => self.string_interpolation(),
      ParseFn::Variable => self.variable(can_assign),
      ParseFn::Block => self.block(),
      ParseFn::If => self.if_expr(),
      ParseFn::Loop => self.loop_expr(),
      ParseFn::Fn => self.fn_expr(),
      _ => unreachable!("Not a prefix rule."),
    }
  }

  fn dispatch_infix(&mut self, rule: ParseFn) {
    match rule {
      ParseFn::Binary => self.binary(),
      ParseFn::And => self.and_op(),
      ParseFn::Or => self.or_op(),
      ParseFn::Call => self.call(),
      _ => unreachable!("Not an infix rule."),
    }
  }

  /// `( expression )`
  fn grouping(&mut self) {
    self.expression();
    self.consume(TokenKind::RIGHT_PAREN, "Expect ')' after expression.");
  }

  /// Unary `!` and `-`.
  fn unary(&mut self) {
    let operator = self.previous.kind;
    self.parse_precedence(Precedence::Unary, true);
    match operator {
      TokenKind::BANG => self.emit_op_code(OpCode::Not),
      TokenKind::MINUS => self.emit_op_code(OpCode::Negate),
      _ => unreachable!("Not a unary operator."),
    }
  }

  /// Binary arithmetic, comparison and equality operators. The
  /// left operand has already been compiled.
  fn binary(&mut self) {
    let operator = self.previous.kind;
    let rule_precedence = get_rule(operator).precedence;
    self.parse_precedence(rule_precedence.next(), true);

    match operator {
      TokenKind::BANG_EQUAL => self.emit_op_code(OpCode::NotEqual),
      TokenKind::EQUAL_EQUAL => self.emit_op_code(OpCode::Equal),
      TokenKind::LESS => self.emit_op_code(OpCode::Less),
      TokenKind::LESS_EQUAL => self.emit_op_code(OpCode::LessEqual),
      TokenKind::GREATER => self.emit_op_code(OpCode::Greater),
      TokenKind::GREATER_EQUAL => self.emit_op_code(OpCode::GreaterEqual),
      TokenKind::PLUS => self.emit_op_code(OpCode::Add),
      TokenKind::MINUS => self.emit_op_code(OpCode::Subtract),
      TokenKind::STAR => self.emit_op_code(OpCode::Multiply),
      TokenKind::SLASH => self.emit_op_code(OpCode::Divide),
      _ => unreachable!("Not a binary operator."),
    }
  }

  /// Literal tokens: `nil`, `true`, `false` and the number,
  /// char and string literals decoded by the scanner.
  fn literal(&mut self) {
    match self.previous.kind {
      TokenKind::NIL => self.emit_op_code(OpCode::Nil),
      TokenKind::TRUE => self.emit_op_code(OpCode::True),
      TokenKind::FALSE => self.emit_op_code(OpCode::False),
      TokenKind::INTEGER_LITERAL
      | TokenKind::FLOAT_LITERAL
      | TokenKind::CHAR_LITERAL
      | TokenKind::STRING_LITERAL => {
        let value = self.literal_value();
        self.emit_constant(value);
      }
      _ => unreachable!("Not a literal token."),
    }
  }

  /// Converts the previous token's decoded literal into a runtime
  /// value, interning string payloads.
  pub(crate) fn literal_value(&mut self) -> Value {
    match self.previous.literal.clone() {
      Some(Literal::Int(value)) => Value::Int(value),
      Some(Literal::Float(value)) => Value::Float(value),
      Some(Literal::Char(value)) => Value::Char(value),
      Some(Literal::Str(text)) => Value::Obj(Object::Str(self.strings.intern(&text))),
      None => unreachable!("Literal token without a decoded value."),
    }
  }

  /// An interpolated string: the scanner delivers
  /// `STRING_INTERP (expr STRING_INTERP)* expr STRING_LITERAL`;
  /// each part is pushed and `BUILD_STR` assembles them.
  fn string_interpolation(&mut self) {
    let mut parts: usize = 0;

    let prefix = self.literal_value();
    self.emit_constant(prefix);
    parts += 1;

    loop {
      self.expression();
      parts += 1;

      if self.matches(TokenKind::STRING_INTERP) {
        let part = self.literal_value();
        self.emit_constant(part);
        parts += 1;
        continue;
      }

      self.consume(TokenKind::STRING_LITERAL, "Expect end of string interpolation.");
      if self.previous.kind == TokenKind::STRING_LITERAL {
        let tail = self.literal_value();
        self.emit_constant(tail);
        parts += 1;
      }
      break;
    }

    if parts > u8::MAX as usize {
      self.error("Too many parts in string interpolation.");
      return;
    }
    self.emit_with_byte(OpCode::BuildStr, parts as u8);
  }

  /// `and` short-circuits past the right operand when the left
  /// one is falsey.
  fn and_op(&mut self) {
    let end_jump = self.emit_jump(OpCode::JumpIfFalse);
    self.emit_op_code(OpCode::Pop);
    self.parse_precedence(Precedence::And, true);
    self.patch_jump(end_jump);
  }

  /// `or` short-circuits past the right operand when the left
  /// one is truthy.
  fn or_op(&mut self) {
    let else_jump = self.emit_jump(OpCode::JumpIfFalse);
    let end_jump = self.emit_jump(OpCode::Jump);
    self.patch_jump(else_jump);
    self.emit_op_code(OpCode::Pop);
    self.parse_precedence(Precedence::Or, true);
    self.patch_jump(end_jump);
  }

  /// A call suffix `(args...)` on the compiled callee.
  fn call(&mut self) {
    let arg_count = self.argument_list();
    self.emit_with_byte(OpCode::Call, arg_count);
  }

  fn argument_list(&mut self) -> u8 {
    let mut arg_count: u8 = 0;
    loop {
      if self.check(TokenKind::RIGHT_PAREN) {
        break;
      }
      self.expression();
      if arg_count == u8::MAX {
        self.error("Can't have more than 255 arguments.");
      } else {
        arg_count += 1;
      }
      if !self.matches(TokenKind::COMMA) {
        break;
      }
    }
    self.consume(TokenKind::RIGHT_PAREN, "Expect ')' after arguments.");
    arg_count
  }

  /// A `{ ... }` block expression with its own scope.
  pub(crate) fn block(&mut self) {
    self.begin_scope();
    self.block_no_scope();
    self.end_scope();
  }

  /// The body of a block: statements and expressions up to the
  /// closing brace. A trailing expression without `;` becomes the
  /// block's value; otherwise the block yields `nil`.
  pub(crate) fn block_no_scope(&mut self) {
    let mut has_final_expression = false;

    while !self.check(TokenKind::RIGHT_BRACE) && !self.check(TokenKind::EOF) {
      if let Some(expr_kind) = self.statement_or_expression() {
        match self.current.kind {
          TokenKind::RIGHT_BRACE => has_final_expression = true,
          TokenKind::SEMICOLON => {
            self.advance();
            self.emit_op_code(OpCode::Pop);
          }
          _ if crate::statements::is_block_expr(expr_kind) => {
            // A block-valued expression in statement position
            // needs no `;`; its value is dropped.
            self.emit_op_code(OpCode::Pop);
          }
          _ => self.error_at_current("Expect ';' or '}' after expression inside block."),
        }
      }
    }

    self.consume(TokenKind::RIGHT_BRACE, "Expect '}' after block.");
    if !has_final_expression {
      self.emit_op_code(OpCode::Nil);
    }
  }

  /// An `if`/`else [if]` expression. A missing `else` branch
  /// yields `nil`.
  pub(crate) fn if_expr(&mut self) {
    self.expression();
    let then_jump = self.emit_jump(OpCode::JumpIfFalse);
    self.emit_op_code(OpCode::Pop);

    self.consume(TokenKind::LEFT_BRACE, "Expect '{' before if body.");
    self.block();
    let else_jump = self.emit_jump(OpCode::Jump);

    self.patch_jump(then_jump);
    self.emit_op_code(OpCode::Pop);

    if self.matches(TokenKind::ELSE) {
      match self.current.kind {
        TokenKind::IF => {
          self.advance();
          self.if_expr();
        }
        TokenKind::LEFT_BRACE => {
          self.advance();
          self.block();
        }
        _ => self.error_at_current("Expect '{' before else body."),
      }
    } else {
      self.emit_op_code(OpCode::Nil);
    }
    self.patch_jump(else_jump);
  }

  /// An anonymous `fn` expression. The empty name keeps it apart
  /// from the nameless script function.
  fn fn_expr(&mut self) {
    let name = self.strings.intern("");
    self.function(crate::FunctionKind::Function, Some(name));
  }
}
