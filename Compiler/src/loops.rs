use tx_core::bytecode::OpCode;
use tx_core::tokens::TokenKind;

use crate::Compiler;

/// An enclosing loop, as seen by `break` and `continue`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Loop {
  /// The chunk offset the loop jumps back to.
  pub start: usize,
  /// `loop` expressions carry a value out through `break expr;`;
  /// `while` loops do not.
  pub is_loop_expr: bool,
  /// The scope depth surrounding the loop. Locals above it are
  /// discarded before branching out.
  pub scope_depth: i32,
}

/// A `break` jump waiting to be patched when its loop ends.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BreakSite {
  pub loop_start: usize,
  /// The chunk offset of the jump operand.
  pub position: usize,
}

impl<'src, 'ctx> Compiler<'src, 'ctx> {
  fn begin_loop(&mut self, start: usize, is_loop_expr: bool) {
    let scope_depth = self.current_scope().scope_depth;
    self.current_scope_mut().loops.push(Loop {
      start,
      is_loop_expr,
      scope_depth,
    });
  }

  /// Closes the innermost loop and patches every `break` recorded
  /// for it to land one past the loop's final instruction.
  fn end_loop(&mut self) {
    let finished = self
      .current_scope_mut()
      .loops
      .pop()
      .expect("end_loop without begin_loop.");

    let mut sites = vec![];
    self.current_scope_mut().breaks.retain(|site| {
      if site.loop_start == finished.start {
        sites.push(site.position);
        false
      } else {
        true
      }
    });
    for position in sites {
      self.patch_jump(position);
    }
  }

  /// `while cond { body }` — a statement, not an expression.
  pub(crate) fn while_statement(&mut self) {
    let loop_start = self.current_scope().chunk.len();
    self.begin_loop(loop_start, false);

    self.expression();
    let exit_jump = self.emit_jump(OpCode::JumpIfFalse);
    self.emit_op_code(OpCode::Pop);

    self.consume(TokenKind::LEFT_BRACE, "Expect '{' before while body.");
    self.block();
    self.emit_op_code(OpCode::Pop);

    self.emit_loop(loop_start);
    self.patch_jump(exit_jump);
    self.emit_op_code(OpCode::Pop);

    self.end_loop();
    self.matches(TokenKind::SEMICOLON);
  }

  /// `loop { body }` — an expression whose value is delivered by
  /// `break expr;` (or `nil` for a bare `break;`).
  pub(crate) fn loop_expr(&mut self) {
    let loop_start = self.current_scope().chunk.len();
    self.begin_loop(loop_start, true);

    self.consume(TokenKind::LEFT_BRACE, "Expect '{' after 'loop'.");
    self.block();
    self.emit_op_code(OpCode::Pop);

    self.emit_loop(loop_start);
    self.end_loop();
  }

  pub(crate) fn break_statement(&mut self) {
    let innermost = match self.current_scope().loops.last().copied() {
      Some(found) => found,
      None => {
        self.error("Can't use 'break' outside of a loop.");
        return;
      }
    };

    if innermost.is_loop_expr {
      if self.matches(TokenKind::SEMICOLON) {
        self.emit_op_code(OpCode::Nil);
      } else {
        self.expression();
        self.consume(TokenKind::SEMICOLON, "Expect ';' after break return expression.");
      }
    } else {
      self.consume(TokenKind::SEMICOLON, "Expect ';' after 'break'.");
    }

    // Locals of the scopes being abandoned die here. A loop
    // expression keeps its break value on top, so they come off
    // from underneath it.
    let dead_locals = self.locals_above_depth(innermost.scope_depth);
    if innermost.is_loop_expr {
      if dead_locals > 0 {
        self.emit_var_length(OpCode::EndScope, dead_locals);
      }
    } else {
      for _ in 0..dead_locals {
        self.emit_op_code(OpCode::Pop);
      }
    }

    let position = self.emit_jump(OpCode::Jump);
    self.current_scope_mut().breaks.push(BreakSite {
      loop_start: innermost.start,
      position,
    });
  }

  pub(crate) fn continue_statement(&mut self) {
    let innermost = match self.current_scope().loops.last().copied() {
      Some(found) => found,
      None => {
        self.error("Can't use 'continue' outside of a loop.");
        return;
      }
    };

    self.consume(TokenKind::SEMICOLON, "Expect ';' after 'continue'.");

    let dead_locals = self.locals_above_depth(innermost.scope_depth);
    for _ in 0..dead_locals {
      self.emit_op_code(OpCode::Pop);
    }
    self.emit_loop(innermost.start);
  }

  /// How many locals sit above the given scope depth. They are
  /// not removed from the compiler's list; only their runtime
  /// slots are popped on the branching path.
  fn locals_above_depth(&self, depth: i32) -> usize {
    self
      .current_scope()
      .locals
      .iter()
      .rev()
      .take_while(|local| local.depth > depth)
      .count()
  }
}
