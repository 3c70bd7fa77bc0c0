use tx_core::bytecode::OpCode;
use tx_core::tokens::{Token, TokenKind};
use tx_core::LOCALS_MAX;

use crate::{Compiler, Local};

impl<'src, 'ctx> Compiler<'src, 'ctx> {
  /// The prefix rule for identifiers: a variable reference, or an
  /// assignment when an `=` follows at assignable precedence.
  pub(crate) fn variable(&mut self, can_assign: bool) {
    let name = self.previous.clone();
    self.named_variable(&name, can_assign);
  }

  fn named_variable(&mut self, name: &Token<'src>, can_assign: bool) {
    let get_op;
    let set_op;
    let index;
    let is_const;

    if let Some(local_idx) = self.resolve_local(name.lexeme) {
      get_op = OpCode::GetLocal;
      set_op = OpCode::SetLocal;
      index = local_idx;
      is_const = self.current_scope().locals[local_idx].is_const;
    } else {
      let interned = self.strings.intern(name.lexeme);
      match self.globals.index_of(&interned) {
        Some(global_idx) => {
          let info = self.globals.info(global_idx);
          // At the top level the definition order is the
          // execution order, so a forward-declared global cannot
          // have a value yet.
          if self.current_scope().scope_depth == 0 && !info.is_defined {
            self.error("Use of forward declared global before definition.");
          }
          get_op = OpCode::GetGlobal;
          set_op = OpCode::SetGlobal;
          index = global_idx;
          is_const = info.is_const;
        }
        None => {
          self.error("Cannot find value with this name in current scope.");
          return;
        }
      }
    }

    if can_assign && self.matches(TokenKind::EQUAL) {
      if is_const {
        self.error("Immutable assignment target.");
      }
      self.expression();
      self.emit_var_length(set_op, index);
    } else {
      self.emit_var_length(get_op, index);
    }
  }

  /// Searches the locals of the current function, most recent
  /// first.
  fn resolve_local(&mut self, name: &str) -> Option<usize> {
    let scope = self.current_scope();
    let mut found = None;
    for (index, local) in scope.locals.iter().enumerate().rev() {
      if local.name == name {
        found = Some((index, local.depth == -1));
        break;
      }
    }
    match found {
      Some((index, uninitialized)) => {
        if uninitialized {
          self.error("Can't read local variable in its own initializer.");
        }
        Some(index)
      }
      None => None,
    }
  }

  /// Consumes a variable name and declares it in the current
  /// scope. `let` introduces an immutable binding, `var` a
  /// mutable one.
  ///
  /// # Returns
  /// The global index for top-level declarations; `None` for
  /// locals (and after a parse error).
  pub(crate) fn parse_variable(&mut self, message: &str) -> Option<usize> {
    let is_const = self.previous.kind != TokenKind::VAR;
    if !self.matches(TokenKind::IDENTIFIER) {
      self.error_at_current(message);
      return None;
    }
    if self.current_scope().scope_depth > 0 {
      self.declare_local_variable(is_const);
      None
    } else {
      Some(self.declare_global_variable(is_const))
    }
  }

  fn declare_local_variable(&mut self, is_const: bool) {
    let name = self.previous.lexeme;

    let scope = self.current_scope();
    let mut duplicate = false;
    for local in scope.locals.iter().rev() {
      if local.depth != -1 && local.depth < scope.scope_depth {
        break;
      }
      if local.name == name {
        duplicate = true;
        break;
      }
    }
    if duplicate {
      self.error("Already a variable with this name in this scope.");
    }
    self.add_local(name, is_const);
  }

  fn add_local(&mut self, name: &'src str, is_const: bool) {
    if self.current_scope().locals.len() == LOCALS_MAX {
      self.error("Too many local variables in function.");
      return;
    }
    self.current_scope_mut().locals.push(Local {
      name,
      depth: -1,
      is_const,
    });
  }

  /// Declares (or re-declares) a top-level global, enforcing the
  /// forward-declare/define protocol.
  fn declare_global_variable(&mut self, is_const: bool) -> usize {
    let name = self.strings.intern(self.previous.lexeme);

    if let Some(index) = self.globals.index_of(&name) {
      let info = self.globals.info(index);
      if info.is_const == is_const {
        // Defining a forward-declared global is the point of the
        // protocol; redefining a defined one needs the host's
        // permission.
        if info.is_defined && !self.options.allow_global_redefinition {
          self.error("Redefinition of global variable.");
        }
      } else {
        self.error("Redeclaration of global variable.");
      }
      return index;
    }
    self.globals.declare(name, is_const)
  }

  /// Marks the just-declared variable as usable: globals become
  /// defined, the newest local gets its scope depth.
  pub(crate) fn mark_initialized(&mut self, global_idx: Option<usize>) {
    if self.current_scope().scope_depth == 0 {
      if let Some(index) = global_idx {
        self.globals.mark_defined(index);
      }
      return;
    }
    let depth = self.current_scope().scope_depth;
    if let Some(local) = self.current_scope_mut().locals.last_mut() {
      local.depth = depth;
    }
  }

  /// Finishes a declaration whose initializer sits on the stack:
  /// globals move into their table slot, locals simply stay where
  /// they are.
  pub(crate) fn define_variable(&mut self, global_idx: Option<usize>) {
    self.mark_initialized(global_idx);
    if self.current_scope().scope_depth == 0 {
      if let Some(index) = global_idx {
        self.emit_var_length(OpCode::DefineGlobal, index);
      }
    }
  }
}
