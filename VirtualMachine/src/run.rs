use std::fmt::Write as _;

use tx_core::bytecode::OpCode;
use tx_core::chunk::Chunk;
use tx_core::errors::RuntimeErrorType;
use tx_core::objects::Object;
use tx_core::values::Value;
use tx_core::STACK_MAX;

use crate::{RuntimeResult, VM};

/// The outcome of one instruction: continue, or fail with an
/// error class and message. The dispatch loop attaches the line.
type StepResult = Result<(), (RuntimeErrorType, String)>;

impl VM {
  /// Executes the instructions in a chunk.
  pub(crate) fn run(&mut self, chunk: &Chunk) -> RuntimeResult {
    self.stack.clear();
    let mut ip: usize = 0;

    loop {
      if self.options.trace_execution {
        self.print_stack();
        plv::disassemble_instruction(chunk, ip);
      }

      let op_start = ip;
      let op = chunk.get_op_code(ip);
      ip += 1;

      let step: StepResult = match op {
        OpCode::Constant => {
          let idx = chunk.get_byte(ip) as usize;
          ip += 1;
          self.push(chunk.get_constant(idx).clone())
        }
        OpCode::ConstantLong => {
          let idx = chunk.get_u24(ip);
          ip += 3;
          self.push(chunk.get_constant(idx).clone())
        }

        OpCode::Nil => self.push(Value::Nil),
        OpCode::True => self.push(Value::Bool(true)),
        OpCode::False => self.push(Value::Bool(false)),
        OpCode::Pop => {
          self.pop();
          Ok(())
        }

        OpCode::GetLocal => {
          let slot = chunk.get_byte(ip) as usize;
          ip += 1;
          self.push(self.stack[slot].clone())
        }
        OpCode::GetLocalLong => {
          let slot = chunk.get_u24(ip);
          ip += 3;
          self.push(self.stack[slot].clone())
        }
        OpCode::SetLocal => {
          let slot = chunk.get_byte(ip) as usize;
          ip += 1;
          self.stack[slot] = self.peek(0).clone();
          Ok(())
        }
        OpCode::SetLocalLong => {
          let slot = chunk.get_u24(ip);
          ip += 3;
          self.stack[slot] = self.peek(0).clone();
          Ok(())
        }

        OpCode::GetGlobal => {
          let idx = chunk.get_byte(ip) as usize;
          ip += 1;
          self.get_global(idx)
        }
        OpCode::GetGlobalLong => {
          let idx = chunk.get_u24(ip);
          ip += 3;
          self.get_global(idx)
        }
        OpCode::SetGlobal => {
          let idx = chunk.get_byte(ip) as usize;
          ip += 1;
          self.set_global(idx)
        }
        OpCode::SetGlobalLong => {
          let idx = chunk.get_u24(ip);
          ip += 3;
          self.set_global(idx)
        }
        OpCode::DefineGlobal => {
          let idx = chunk.get_byte(ip) as usize;
          ip += 1;
          let value = self.pop();
          self.globals.set_value(idx, value);
          Ok(())
        }
        OpCode::DefineGlobalLong => {
          let idx = chunk.get_u24(ip);
          ip += 3;
          let value = self.pop();
          self.globals.set_value(idx, value);
          Ok(())
        }

        OpCode::Equal => {
          let rhs = self.pop();
          let lhs = self.pop();
          self.push(Value::Bool(lhs == rhs))
        }
        OpCode::NotEqual => {
          let rhs = self.pop();
          let lhs = self.pop();
          self.push(Value::Bool(lhs != rhs))
        }

        OpCode::Greater
        | OpCode::GreaterEqual
        | OpCode::Less
        | OpCode::LessEqual
        | OpCode::Add
        | OpCode::Subtract
        | OpCode::Multiply
        | OpCode::Divide => self.binary_number_op(op),

        OpCode::Not => {
          let value = self.pop();
          self.push(Value::Bool(value.is_falsey()))
        }
        OpCode::Negate => self.negate_op(),

        OpCode::Jump => {
          let offset = chunk.get_short(ip) as usize;
          ip += 2;
          ip += offset;
          Ok(())
        }
        OpCode::JumpIfFalse => {
          let offset = chunk.get_short(ip) as usize;
          ip += 2;
          // The condition stays; the compiler pops it on both
          // branches.
          if self.peek(0).is_falsey() {
            ip += offset;
          }
          Ok(())
        }
        OpCode::Loop => {
          let offset = chunk.get_short(ip) as usize;
          ip += 2;
          ip -= offset;
          Ok(())
        }

        OpCode::BuildStr => {
          let count = chunk.get_byte(ip) as usize;
          ip += 1;
          self.build_str(count)
        }

        OpCode::Call => {
          ip += 1; // the argument count
          Err((
            RuntimeErrorType::Internal,
            String::from("Function calls are not implemented."),
          ))
        }

        OpCode::EndScope => {
          let count = chunk.get_byte(ip) as usize;
          ip += 1;
          self.end_scope(count)
        }
        OpCode::EndScopeLong => {
          let count = chunk.get_u24(ip);
          ip += 3;
          self.end_scope(count)
        }

        OpCode::Return => {
          let value = self.pop();
          return RuntimeResult::Ok(value);
        }

        OpCode::Closure
        | OpCode::ClosureLong
        | OpCode::GetUpvalue
        | OpCode::GetUpvalueLong
        | OpCode::SetUpvalue
        | OpCode::SetUpvalueLong => Err((
          RuntimeErrorType::Internal,
          String::from("Reserved instruction."),
        )),
      };

      if let Err((error, message)) = step {
        return RuntimeResult::Error {
          error,
          message,
          line: chunk.get_line(op_start),
        };
      }
    }
  }

  fn push(&mut self, value: Value) -> StepResult {
    if self.stack.len() == STACK_MAX {
      return Err((
        RuntimeErrorType::StackOverflow,
        String::from("Stack overflow."),
      ));
    }
    self.stack.push(value);
    Ok(())
  }

  fn pop(&mut self) -> Value {
    match self.stack.pop() {
      Some(value) => value,
      // Underflow is a compiler bug, not a user error.
      None => panic!("Stack is empty!"),
    }
  }

  fn peek(&self, distance: usize) -> &Value {
    &self.stack[self.stack.len() - 1 - distance]
  }

  fn get_global(&mut self, idx: usize) -> StepResult {
    let value = self.globals.value(idx).clone();
    if value.is_none() {
      return Err((
        RuntimeErrorType::ReferenceError,
        String::from("Undefined variable."),
      ));
    }
    self.push(value)
  }

  fn set_global(&mut self, idx: usize) -> StepResult {
    if self.globals.value(idx).is_none() {
      return Err((
        RuntimeErrorType::ReferenceError,
        String::from("Undefined variable."),
      ));
    }
    // Assignment is an expression; its value stays on the stack.
    let value = self.peek(0).clone();
    self.globals.set_value(idx, value);
    Ok(())
  }

  /// Pops the block result, drops `count` dead locals beneath it
  /// and puts the result back.
  fn end_scope(&mut self, count: usize) -> StepResult {
    let result = self.pop();
    self.stack.truncate(self.stack.len() - count);
    self.push(result)
  }

  fn negate_op(&mut self) -> StepResult {
    let value = self.pop();
    match value {
      Value::Int(v) => self.push(Value::Int(v.wrapping_neg())),
      Value::Float(v) => self.push(Value::Float(-v)),
      _ => Err((
        RuntimeErrorType::TypeError,
        String::from("Operand must be a number."),
      )),
    }
  }

  /// Arithmetic and ordering over two numeric operands. Two ints
  /// stay in the int domain (wrapping on overflow); any float
  /// operand promotes both to floats. Ordering always produces a
  /// bool.
  fn binary_number_op(&mut self, op: OpCode) -> StepResult {
    if !self.peek(0).is_number() || !self.peek(1).is_number() {
      return Err((
        RuntimeErrorType::TypeError,
        String::from("Operands must be numbers."),
      ));
    }
    let rhs = self.pop();
    let lhs = self.pop();

    let result = if let (Value::Int(a), Value::Int(b)) = (&lhs, &rhs) {
      let (a, b) = (*a, *b);
      match op {
        OpCode::Add => Value::Int(a.wrapping_add(b)),
        OpCode::Subtract => Value::Int(a.wrapping_sub(b)),
        OpCode::Multiply => Value::Int(a.wrapping_mul(b)),
        OpCode::Divide => {
          if b == 0 {
            return Err((
              RuntimeErrorType::ZeroDivision,
              String::from("Division by zero."),
            ));
          }
          Value::Int(a.wrapping_div(b))
        }
        OpCode::Greater => Value::Bool(a > b),
        OpCode::GreaterEqual => Value::Bool(a >= b),
        OpCode::Less => Value::Bool(a < b),
        OpCode::LessEqual => Value::Bool(a <= b),
        _ => unreachable!("Not a binary numeric instruction."),
      }
    } else {
      let a = lhs.as_float_lossy();
      let b = rhs.as_float_lossy();
      match op {
        OpCode::Add => Value::Float(a + b),
        OpCode::Subtract => Value::Float(a - b),
        OpCode::Multiply => Value::Float(a * b),
        OpCode::Divide => Value::Float(a / b),
        OpCode::Greater => Value::Bool(a > b),
        OpCode::GreaterEqual => Value::Bool(a >= b),
        OpCode::Less => Value::Bool(a < b),
        OpCode::LessEqual => Value::Bool(a <= b),
        _ => unreachable!("Not a binary numeric instruction."),
      }
    };
    self.push(result)
  }

  /// Pops `count` values and pushes the interned concatenation of
  /// their textual forms, oldest first.
  fn build_str(&mut self, count: usize) -> StepResult {
    let mut parts = Vec::with_capacity(count);
    for _ in 0..count {
      parts.push(self.pop());
    }

    let mut text = String::new();
    for part in parts.iter().rev() {
      let _ = write!(text, "{}", part);
    }

    let object = self.strings.intern(&text);
    self.push(Value::Obj(Object::Str(object)))
  }

  fn print_stack(&self) {
    print!("          ");
    for slot in &self.stack {
      print!("[ {} ]", slot);
    }
    println!();
  }
}
