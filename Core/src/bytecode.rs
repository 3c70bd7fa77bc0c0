use num_derive::FromPrimitive;

/// The set of instructions supported by the virtual machine.
///
/// **NOTE:** Changing the order in which members are declared
/// changes the instruction encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum OpCode {
  /// Push a constant; one-byte pool index.
  Constant,
  /// Push a constant; three-byte pool index.
  ConstantLong,

  Nil,
  True,
  False,
  Pop,

  GetLocal,
  GetLocalLong,
  SetLocal,
  SetLocalLong,

  GetGlobal,
  GetGlobalLong,
  SetGlobal,
  SetGlobalLong,
  DefineGlobal,
  DefineGlobalLong,

  Equal,
  NotEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,

  Add,
  Subtract,
  Multiply,
  Divide,
  Not,
  Negate,

  /// Unconditional forward jump; two-byte offset.
  Jump,
  /// Forward jump when the top of the stack is falsey. Does not
  /// pop; the compiler emits the matching `Pop`.
  JumpIfFalse,
  /// Backward jump; two-byte offset.
  Loop,

  /// Pop N values, stringify and concatenate them, push the
  /// interned result. Emitted by string interpolation.
  BuildStr,

  /// Call the value below the arguments; one-byte argument count.
  /// Reserved: the core VM rejects it at runtime.
  Call,

  /// Pop N values beneath the top of the stack, keeping the top.
  /// Emitted when a block scope ends.
  EndScope,
  EndScopeLong,

  Return,

  // Reserved for a future closure extension. Never emitted by
  // the core compiler.
  Closure,
  ClosureLong,
  GetUpvalue,
  GetUpvalueLong,
  SetUpvalue,
  SetUpvalueLong,
}

impl OpCode {
  /// The number of operand bytes following the opcode. This table
  /// is authoritative: the compiler, the VM and the disassembler
  /// all decode through it.
  pub fn operand_count(self) -> usize {
    match self {
      OpCode::Nil
      | OpCode::True
      | OpCode::False
      | OpCode::Pop
      | OpCode::Equal
      | OpCode::NotEqual
      | OpCode::Greater
      | OpCode::GreaterEqual
      | OpCode::Less
      | OpCode::LessEqual
      | OpCode::Add
      | OpCode::Subtract
      | OpCode::Multiply
      | OpCode::Divide
      | OpCode::Not
      | OpCode::Negate
      | OpCode::Return => 0,

      OpCode::Constant
      | OpCode::GetLocal
      | OpCode::SetLocal
      | OpCode::GetGlobal
      | OpCode::SetGlobal
      | OpCode::DefineGlobal
      | OpCode::BuildStr
      | OpCode::Call
      | OpCode::EndScope
      | OpCode::Closure
      | OpCode::GetUpvalue
      | OpCode::SetUpvalue => 1,

      OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop => 2,

      OpCode::ConstantLong
      | OpCode::GetLocalLong
      | OpCode::SetLocalLong
      | OpCode::GetGlobalLong
      | OpCode::SetGlobalLong
      | OpCode::DefineGlobalLong
      | OpCode::EndScopeLong
      | OpCode::ClosureLong
      | OpCode::GetUpvalueLong
      | OpCode::SetUpvalueLong => 3,
    }
  }

  /// The three-byte-operand form of a one-byte-operand
  /// instruction. Used by the compiler when an index does not fit
  /// in a single byte.
  pub fn long_variant(self) -> OpCode {
    match self {
      OpCode::Constant => OpCode::ConstantLong,
      OpCode::GetLocal => OpCode::GetLocalLong,
      OpCode::SetLocal => OpCode::SetLocalLong,
      OpCode::GetGlobal => OpCode::GetGlobalLong,
      OpCode::SetGlobal => OpCode::SetGlobalLong,
      OpCode::DefineGlobal => OpCode::DefineGlobalLong,
      OpCode::EndScope => OpCode::EndScopeLong,
      OpCode::Closure => OpCode::ClosureLong,
      OpCode::GetUpvalue => OpCode::GetUpvalueLong,
      OpCode::SetUpvalue => OpCode::SetUpvalueLong,
      _ => unreachable!("Instruction has no long form."),
    }
  }

  /// The display name used by the disassembler.
  pub fn name(self) -> &'static str {
    match self {
      OpCode::Constant => "CONSTANT",
      OpCode::ConstantLong => "CONSTANT_LONG",
      OpCode::Nil => "NIL",
      OpCode::True => "TRUE",
      OpCode::False => "FALSE",
      OpCode::Pop => "POP",
      OpCode::GetLocal => "GET_LOCAL",
      OpCode::GetLocalLong => "GET_LOCAL_LONG",
      OpCode::SetLocal => "SET_LOCAL",
      OpCode::SetLocalLong => "SET_LOCAL_LONG",
      OpCode::GetGlobal => "GET_GLOBAL",
      OpCode::GetGlobalLong => "GET_GLOBAL_LONG",
      OpCode::SetGlobal => "SET_GLOBAL",
      OpCode::SetGlobalLong => "SET_GLOBAL_LONG",
      OpCode::DefineGlobal => "DEFINE_GLOBAL",
      OpCode::DefineGlobalLong => "DEFINE_GLOBAL_LONG",
      OpCode::Equal => "EQUAL",
      OpCode::NotEqual => "NOT_EQUAL",
      OpCode::Greater => "GREATER",
      OpCode::GreaterEqual => "GREATER_EQUAL",
      OpCode::Less => "LESS",
      OpCode::LessEqual => "LESS_EQUAL",
      OpCode::Add => "ADD",
      OpCode::Subtract => "SUBTRACT",
      OpCode::Multiply => "MULTIPLY",
      OpCode::Divide => "DIVIDE",
      OpCode::Not => "NOT",
      OpCode::Negate => "NEGATE",
      OpCode::Jump => "JUMP",
      OpCode::JumpIfFalse => "JUMP_IF_FALSE",
      OpCode::Loop => "LOOP",
      OpCode::BuildStr => "BUILD_STR",
      OpCode::Call => "CALL",
      OpCode::EndScope => "END_SCOPE",
      OpCode::EndScopeLong => "END_SCOPE_LONG",
      OpCode::Return => "RETURN",
      OpCode::Closure => "CLOSURE",
      OpCode::ClosureLong => "CLOSURE_LONG",
      OpCode::GetUpvalue => "GET_UPVALUE",
      OpCode::GetUpvalueLong => "GET_UPVALUE_LONG",
      OpCode::SetUpvalue => "SET_UPVALUE",
      OpCode::SetUpvalueLong => "SET_UPVALUE_LONG",
    }
  }
}
