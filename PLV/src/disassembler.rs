use tx_core::bytecode::OpCode;
use tx_core::chunk::Chunk;

/// Disassembles a whole chunk under a banner with its name.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) {
  println!("=={:=^40}==", name);
  let mut offset = 0;
  while offset < chunk.len() {
    offset = disassemble_instruction(chunk, offset);
  }
}

/// Disassembles the instruction at the given offset and returns
/// the offset of the next one. Decoding is driven by the opcode
/// operand-count table, so this walks exactly the boundaries the
/// VM executes.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> usize {
  print!("{:04} ", offset);

  let line = chunk.get_line(offset);
  if offset > 0 && line == chunk.get_line(offset - 1) {
    print!("   | ");
  } else {
    print!("{:4} ", line);
  }

  let op = chunk.get_op_code(offset);
  match op {
    OpCode::Constant | OpCode::ConstantLong => constant_instruction(chunk, op, offset),
    OpCode::Jump | OpCode::JumpIfFalse => jump_instruction(chunk, op, offset, true),
    OpCode::Loop => jump_instruction(chunk, op, offset, false),
    _ => match op.operand_count() {
      0 => simple_instruction(op, offset),
      count => operand_instruction(chunk, op, offset, count),
    },
  }
}

fn read_operand(chunk: &Chunk, at: usize, count: usize) -> usize {
  match count {
    1 => chunk.get_byte(at) as usize,
    2 => chunk.get_short(at) as usize,
    _ => chunk.get_u24(at),
  }
}

fn simple_instruction(op: OpCode, offset: usize) -> usize {
  println!("{}", op.name());
  offset + 1
}

fn constant_instruction(chunk: &Chunk, op: OpCode, offset: usize) -> usize {
  let count = op.operand_count();
  let idx = read_operand(chunk, offset + 1, count);
  println!("{:<18} {:4} '{}'", op.name(), idx, chunk.get_constant(idx));
  offset + 1 + count
}

fn operand_instruction(chunk: &Chunk, op: OpCode, offset: usize, count: usize) -> usize {
  let operand = read_operand(chunk, offset + 1, count);
  println!("{:<18} {:4}", op.name(), operand);
  offset + 1 + count
}

fn jump_instruction(chunk: &Chunk, op: OpCode, offset: usize, forward: bool) -> usize {
  let jump = chunk.get_short(offset + 1) as usize;
  let target = if forward {
    offset + 3 + jump
  } else {
    offset + 3 - jump
  };
  println!("{:<18} {:4} -> {}", op.name(), offset, target);
  offset + 3
}
