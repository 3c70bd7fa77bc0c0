use std::rc::Rc;

use crate::bytecode::OpCode;
use crate::chunk::Chunk;
use crate::globals::GlobalTable;
use crate::interner::StringInterner;
use crate::objects::Object;
use crate::values::Value;

#[test]
fn line_table_is_run_length_encoded() {
  let mut chunk = Chunk::new();

  chunk.write_line(1);
  chunk.push_op_code(OpCode::Nil);
  chunk.write_line(1);
  chunk.push_op_code(OpCode::Pop);
  chunk.write_line(3);
  chunk.push_op_code(OpCode::True);
  chunk.write_line(3);
  chunk.push_op_code(OpCode::Return);

  assert_eq!(chunk.get_line(0), 1);
  assert_eq!(chunk.get_line(1), 1);
  assert_eq!(chunk.get_line(2), 3);
  assert_eq!(chunk.get_line(3), 3);
}

#[test]
fn line_table_binary_search_spans_runs() {
  let mut chunk = Chunk::new();

  for line in 1..=20 {
    chunk.write_line(line);
    chunk.push_op_code(OpCode::Nil);
    chunk.push_op_code(OpCode::Pop);
  }

  for line in 1..=20usize {
    let offset = (line - 1) * 2;
    assert_eq!(chunk.get_line(offset), line);
    assert_eq!(chunk.get_line(offset + 1), line);
  }
}

#[test]
fn constant_pool_deduplicates_equal_values() {
  let mut chunk = Chunk::new();

  let a = chunk.add_constant(Value::Int(7)).unwrap();
  let b = chunk.add_constant(Value::Float(8.9)).unwrap();
  let c = chunk.add_constant(Value::Int(7)).unwrap();

  assert_eq!(a, c);
  assert_ne!(a, b);
  assert_eq!(chunk.pool_size(), 2);
}

#[test]
fn constant_pool_deduplicates_interned_strings() {
  let mut strings = StringInterner::new();
  let mut chunk = Chunk::new();

  let first = Value::Obj(Object::Str(strings.intern("hello")));
  let second = Value::Obj(Object::Str(strings.intern("hello")));
  let a = chunk.add_constant(first).unwrap();
  let b = chunk.add_constant(second).unwrap();

  assert_eq!(a, b);
  assert_eq!(chunk.pool_size(), 1);
}

#[test]
fn short_and_u24_operands_are_little_endian() {
  let mut chunk = Chunk::new();

  chunk.push_short(0x1234);
  assert_eq!(chunk.get_byte(0), 0x34);
  assert_eq!(chunk.get_byte(1), 0x12);
  assert_eq!(chunk.get_short(0), 0x1234);

  chunk.push_u24(0xabcdef);
  assert_eq!(chunk.get_byte(2), 0xef);
  assert_eq!(chunk.get_byte(3), 0xcd);
  assert_eq!(chunk.get_byte(4), 0xab);
  assert_eq!(chunk.get_u24(2), 0xabcdef);

  chunk.patch_short(0, 0xbeef);
  assert_eq!(chunk.get_short(0), 0xbeef);
}

#[test]
fn interning_makes_equal_content_pointer_equal() {
  let mut strings = StringInterner::new();

  let a = strings.intern("tx");
  let b = strings.intern("tx");
  let c = strings.intern("ty");

  assert!(Rc::ptr_eq(&a, &b));
  assert!(!Rc::ptr_eq(&a, &c));
  assert_eq!(strings.len(), 2);
  assert!(Rc::ptr_eq(&a, &strings.find("tx").unwrap()));
  assert!(strings.find("tz").is_none());
}

#[test]
fn value_equality_is_by_tag_then_payload() {
  assert_eq!(Value::Int(1), Value::Int(1));
  assert_ne!(Value::Int(1), Value::Float(1.0));
  assert_ne!(Value::Nil, Value::None);
  assert_ne!(Value::Bool(false), Value::Nil);

  let mut strings = StringInterner::new();
  let a = Value::Obj(Object::Str(strings.intern("x")));
  let b = Value::Obj(Object::Str(strings.intern("x")));
  assert_eq!(a, b);
}

#[test]
fn only_nil_and_false_are_falsey() {
  let mut strings = StringInterner::new();

  assert!(Value::Nil.is_falsey());
  assert!(Value::Bool(false).is_falsey());

  assert!(!Value::Bool(true).is_falsey());
  assert!(!Value::Int(0).is_falsey());
  assert!(!Value::Float(0.0).is_falsey());
  assert!(!Value::Char('\0').is_falsey());
  assert!(!Value::Obj(Object::Str(strings.intern(""))).is_falsey());
}

#[test]
fn globals_follow_the_declare_define_protocol() {
  let mut strings = StringInterner::new();
  let mut globals = GlobalTable::new();

  let name = strings.intern("answer");
  assert!(globals.index_of(&name).is_none());

  let idx = globals.declare(Rc::clone(&name), true);
  assert_eq!(globals.index_of(&name), Some(idx));
  assert!(!globals.info(idx).is_defined);
  assert!(globals.value(idx).is_none());
  assert!(!globals.all_defined());

  globals.set_value(idx, Value::Int(42));
  globals.mark_defined(idx);
  assert!(globals.all_defined());
  assert_eq!(globals.value(idx), &Value::Int(42));
}

#[test]
fn float_display_keeps_trailing_decimal() {
  assert_eq!(Value::Float(3.0).to_string(), "3.0");
  assert_eq!(Value::Float(2.5).to_string(), "2.5");
  assert_eq!(Value::Int(3).to_string(), "3");
}

#[test]
fn every_opcode_has_a_stable_operand_count() {
  use num_traits::FromPrimitive;

  let mut byte = 0u8;
  while let Some(op) = <OpCode as FromPrimitive>::from_u8(byte) {
    assert!(op.operand_count() <= 3);
    assert_eq!(op.name().is_empty(), false);
    byte += 1;
  }
  // The encoding covers the full reserved set.
  assert_eq!(byte, OpCode::SetUpvalueLong as u8 + 1);
}
