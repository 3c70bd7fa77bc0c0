use tx_core::objects::Object;
use tx_core::values::Value;
use tx_core::VmOptions;

use crate::{InterpretResult, VM};

fn run_ok(source: &str) -> VM {
  let mut vm = VM::default();
  match vm.interpret(source) {
    InterpretResult::Ok => {}
    InterpretResult::CompileError => panic!("compile error for: {}", source),
    InterpretResult::RuntimeError => panic!("runtime error for: {}", source),
  }
  vm
}

fn value_of(source: &str) -> Value {
  run_ok(source).last_value().clone()
}

fn str_of(source: &str) -> String {
  match value_of(source) {
    Value::Obj(Object::Str(s)) => s.content.clone(),
    other => panic!("expected a string, got {:?}", other),
  }
}

fn compile_error(source: &str) -> bool {
  matches!(VM::default().interpret(source), InterpretResult::CompileError)
}

fn runtime_error(source: &str) -> bool {
  matches!(VM::default().interpret(source), InterpretResult::RuntimeError)
}

#[test]
fn statement_scripts_yield_nothing() {
  let vm = run_ok("1 + 2 * 3;");
  assert!(vm.last_value().is_nil());
  assert!(vm.stack.is_empty());
}

#[test]
fn trailing_expression_is_the_script_result() {
  assert_eq!(value_of("let x = 10; x + 5"), Value::Int(15));
}

#[test]
fn block_shadowing_leaves_outer_variables_alone() {
  let vm = run_ok("var x = 1; { var x = 2; x }");
  assert_eq!(vm.last_value(), &Value::Int(2));

  let name = vm.strings.find("x").unwrap();
  let index = vm.globals.index_of(&name).unwrap();
  assert_eq!(vm.globals.value(index), &Value::Int(1));
  assert!(vm.stack.is_empty());
}

#[test]
fn if_is_an_expression() {
  assert_eq!(value_of("if true { 1 } else { 2 }"), Value::Int(1));
  assert_eq!(value_of("if false { 1 } else { 2 }"), Value::Int(2));
  assert_eq!(value_of("if false { 1 }"), Value::Nil);
  assert_eq!(
    value_of("if false { 1 } else if true { 2 } else { 3 }"),
    Value::Int(2)
  );
}

#[test]
fn while_loops_run_to_their_condition() {
  assert_eq!(value_of("var i = 0; while i < 3 { i = i + 1; } i"), Value::Int(3));
}

#[test]
fn loop_expressions_deliver_their_break_value() {
  assert_eq!(
    value_of("var n = 0; loop { if n == 5 { break n; } n = n + 1; }"),
    Value::Int(5)
  );
  assert_eq!(value_of("loop { break; }"), Value::Nil);
  assert_eq!(value_of("loop { var x = 7; break x; }"), Value::Int(7));
}

#[test]
fn break_and_continue_balance_the_stack() {
  let vm = run_ok("var i = 0; while true { if i == 2 { break; } i = i + 1; } i");
  assert_eq!(vm.last_value(), &Value::Int(2));
  assert!(vm.stack.is_empty());

  let vm = run_ok(
    "var i = 0; var n = 0; while i < 5 { i = i + 1; if i == 2 { continue; } n = n + 1; } n",
  );
  assert_eq!(vm.last_value(), &Value::Int(4));
  assert!(vm.stack.is_empty());
}

#[test]
fn nested_loops_break_the_innermost() {
  let source = "var total = 0;\n\
                var i = 0;\n\
                while i < 3 {\n\
                  i = i + 1;\n\
                  var j = 0;\n\
                  while true {\n\
                    j = j + 1;\n\
                    if j == 2 { break; }\n\
                  }\n\
                  total = total + j;\n\
                }\n\
                total";
  assert_eq!(value_of(source), Value::Int(6));
}

#[test]
fn interpolation_stringifies_and_concatenates() {
  assert_eq!(str_of("\"a${1 + 2}b\""), "a3b");
  assert_eq!(str_of("\"${1.5} and ${true}\""), "1.5 and true");
  assert_eq!(str_of("let who = \"tx\"; \"hi ${who}!\""), "hi tx!");
  assert_eq!(str_of("\"${\"x${40 + 2}\"}!\""), "x42!");
}

#[test]
fn runtime_built_strings_are_interned() {
  // A string assembled at runtime must be identity-equal to the
  // equal literal.
  assert_eq!(value_of("\"ab\" == \"a${\"b\"}\""), Value::Bool(true));
  assert_eq!(value_of("\"x\" == \"x\""), Value::Bool(true));
  assert_eq!(value_of("\"x\" == \"y\""), Value::Bool(false));
}

#[test]
fn arithmetic_promotes_int_to_float() {
  assert_eq!(value_of("1 + 2"), Value::Int(3));
  assert_eq!(value_of("1 + 2.5"), Value::Float(3.5));
  assert_eq!(value_of("7 / 2"), Value::Int(3));
  assert_eq!(value_of("7.0 / 2"), Value::Float(3.5));
  assert_eq!(value_of("-(3)"), Value::Int(-3));
  assert_eq!(value_of("-(3.5)"), Value::Float(-3.5));
}

#[test]
fn comparisons_mix_numeric_types() {
  assert_eq!(value_of("1 < 2"), Value::Bool(true));
  assert_eq!(value_of("2.5 >= 2"), Value::Bool(true));
  assert_eq!(value_of("3 <= 2.5"), Value::Bool(false));
}

#[test]
fn equality_never_raises() {
  assert_eq!(value_of("1 == 1.0"), Value::Bool(false));
  assert_eq!(value_of("nil == false"), Value::Bool(false));
  assert_eq!(value_of("nil == nil"), Value::Bool(true));
  assert_eq!(value_of("1 != \"1\""), Value::Bool(true));
}

#[test]
fn falsey_is_exactly_nil_and_false() {
  assert_eq!(value_of("!nil"), Value::Bool(true));
  assert_eq!(value_of("!false"), Value::Bool(true));
  assert_eq!(value_of("!true"), Value::Bool(false));
  assert_eq!(value_of("!0"), Value::Bool(false));
  assert_eq!(value_of("!0.0"), Value::Bool(false));
  assert_eq!(value_of("!\"\""), Value::Bool(false));
  assert_eq!(value_of("!'\\0'"), Value::Bool(false));
}

#[test]
fn logic_operators_short_circuit() {
  assert_eq!(value_of("false and 1"), Value::Bool(false));
  assert_eq!(value_of("true and 7"), Value::Int(7));
  assert_eq!(value_of("nil or 3"), Value::Int(3));
  assert_eq!(value_of("1 or 2"), Value::Int(1));
  // The right side must not run when short-circuited.
  assert_eq!(value_of("var hit = 0; true or (hit = 1); hit"), Value::Int(0));
}

#[test]
fn undeclared_names_fail_to_compile() {
  assert!(compile_error("x"));
  assert!(compile_error("let x = 1; x = 2;"));
}

#[test]
fn forward_declared_globals_fail_at_runtime_until_defined() {
  // The block read compiles (definition order is unknown inside
  // a block) but executes before the definition.
  assert!(runtime_error("var y; { y }; var y = 1;"));
  assert!(runtime_error("var y; { y = 2; }; var y = 1;"));
  // Defining first works.
  assert_eq!(value_of("var y; var y = 1; { y }"), Value::Int(1));
}

#[test]
fn type_errors_surface_as_runtime_errors() {
  assert!(runtime_error("1 + true;"));
  assert!(runtime_error("\"a\" + \"b\";"));
  assert!(runtime_error("-nil;"));
  assert!(runtime_error("1 < \"2\";"));
}

#[test]
fn integer_division_by_zero_is_a_runtime_error() {
  assert!(runtime_error("1 / 0;"));
  assert_eq!(value_of("1.0 / 0.0"), Value::Float(f64::INFINITY));
}

#[test]
fn calls_are_not_implemented_in_the_core() {
  assert!(runtime_error("fn f() { 1 } f()"));
}

#[test]
fn functions_are_first_class_values() {
  let value = value_of("fn f(a) { a } f");
  assert!(matches!(value, Value::Obj(Object::Func(_))));
  assert_eq!(str_of("\"${fn (x) { x }}\""), "<fn >");
  assert_eq!(str_of("fn f() { 1 } \"${f}\""), "<fn f>");
}

#[test]
fn deep_expression_nesting_overflows_the_stack() {
  let mut source = String::from("0");
  for _ in 0..300 {
    source.push_str(" + (1");
  }
  source.push_str(&")".repeat(300));
  source.push(';');
  assert!(runtime_error(&source));
}

#[test]
fn globals_persist_across_interpret_calls() {
  let mut vm = VM::default();
  assert!(matches!(vm.interpret("var a = 10;"), InterpretResult::Ok));
  assert!(matches!(vm.interpret("a + 1"), InterpretResult::Ok));
  assert_eq!(vm.last_value(), &Value::Int(11));
  // Redefinition is still policed across calls.
  assert!(matches!(
    vm.interpret("var a = 0;"),
    InterpretResult::CompileError
  ));

  let mut repl = VM::new(VmOptions {
    allow_global_redefinition: true,
    ..Default::default()
  });
  assert!(matches!(repl.interpret("var a = 1;"), InterpretResult::Ok));
  assert!(matches!(repl.interpret("var a = 2; a"), InterpretResult::Ok));
  assert_eq!(repl.last_value(), &Value::Int(2));
}

#[test]
fn runtime_errors_reset_the_stack() {
  let mut vm = VM::default();
  assert!(matches!(
    vm.interpret("var a = 1; a + nil;"),
    InterpretResult::RuntimeError
  ));
  assert!(vm.stack.is_empty());
  // The VM stays usable.
  assert!(matches!(vm.interpret("a + 1"), InterpretResult::Ok));
  assert_eq!(vm.last_value(), &Value::Int(2));
}

#[test]
fn char_literals_evaluate_to_chars() {
  assert_eq!(value_of("'x'"), Value::Char('x'));
  assert_eq!(value_of("'x' == 'x'"), Value::Bool(true));
  assert_eq!(value_of("'x' == 'y'"), Value::Bool(false));
  assert_eq!(str_of("\"${'é'}\""), "é");
}

#[test]
fn raw_strings_reach_the_runtime_unescaped() {
  assert_eq!(str_of("\"\"\"a\\nb\"\"\""), "a\\nb");
}
