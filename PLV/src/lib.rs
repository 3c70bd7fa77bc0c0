use lexer::Scanner;
use tx_core::tokens::{Literal, TokenKind};

mod disassembler;

pub use disassembler::{disassemble_chunk, disassemble_instruction};

/// Scans the whole source and prints one token per line: line
/// number (or `|` for a run on the same line), kind, lexeme and
/// decoded literal.
pub fn print_tokens(source: &str) {
  let mut scanner = Scanner::new(source);
  let mut last_line = 0;

  loop {
    let token = scanner.scan_token();

    if token.line != last_line {
      print!("{:4} ", token.line);
      last_line = token.line;
    } else {
      print!("   | ");
    }
    print!("{:16} '{}'", format!("{:?}", token.kind), token.lexeme);
    match &token.literal {
      Some(Literal::Int(value)) => print!(" {}", value),
      Some(Literal::Float(value)) => print!(" {}", value),
      Some(Literal::Char(value)) => print!(" {}", value),
      Some(Literal::Str(value)) => print!(" {:?}", value),
      None => {}
    }
    println!();

    if token.kind == TokenKind::EOF {
      break;
    }
  }
}
