use std::num::{ParseFloatError, ParseIntError};

/// Parses an integer literal lexeme into a Rust int, ignoring
/// `_` digit separators.
pub fn parse_int_lexeme(lexeme: &str) -> Result<i64, ParseIntError> {
  lexeme.replace('_', "").parse::<i64>()
}

/// Parses a float literal lexeme into a Rust float, ignoring `_`
/// digit separators. Scientific notation is handled by the
/// standard conversion.
pub fn parse_float_lexeme(lexeme: &str) -> Result<f64, ParseFloatError> {
  lexeme.replace('_', "").parse::<f64>()
}

/// Parses a `0x`/`0X`-prefixed hexadecimal literal lexeme into a
/// Rust int, ignoring `_` digit separators.
pub fn parse_hex_lexeme(lexeme: &str) -> Result<i64, ParseIntError> {
  i64::from_str_radix(&lexeme.replace('_', "")[2..], 16)
}
