use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use crate::chunk::Chunk;
use crate::objects::StrObj;

/// A compiled tx function. The top-level script compiles into a
/// nameless `FuncObj` as well.
pub struct FuncObj {
  /// The function's name; `None` for the script itself and for
  /// anonymous `fn` expressions.
  pub name: Option<Rc<StrObj>>,
  /// The number of declared parameters.
  pub arity: u8,
  /// The function's compiled body.
  pub chunk: Chunk,
}

impl FuncObj {
  pub fn display_name(&self) -> String {
    match &self.name {
      Some(name) => format!("fn {}", name.content),
      None => String::from("<script>"),
    }
  }
}

impl Display for FuncObj {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match &self.name {
      Some(name) => write!(f, "<fn {}>", name.content),
      None => write!(f, "<script>"),
    }
  }
}

impl Debug for FuncObj {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self)
  }
}
