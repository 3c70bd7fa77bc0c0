use std::rc::Rc;

use hashbrown::HashMap;

use crate::objects::StrObj;
use crate::values::Value;

/// Compile-time facts about a global variable.
#[derive(Debug, Clone, Copy)]
pub struct GlobalInfo {
  /// `let` globals are immutable, `var` globals are mutable.
  pub is_const: bool,
  /// A global may be declared (slot reserved) before it is
  /// defined (slot written). Reading an undefined global is a
  /// runtime error; a global still undefined at the end of
  /// compilation is a compile error.
  pub is_defined: bool,
}

/// The VM's global environment: a map from interned name to a
/// stable index, a dense table of per-global facts consulted by
/// the compiler, and the dense value table indexed by the
/// `*_GLOBAL` instruction operands.
#[derive(Default)]
pub struct GlobalTable {
  indices: HashMap<Rc<StrObj>, usize>,
  infos: Vec<GlobalInfo>,
  values: Vec<Value>,
}

impl GlobalTable {
  pub fn new() -> GlobalTable {
    GlobalTable::default()
  }

  pub fn len(&self) -> usize {
    self.infos.len()
  }

  pub fn is_empty(&self) -> bool {
    self.infos.is_empty()
  }

  /// The index assigned to a name, if it was ever declared.
  pub fn index_of(&self, name: &Rc<StrObj>) -> Option<usize> {
    self.indices.get(name).copied()
  }

  /// Reserves a slot for a new global. The slot starts undefined
  /// and its value is the `None` sentinel.
  pub fn declare(&mut self, name: Rc<StrObj>, is_const: bool) -> usize {
    let index = self.infos.len();
    self.indices.insert(name, index);
    self.infos.push(GlobalInfo {
      is_const,
      is_defined: false,
    });
    self.values.push(Value::None);
    index
  }

  pub fn info(&self, index: usize) -> GlobalInfo {
    self.infos[index]
  }

  pub fn mark_defined(&mut self, index: usize) {
    self.infos[index].is_defined = true;
  }

  /// True when every declared global has also been defined.
  pub fn all_defined(&self) -> bool {
    self.infos.iter().all(|info| info.is_defined)
  }

  pub fn value(&self, index: usize) -> &Value {
    &self.values[index]
  }

  pub fn set_value(&mut self, index: usize, value: Value) {
    self.values[index] = value;
  }
}
