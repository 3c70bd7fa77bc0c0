use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;

use hashbrown::hash_map::RawEntryMut;
use hashbrown::HashMap;

use crate::objects::str_obj::hash_string;
use crate::objects::StrObj;

/// The string-intern set.
///
/// For any two interned strings, equal content implies pointer
/// identity, which is what lets `Value` compare objects by
/// identity alone. The set is probed through hashbrown's
/// raw-entry API using the string's precomputed FNV-1a hash, so a
/// lookup never rehashes the bytes and never allocates unless the
/// string is new.
#[derive(Default)]
pub struct StringInterner {
  strings: HashMap<Rc<StrObj>, ()>,
}

impl StringInterner {
  pub fn new() -> StringInterner {
    StringInterner {
      strings: HashMap::new(),
    }
  }

  /// The number of distinct strings interned so far.
  pub fn len(&self) -> usize {
    self.strings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.strings.is_empty()
  }

  /// Returns the canonical string object for the given content,
  /// allocating one if this content has never been seen.
  pub fn intern(&mut self, text: &str) -> Rc<StrObj> {
    let hash = hash_string(text);
    let hashed = self.finish_hash(hash);

    match self
      .strings
      .raw_entry_mut()
      .from_hash(hashed, |key| key.content == text)
    {
      RawEntryMut::Occupied(entry) => Rc::clone(entry.key()),
      RawEntryMut::Vacant(entry) => {
        let object = Rc::new(StrObj {
          hash,
          content: text.to_owned(),
        });
        entry.insert_hashed_nocheck(hashed, Rc::clone(&object), ());
        object
      }
    }
  }

  /// Looks up the canonical string for the given content without
  /// interning it.
  pub fn find(&self, text: &str) -> Option<Rc<StrObj>> {
    let hashed = self.finish_hash(hash_string(text));
    self
      .strings
      .raw_entry()
      .from_hash(hashed, |key| key.content == text)
      .map(|(key, _)| Rc::clone(key))
  }

  /// Runs the precomputed 32-bit hash through the map's hasher,
  /// matching what `StrObj`'s `Hash` impl feeds it. Both probe
  /// paths must agree on this or raw-entry lookups would miss.
  fn finish_hash(&self, hash: u32) -> u64 {
    let mut hasher = self.strings.hasher().build_hasher();
    hasher.write_u32(hash);
    hasher.finish()
  }
}
