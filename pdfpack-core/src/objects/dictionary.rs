use crate::encryption::ObjectEncrypter;
use crate::error::Result;
use crate::objects::syntax::{encode_name, ByteCursor};
use crate::objects::{Object, ObjectId};
use std::fmt;

/// Name-keyed mapping that keeps keys unique and remembers insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: Vec<(String, Object)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }

    /// Copy every entry of `overlay` into this dictionary.
    pub fn merge(&mut self, overlay: &Dictionary) {
        for (key, value) in overlay.iter() {
            self.set(key.clone(), value.clone());
        }
    }

    pub fn size_in_bytes(&self) -> Result<usize> {
        // "<<\n" + "/Key value\n"... + ">>"
        let mut size = 5;
        for (key, value) in &self.entries {
            size += encode_name(key).len() + 1 + value.size_in_bytes()? + 1;
        }
        Ok(size)
    }

    pub(crate) fn emit(&self, out: &mut ByteCursor<'_>) -> Result<()> {
        out.put(b"<<\n")?;
        for (key, value) in &self.entries {
            out.put_str(&encode_name(key))?;
            out.put_byte(b' ')?;
            value.emit(out)?;
            out.put_byte(b'\n')?;
        }
        out.put(b">>")
    }

    /// Encrypt every encryptable value; `None` if no value changed.
    pub fn try_encrypt(
        &self,
        encrypter: &mut dyn ObjectEncrypter,
        id: ObjectId,
    ) -> Result<Option<Dictionary>> {
        let mut changed = false;
        let mut encrypted = Dictionary::with_capacity(self.len());
        for (key, value) in &self.entries {
            let value = match value.try_encrypt(encrypter, id)? {
                Some(replacement) => {
                    changed = true;
                    replacement
                }
                None => value.clone(),
            };
            encrypted.entries.push((key.clone(), value));
        }
        Ok(changed.then_some(encrypted))
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<<\n")?;
        for (key, value) in &self.entries {
            writeln!(f, "{} {value}", encode_name(key))?;
        }
        f.write_str(">>")
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}
