//! Reference registry for the objects of one document
//!
//! Every indirect object lives here under its [`ObjectId`]. Builders for fonts,
//! images and content streams place their objects through [`PdfContext`];
//! the writer later walks them in insertion order.

use crate::encryption::{PdfSecurity, SecurityOptions};
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, HexString, Object, ObjectId};
use crate::structures::{FlateStream, Operator};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Length of a generated document identifier.
const DOCUMENT_ID_LENGTH: usize = 16;

/// Digits used by [`PdfContext::unique_name`].
const DEFAULT_SUFFIX_LENGTH: u32 = 4;

/// Entries the writer copies into the trailer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailerInfo {
    pub root: Option<ObjectId>,
    pub encrypt: Option<ObjectId>,
    pub info: Option<ObjectId>,
    /// Both elements of the file identifier.
    pub id: Option<(Vec<u8>, Vec<u8>)>,
}

#[derive(Debug)]
pub struct PdfContext {
    largest_object_number: u32,
    objects: Vec<(ObjectId, Object)>,
    index: HashMap<ObjectId, usize>,
    trailer_info: TrailerInfo,
    security: Option<PdfSecurity>,
    issued_names: HashSet<String>,
    rng: StdRng,
}

impl Default for PdfContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfContext {
    pub fn new() -> Self {
        Self {
            largest_object_number: 0,
            objects: Vec::new(),
            index: HashMap::new(),
            trailer_info: TrailerInfo::default(),
            security: None,
            issued_names: HashSet::new(),
            rng: StdRng::seed_from_u64(1),
        }
    }

    pub fn largest_object_number(&self) -> u32 {
        self.largest_object_number
    }

    pub fn trailer_info(&self) -> &TrailerInfo {
        &self.trailer_info
    }

    pub fn trailer_info_mut(&mut self) -> &mut TrailerInfo {
        &mut self.trailer_info
    }

    /// Reserve the next object number, generation 0.
    pub fn next_ref(&mut self) -> ObjectId {
        self.largest_object_number += 1;
        ObjectId::of(self.largest_object_number)
    }

    /// Store `object` under a fresh reference.
    pub fn register(&mut self, object: impl Into<Object>) -> ObjectId {
        let id = self.next_ref();
        self.insert(id, object.into());
        id
    }

    /// Store `object` under `id`, replacing any previous object in place.
    ///
    /// Object number 0 is the head of the free list and cannot be assigned.
    pub fn assign(&mut self, id: ObjectId, object: impl Into<Object>) -> Result<()> {
        if id.number() == 0 {
            return Err(PdfError::InvalidReference(format!(
                "{id} is reserved for the free list"
            )));
        }
        self.insert(id, object.into());
        Ok(())
    }

    fn insert(&mut self, id: ObjectId, object: Object) {
        match self.index.get(&id) {
            Some(&position) => self.objects[position].1 = object,
            None => {
                self.index.insert(id, self.objects.len());
                self.objects.push((id, object));
            }
        }
        if id.number() > self.largest_object_number {
            self.largest_object_number = id.number();
        }
        trace!(object = %id, "assigned indirect object");
    }

    pub fn lookup(&self, id: ObjectId) -> Option<&Object> {
        self.index.get(&id).map(|&position| &self.objects[position].1)
    }

    pub fn lookup_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        match self.index.get(&id) {
            Some(&position) => Some(&mut self.objects[position].1),
            None => None,
        }
    }

    /// Look up an object that must be a dictionary.
    pub fn lookup_dict(&self, id: ObjectId) -> Result<&Dictionary> {
        self.lookup(id)
            .ok_or_else(|| PdfError::InvalidReference(format!("{id} is not registered")))?
            .as_dict()
            .ok_or_else(|| PdfError::InvalidReference(format!("{id} is not a dictionary")))
    }

    pub fn delete(&mut self, id: ObjectId) -> Option<Object> {
        let position = self.index.remove(&id)?;
        let (_, object) = self.objects.remove(position);
        for (later, _) in &self.objects[position..] {
            if let Some(slot) = self.index.get_mut(later) {
                *slot -= 1;
            }
        }
        Some(object)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// All indirect objects in insertion order.
    pub fn enumerate_indirect_objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    /// Convert a JSON value into a direct object.
    ///
    /// Strings become names. Nothing is registered, so a rejected value
    /// leaves the registry untouched.
    pub fn wrap_native(&self, value: &Value) -> Result<Object> {
        match value {
            Value::Null => Ok(Object::NULL),
            Value::Bool(b) => Ok(Object::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Object::Integer(i))
                } else if n.is_u64() {
                    Err(PdfError::InvalidNativeValue(format!(
                        "integer {n} does not fit in a PDF integer"
                    )))
                } else {
                    n.as_f64().map(Object::Real).ok_or_else(|| {
                        PdfError::InvalidNativeValue(format!("number {n} is not representable"))
                    })
                }
            }
            Value::String(name) => {
                check_name(name)?;
                Ok(Object::name(name.as_str()))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.wrap_native(item))
                .collect::<Result<Vec<_>>>()
                .map(Object::Array),
            Value::Object(entries) => {
                let mut dict = Dictionary::with_capacity(entries.len());
                for (key, item) in entries {
                    if key.is_empty() {
                        return Err(PdfError::InvalidNativeValue(
                            "dictionary keys cannot be empty".to_string(),
                        ));
                    }
                    check_name(key)?;
                    dict.set(key.as_str(), self.wrap_native(item)?);
                }
                Ok(Object::Dictionary(dict))
            }
        }
    }

    /// `prefix-NNNN` with `suffix_length` random digits, never repeating a
    /// name this registry already handed out.
    ///
    /// A drawn suffix that is taken is advanced to the next free one. Fails
    /// once every suffix of that length has been issued for `prefix`.
    pub fn add_random_suffix(&mut self, prefix: &str, suffix_length: u32) -> Result<String> {
        let bound = 10u64.saturating_pow(suffix_length.min(19));
        let start = self.rng.gen_range(0..bound);
        // Only issued names can be taken, so one more step than that always
        // reaches a free suffix when the range is larger.
        let steps = bound.min(self.issued_names.len() as u64 + 1);
        for step in 0..steps {
            let name = format!("{}-{}", prefix, (start + step) % bound);
            if self.issued_names.insert(name.clone()) {
                return Ok(name);
            }
        }
        Err(PdfError::InvalidStructure(format!(
            "all {bound} names with prefix {prefix:?} and {suffix_length} digits are taken"
        )))
    }

    pub fn unique_name(&mut self, prefix: &str) -> Result<String> {
        self.add_random_suffix(prefix, DEFAULT_SUFFIX_LENGTH)
    }

    /// Wrap an arbitrary payload (font files, image data) in a deflated
    /// stream. Entries of `overlay` are copied into the stream dictionary.
    pub fn flate_stream(&self, payload: Vec<u8>, overlay: &Dictionary) -> FlateStream {
        let mut dict = Dictionary::new();
        dict.merge(overlay);
        FlateStream::for_bytes(dict, payload, true)
    }

    pub fn content_stream(&self, operators: Vec<Operator>, overlay: &Dictionary) -> FlateStream {
        let mut dict = Dictionary::new();
        dict.merge(overlay);
        FlateStream::for_content(dict, operators, true)
    }

    /// Trailer entries for the current state: `Size`, then `Root`, `Encrypt`,
    /// `Info` and `ID` when known.
    pub fn create_trailer_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Size", self.largest_object_number + 1);
        if let Some(root) = self.trailer_info.root {
            dict.set("Root", root);
        }
        if let Some(encrypt) = self.trailer_info.encrypt {
            dict.set("Encrypt", encrypt);
        }
        if let Some(info) = self.trailer_info.info {
            dict.set("Info", info);
        }
        if let Some((first, second)) = &self.trailer_info.id {
            dict.set(
                "ID",
                vec![
                    Object::HexString(HexString::from_bytes(first).preventing_encryption()),
                    Object::HexString(HexString::from_bytes(second).preventing_encryption()),
                ],
            );
        }
        dict
    }

    /// Set up password encryption for this document.
    ///
    /// A file identifier is generated when none exists. The encryption
    /// dictionary is registered and becomes the trailer's `Encrypt` entry.
    pub fn encrypt(&mut self, options: &SecurityOptions) -> Result<()> {
        if self.security.is_some() {
            return Err(PdfError::EncryptionError(
                "document is already encrypted".to_string(),
            ));
        }

        let (first_id, generated) = match &self.trailer_info.id {
            Some((first, _)) => (first.clone(), false),
            None => {
                let mut id = vec![0u8; DOCUMENT_ID_LENGTH];
                rand::thread_rng().fill_bytes(&mut id);
                (id, true)
            }
        };

        let security = PdfSecurity::create(&first_id, options)?;
        if generated {
            self.trailer_info.id = Some((first_id.clone(), first_id.clone()));
        }
        let encrypt = self.register(security.encryption_dict());
        self.trailer_info.encrypt = Some(encrypt);
        self.security = Some(security);

        debug!(encrypt = %encrypt, id = %hex::encode(&first_id), "document encryption enabled");
        Ok(())
    }

    pub fn security(&self) -> Option<&PdfSecurity> {
        self.security.as_ref()
    }

    pub fn is_encrypting(&self) -> bool {
        self.security.is_some()
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.contains('\0') {
        return Err(PdfError::InvalidNativeValue(format!(
            "name {name:?} contains a NUL byte"
        )));
    }
    Ok(())
}
