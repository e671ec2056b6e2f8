//! Per-call tag extension registry.

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::value::Value;

type Transform = Box<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Maps tag numbers to transform functions consulted during decode.
///
/// A registry is built by the caller and handed to each decode call; the
/// codec never mutates it and there is no global table, so concurrent calls
/// share nothing. A tag missing from the registry is not an error: the
/// decoder degrades to a [`Value::Tagged`] pass-through. Encode never
/// consults the registry; the pre-encode hook decides which tags to emit.
///
/// ```
/// use vellum_cbor::{DecodeOptions, Registry, Value, decode_with, encode, tags};
///
/// let registry = Registry::new().with(tags::TAG_UUID_STRING, |inner| match inner {
///     Value::Text(text) => Ok(Value::Text(text.to_uppercase())),
///     other => Ok(other),
/// });
///
/// let bytes = encode(&tags::tagged(tags::TAG_UUID_STRING, "0190-aa")).unwrap();
/// let opts = DecodeOptions { registry: Some(&registry), ..Default::default() };
/// assert_eq!(decode_with(&bytes, &opts).unwrap(), Value::from("0190-AA"));
/// ```
#[derive(Default)]
pub struct Registry {
    transforms: HashMap<u64, Transform>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            transforms: HashMap::new(),
        }
    }

    /// Register a transform for `tag`, builder-style. A transform may fail
    /// (for example on a malformed inner value); its error aborts the
    /// decode call.
    pub fn with<F>(mut self, tag: u64, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.transforms.insert(tag, Box::new(transform));
        self
    }

    pub fn contains(&self, tag: u64) -> bool {
        self.transforms.contains_key(&tag)
    }

    pub(crate) fn get(&self, tag: u64) -> Option<&Transform> {
        self.transforms.get(&tag)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<u64> = self.transforms.keys().copied().collect();
        tags.sort_unstable();
        f.debug_struct("Registry").field("tags", &tags).finish()
    }
}
