//! Placeholders for values supplied after encoding.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::Value;

/// Substitution map from gap identity to replacement value.
pub type Fills = HashMap<Gap, Value>;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque placeholder standing in for a value to be supplied later.
///
/// Gaps are identity-keyed: every [`Gap::new`] yields a distinct gap, and
/// two gaps never compare equal even with identical defaults. Cloning
/// preserves identity, so a clone matches the original in a [`Fills`] map.
/// A gap is never mutated after creation.
#[derive(Clone)]
pub struct Gap {
    inner: Arc<Inner>,
}

struct Inner {
    id: u64,
    default: Option<Value>,
}

impl Gap {
    /// A fresh gap with no default.
    pub fn new() -> Self {
        Gap::with(None)
    }

    /// A fresh gap that falls back to `value` when no fill is supplied.
    pub fn with_default(value: Value) -> Self {
        Gap::with(Some(value))
    }

    fn with(default: Option<Value>) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Gap {
            inner: Arc::new(Inner { id, default }),
        }
    }

    /// Process-unique identity; this is what fill maps key on and what
    /// error messages report.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// The declared default, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.inner.default.as_ref()
    }
}

impl Default for Gap {
    fn default() -> Self {
        Gap::new()
    }
}

impl PartialEq for Gap {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Gap {}

impl Hash for Gap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gap({})", self.inner.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_defaults_are_distinct_gaps() {
        let a = Gap::with_default(Value::Integer(1));
        let b = Gap::with_default(Value::Integer(1));
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn clones_share_identity() {
        let a = Gap::new();
        let b = a.clone();
        assert_eq!(a, b);

        let mut fills = Fills::new();
        fills.insert(b, Value::Bool(true));
        assert_eq!(fills.get(&a), Some(&Value::Bool(true)));
    }
}
