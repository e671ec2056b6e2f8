//! Dynamic value model for the wire codec.

use std::fmt;

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::de::{self, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SAFE_INT;
use crate::gap::Gap;
use crate::partial::Partial;

/// Dynamic value covering every shape the wire format can carry.
///
/// The encoder dispatches on this enum exhaustively, so every supported
/// shape is a variant here and an unsupported shape is unrepresentable.
///
/// # Example
/// ```
/// use vellum_cbor::{Value, decode, encode};
///
/// let value = Value::from(vec![Value::from(1i64), Value::from("two")]);
/// let bytes = encode(&value).unwrap();
/// assert_eq!(decode(&bytes).unwrap(), value);
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent-but-present, distinct from null (simple value 23).
    None,
    /// Null (simple value 22).
    #[default]
    Null,
    Bool(bool),
    /// Plain integer. Encode refuses magnitudes above 2^53, the largest a
    /// peer working in double-precision numbers holds exactly; larger
    /// integers travel as [`Value::BigInt`].
    Integer(i64),
    /// Arbitrary-precision integer, boxed to keep the enum small.
    BigInt(Box<BigInt>),
    /// Always carried on the wire as a double-precision float, regardless
    /// of magnitude.
    Float(f64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Value>),
    /// Insertion-ordered, string-keyed mapping.
    Object(IndexMap<String, Value>),
    /// Generic mapping with arbitrary keys, in insertion order.
    Map(Vec<(Value, Value)>),
    /// A tag number and the value it annotates. Produced on decode for tags
    /// the registry does not resolve; re-encodes bit-exactly.
    Tagged(u64, Box<Value>),
    /// Placeholder for partial encoding.
    Gap(Gap),
    /// Pre-encoded bytes, spliced into the output verbatim with no
    /// recursive walk.
    Encoded(Vec<u8>),
    /// A previously produced partial structure embedded as a value.
    Partial(Box<Partial>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// True for both plain and arbitrary-precision integers.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::BigInt(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_tagged(&self) -> bool {
        matches!(self, Value::Tagged(_, _))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as an i64, if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::BigInt(v) => v.to_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    /// The tag number and inner value, if this is a tagged value.
    pub fn as_tagged(&self) -> Option<(u64, &Value)> {
        match self {
            Value::Tagged(tag, inner) => Some((*tag, inner)),
            _ => None,
        }
    }
}

// Structural equality: plain and arbitrary-precision integers compare by
// numeric value across variants, gaps compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Integer(a), Value::BigInt(b)) | (Value::BigInt(b), Value::Integer(a)) => {
                **b == BigInt::from(*a)
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Tagged(ta, va), Value::Tagged(tb, vb)) => ta == tb && va == vb,
            (Value::Gap(a), Value::Gap(b)) => a == b,
            (Value::Encoded(a), Value::Encoded(b)) => a == b,
            (Value::Partial(a), Value::Partial(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        if v <= SAFE_INT {
            Value::Integer(v as i64)
        } else {
            Value::BigInt(Box::new(BigInt::from(v)))
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(v: IndexMap<String, Value>) -> Self {
        Value::Object(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::BigInt(Box::new(v))
    }
}

impl From<Gap> for Value {
    fn from(v: Gap) -> Self {
        Value::Gap(v)
    }
}

impl From<Partial> for Value {
    fn from(v: Partial) -> Self {
        Value::Partial(Box::new(v))
    }
}

// Serde interop, for transcoding decoded trees to and from other formats.
// Wire-only shapes (gaps, pre-encoded blocks, partials) refuse to cross.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::BigInt(v) => match v.to_i128() {
                Some(i) => serializer.serialize_i128(i),
                None => Err(serde::ser::Error::custom("big integer exceeds 128 bits")),
            },
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Bytes(v) => serializer.serialize_bytes(v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Array(v) => v.serialize(serializer),
            Value::Object(v) => v.serialize(serializer),
            Value::Map(v) => {
                let mut map = serializer.serialize_map(Some(v.len()))?;
                for (key, val) in v {
                    map.serialize_entry(key, val)?;
                }
                map.end()
            }
            // the annotation does not survive into foreign formats
            Value::Tagged(_, inner) => inner.serialize(serializer),
            Value::Gap(_) => Err(serde::ser::Error::custom("gap placeholders are wire-only")),
            Value::Encoded(_) => Err(serde::ser::Error::custom(
                "pre-encoded blocks are wire-only",
            )),
            Value::Partial(_) => Err(serde::ser::Error::custom("partial values are wire-only")),
        }
    }
}

fn integer_value(v: i128) -> Value {
    if v.unsigned_abs() <= u128::from(SAFE_INT) {
        Value::Integer(v as i64)
    } else {
        Value::BigInt(Box::new(BigInt::from(v)))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any wire-representable value")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
                Ok(integer_value(i128::from(v)))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
                Ok(integer_value(i128::from(v)))
            }

            fn visit_i128<E>(self, v: i128) -> Result<Value, E> {
                Ok(integer_value(v))
            }

            fn visit_u128<E>(self, v: u128) -> Result<Value, E> {
                if v <= u128::from(SAFE_INT) {
                    Ok(Value::Integer(v as i64))
                } else {
                    Ok(Value::BigInt(Box::new(BigInt::from(v))))
                }
            }

            fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Float(v))
            }

            fn visit_str<E>(self, v: &str) -> Result<Value, E> {
                Ok(Value::Text(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> Result<Value, E> {
                Ok(Value::Text(v))
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Value, E> {
                Ok(Value::Bytes(v.to_vec()))
            }

            fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Value, E> {
                Ok(Value::Bytes(v))
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_seq<A>(self, mut access: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = access.next_element()? {
                    items.push(item);
                }
                Ok(Value::Array(items))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut pairs: Vec<(Value, Value)> = Vec::new();
                while let Some(entry) = access.next_entry()? {
                    pairs.push(entry);
                }
                // string-keyed maps fold into ordered objects
                if pairs.iter().all(|(key, _)| key.is_text()) {
                    let mut object = IndexMap::with_capacity(pairs.len());
                    for (key, val) in pairs {
                        if let Value::Text(key) = key {
                            object.insert(key, val);
                        }
                    }
                    Ok(Value::Object(object))
                } else {
                    Ok(Value::Map(pairs))
                }
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_compare_by_value_across_variants() {
        assert_eq!(Value::Integer(42), Value::BigInt(Box::new(BigInt::from(42))));
        assert_ne!(Value::Integer(42), Value::BigInt(Box::new(BigInt::from(43))));
        assert_ne!(Value::Integer(42), Value::Float(42.0));
    }

    #[test]
    fn u64_conversion_widens_past_safe_range() {
        assert_eq!(Value::from(9007199254740992u64), Value::Integer(9007199254740992));
        assert!(matches!(Value::from(9007199254740993u64), Value::BigInt(_)));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::from(7i64).as_i64(), Some(7));
        assert_eq!(Value::from(BigInt::from(7)).as_i64(), Some(7));
        assert_eq!(Value::from(1.5f64).as_f64(), Some(1.5));
        assert!(Value::None.is_none());
        assert!(!Value::Null.is_none());
        assert_eq!(
            Value::Tagged(8, Box::new(Value::Null)).as_tagged(),
            Some((8, &Value::Null))
        );
    }

    #[test]
    fn json_round_trip_preserves_key_order() {
        let mut object = IndexMap::new();
        object.insert("zebra".to_owned(), Value::Integer(1));
        object.insert("aardvark".to_owned(), Value::Array(vec![Value::Bool(true), Value::Null]));
        let value = Value::Object(object);

        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"zebra":1,"aardvark":[true,null]}"#);

        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn tagged_values_transcode_as_their_inner_value() {
        let value = Value::Tagged(9, Box::new(Value::from("0190")));
        assert_eq!(serde_json::to_string(&value).unwrap(), r#""0190""#);
    }

    #[test]
    fn wire_only_shapes_refuse_to_transcode() {
        assert!(serde_json::to_string(&Value::Gap(Gap::new())).is_err());
        assert!(serde_json::to_string(&Value::Encoded(vec![0x00])).is_err());
    }

    #[test]
    fn big_integers_transcode_through_i128() {
        let value = Value::BigInt(Box::new(BigInt::from(u64::MAX)));
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "18446744073709551615");
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
