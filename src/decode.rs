//! Recursive decoder engine.

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::registry::Registry;
use crate::value::Value;
use crate::{
    BREAK, INFO_INDEFINITE, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGATIVE, MAJOR_SIMPLE,
    MAJOR_TAG, MAJOR_TEXT, MAJOR_UNSIGNED, SAFE_INT, SIMPLE_FALSE, SIMPLE_NONE, SIMPLE_NULL,
    SIMPLE_TRUE,
};

/// How maps (major type 5) materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    /// Insertion-ordered, string-keyed objects; a non-text key is an error.
    #[default]
    Object,
    /// Generic key-value pairs, preserving arbitrary keys in order.
    Generic,
}

/// Per-call decode configuration.
#[derive(Debug, Default)]
pub struct DecodeOptions<'a> {
    pub map_mode: MapMode,
    /// Tag transforms consulted for major type 6; tags not present here
    /// degrade to [`Value::Tagged`] pass-through.
    pub registry: Option<&'a Registry>,
}

/// Decode one value with default options: object map mode, no registry.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decode one value with explicit options.
pub fn decode_with(bytes: &[u8], opts: &DecodeOptions<'_>) -> Result<Value> {
    let mut reader = Reader::new(bytes);
    decode_from(&mut reader, opts)
}

/// Decode one value from an existing cursor, leaving it positioned just
/// past the value. For callers that frame several values in one buffer.
pub fn decode_from(reader: &mut Reader<'_>, opts: &DecodeOptions<'_>) -> Result<Value> {
    value(reader, opts)
}

fn value(r: &mut Reader<'_>, opts: &DecodeOptions<'_>) -> Result<Value> {
    let start = r.position();
    let (major, info) = r.header()?;
    match major {
        MAJOR_UNSIGNED => {
            let n = r.arg(major, info)?;
            Ok(unsigned(n))
        }
        MAJOR_NEGATIVE => {
            let n = r.arg(major, info)?;
            Ok(negative(n))
        }
        MAJOR_BYTES => Ok(Value::Bytes(lump(r, major, info)?)),
        MAJOR_TEXT => Ok(Value::Text(String::from_utf8(lump(r, major, info)?)?)),
        MAJOR_ARRAY => {
            let mut items;
            if info == INFO_INDEFINITE {
                items = Vec::new();
                while r.peek()? != BREAK {
                    items.push(value(r, opts)?);
                }
                r.advance(1)?;
            } else {
                let n = r.arg(major, info)?;
                items = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    items.push(value(r, opts)?);
                }
            }
            Ok(Value::Array(items))
        }
        MAJOR_MAP => match opts.map_mode {
            MapMode::Object => {
                let mut map;
                if info == INFO_INDEFINITE {
                    map = IndexMap::new();
                    while r.peek()? != BREAK {
                        let (key, val) = object_entry(r, opts)?;
                        map.insert(key, val);
                    }
                    r.advance(1)?;
                } else {
                    let n = r.arg(major, info)?;
                    map = IndexMap::with_capacity(n as usize);
                    for _ in 0..n {
                        let (key, val) = object_entry(r, opts)?;
                        map.insert(key, val);
                    }
                }
                Ok(Value::Object(map))
            }
            MapMode::Generic => {
                let mut pairs;
                if info == INFO_INDEFINITE {
                    pairs = Vec::new();
                    while r.peek()? != BREAK {
                        let key = value(r, opts)?;
                        let val = value(r, opts)?;
                        pairs.push((key, val));
                    }
                    r.advance(1)?;
                } else {
                    let n = r.arg(major, info)?;
                    pairs = Vec::with_capacity(n as usize);
                    for _ in 0..n {
                        let key = value(r, opts)?;
                        let val = value(r, opts)?;
                        pairs.push((key, val));
                    }
                }
                Ok(Value::Map(pairs))
            }
        },
        MAJOR_TAG => {
            let tag = r.arg(major, info)?;
            let inner = value(r, opts)?;
            match opts.registry.and_then(|registry| registry.get(tag)) {
                Some(transform) => transform(inner),
                None => Ok(Value::Tagged(tag, Box::new(inner))),
            }
        }
        MAJOR_SIMPLE => match info {
            SIMPLE_FALSE => Ok(Value::Bool(false)),
            SIMPLE_TRUE => Ok(Value::Bool(true)),
            SIMPLE_NULL => Ok(Value::Null),
            SIMPLE_NONE => Ok(Value::None),
            25 => Ok(Value::Float(r.f16()?)),
            26 => Ok(Value::Float(r.f32()?)),
            27 => Ok(Value::Float(r.f64()?)),
            INFO_INDEFINITE => Err(Error::UnexpectedBreak { offset: start }),
            _ => Err(Error::InvalidMajor {
                byte: (major << 5) | info,
                offset: start,
            }),
        },
        _ => Err(Error::InvalidMajor {
            byte: (major << 5) | info,
            offset: start,
        }),
    }
}

/// The raw bytes of a string (major 2 or 3): either one definite run, or an
/// indefinite sequence of definite chunks of the same major type terminated
/// by a break. The opposite major type, a nested indefinite chunk, or any
/// other byte in chunk position is a decode error.
fn lump(r: &mut Reader<'_>, major: u8, info: u8) -> Result<Vec<u8>> {
    if info != INFO_INDEFINITE {
        let n = r.arg(major, info)?;
        return Ok(r.bytes(n as usize)?.to_vec());
    }
    let mut out = Vec::new();
    loop {
        if r.peek()? == BREAK {
            r.advance(1)?;
            return Ok(out);
        }
        let at = r.position();
        let (chunk_major, chunk_info) = r.header()?;
        if chunk_major != major || chunk_info == INFO_INDEFINITE {
            return Err(Error::InvalidMajor {
                byte: (chunk_major << 5) | chunk_info,
                offset: at,
            });
        }
        let n = r.arg(chunk_major, chunk_info)?;
        out.extend_from_slice(r.bytes(n as usize)?);
    }
}

fn object_entry(r: &mut Reader<'_>, opts: &DecodeOptions<'_>) -> Result<(String, Value)> {
    let at = r.position();
    let key = match value(r, opts)? {
        Value::Text(key) => key,
        _ => return Err(Error::InvalidKey { offset: at }),
    };
    let val = value(r, opts)?;
    Ok((key, val))
}

fn unsigned(n: u64) -> Value {
    if n <= SAFE_INT {
        Value::Integer(n as i64)
    } else {
        Value::BigInt(Box::new(BigInt::from(n)))
    }
}

fn negative(n: u64) -> Value {
    // wire carries n, the value is -(n + 1); widen when the magnitude
    // n + 1 leaves the safe range
    if n < SAFE_INT {
        Value::Integer(-(n as i64) - 1)
    } else {
        Value::BigInt(Box::new(-(BigInt::from(n) + 1u32)))
    }
}
