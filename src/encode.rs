//! Recursive encoder engine.

use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::gap::{Fills, Gap};
use crate::partial::{Encoded, Partial};
use crate::value::Value;
use crate::writer::Writer;
use crate::{
    MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGATIVE, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT,
    MAJOR_UNSIGNED, SAFE_INT, SIMPLE_FALSE, SIMPLE_NONE, SIMPLE_NULL, SIMPLE_TRUE,
};

/// Per-call encode configuration.
pub struct EncodeOptions<'a> {
    /// Pre-encode transform applied once per node before dispatch; return
    /// `Some` to substitute the node, `None` to keep it. This is how domain
    /// types become tagged primitives before the generic dispatch sees
    /// them. Children of a substituted node still pass through the hook.
    pub hook: Option<&'a dyn Fn(&Value) -> Option<Value>>,
    /// Let gaps without fills become chunk boundaries, producing a
    /// [`Partial`] instead of plain bytes.
    pub partial: bool,
    /// Substitutions applied to gaps during this encode.
    pub fills: Option<&'a Fills>,
}

impl Default for EncodeOptions<'_> {
    fn default() -> Self {
        EncodeOptions {
            hook: None,
            partial: false,
            fills: None,
        }
    }
}

impl fmt::Debug for EncodeOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeOptions")
            .field("hook", &self.hook.map(|_| "<fn>"))
            .field("partial", &self.partial)
            .field("fills", &self.fills)
            .finish()
    }
}

/// Encode a value with default options: no hook, no fills, partial mode
/// disabled.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    match encode_with(value, &EncodeOptions::default())? {
        Encoded::Bytes(bytes) => Ok(bytes),
        // chunk() refuses gaps while partial mode is off, so a partial
        // result cannot reach this point
        Encoded::Partial(_) => unreachable!("partial output with partial mode disabled"),
    }
}

/// Encode a value with explicit options, yielding plain bytes or, in
/// partial mode, a [`Partial`] when any gap was left unresolved.
pub fn encode_with(value: &Value, opts: &EncodeOptions<'_>) -> Result<Encoded> {
    let mut enc = Encoder::new(opts);
    enc.value(value)?;
    Ok(enc.finish())
}

/// The recursive walk, threading the writer and options through each call
/// as one explicit context.
pub(crate) struct Encoder<'a> {
    w: Writer,
    opts: &'a EncodeOptions<'a>,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(opts: &'a EncodeOptions<'a>) -> Self {
        Encoder {
            w: Writer::new(opts.partial),
            opts,
        }
    }

    pub(crate) fn finish(self) -> Encoded {
        self.w.output()
    }

    pub(crate) fn value(&mut self, value: &Value) -> Result<()> {
        if let Some(hook) = self.opts.hook {
            if let Some(replaced) = hook(value) {
                return self.dispatch(&replaced);
            }
        }
        self.dispatch(value)
    }

    fn dispatch(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::None => self.w.u8(MAJOR_SIMPLE << 5 | SIMPLE_NONE),
            Value::Null => self.w.u8(MAJOR_SIMPLE << 5 | SIMPLE_NULL),
            Value::Bool(true) => self.w.u8(MAJOR_SIMPLE << 5 | SIMPLE_TRUE),
            Value::Bool(false) => self.w.u8(MAJOR_SIMPLE << 5 | SIMPLE_FALSE),
            Value::Integer(v) => self.integer(*v)?,
            Value::BigInt(v) => self.bigint(v)?,
            Value::Float(v) => {
                // always the 9-byte double form, regardless of magnitude
                self.w.u8(MAJOR_SIMPLE << 5 | 27);
                self.w.f64(*v);
            }
            Value::Bytes(bytes) => {
                self.w.head(MAJOR_BYTES, bytes.len() as u64);
                self.w.bytes(bytes);
            }
            Value::Text(text) => {
                self.w.head(MAJOR_TEXT, text.len() as u64);
                self.w.bytes(text.as_bytes());
            }
            Value::Array(items) => {
                self.w.head(MAJOR_ARRAY, items.len() as u64);
                for item in items {
                    self.value(item)?;
                }
            }
            Value::Object(map) => {
                self.w.head(MAJOR_MAP, map.len() as u64);
                for (key, val) in map {
                    self.w.head(MAJOR_TEXT, key.len() as u64);
                    self.w.bytes(key.as_bytes());
                    self.value(val)?;
                }
            }
            Value::Map(pairs) => {
                self.w.head(MAJOR_MAP, pairs.len() as u64);
                for (key, val) in pairs {
                    self.value(key)?;
                    self.value(val)?;
                }
            }
            Value::Tagged(tag, inner) => {
                self.w.head(MAJOR_TAG, *tag);
                self.value(inner)?;
            }
            Value::Encoded(bytes) => self.w.bytes(bytes),
            Value::Gap(gap) => {
                if let Some(fill) = self.opts.fills.and_then(|fills| fills.get(gap)) {
                    self.value(fill)?;
                } else if self.opts.partial {
                    self.w.chunk(gap.clone())?;
                } else {
                    return Err(Error::PartialDisabled { gap: gap.id() });
                }
            }
            Value::Partial(partial) => self.splice(partial)?,
        }
        Ok(())
    }

    /// Replay a previously produced partial structure into this encode,
    /// resolving or re-chunking each pending gap.
    pub(crate) fn splice(&mut self, partial: &Partial) -> Result<()> {
        for (segment, gap) in &partial.segments {
            self.w.bytes(segment);
            self.replay_gap(gap)?;
        }
        self.w.bytes(&partial.trailer);
        Ok(())
    }

    fn replay_gap(&mut self, gap: &Gap) -> Result<()> {
        if let Some(fill) = self.opts.fills.and_then(|fills| fills.get(gap)) {
            self.value(fill)
        } else if let Some(default) = gap.default_value() {
            self.value(default)
        } else if self.opts.partial {
            self.w.chunk(gap.clone())
        } else {
            Err(Error::FillMissing { gap: gap.id() })
        }
    }

    fn integer(&mut self, v: i64) -> Result<()> {
        let magnitude = v.unsigned_abs();
        if magnitude > SAFE_INT {
            return Err(Error::NumericOverflow {
                value: v.to_string(),
            });
        }
        if v >= 0 {
            self.w.head(MAJOR_UNSIGNED, magnitude);
        } else {
            // wire form carries -(v + 1)
            self.w.head(MAJOR_NEGATIVE, magnitude - 1);
        }
        Ok(())
    }

    fn bigint(&mut self, v: &BigInt) -> Result<()> {
        let arg = if v.sign() == Sign::Minus {
            (-(v.clone() + 1u32)).to_u64()
        } else {
            v.to_u64()
        };
        match arg {
            Some(arg) if v.sign() == Sign::Minus => self.w.head(MAJOR_NEGATIVE, arg),
            Some(arg) => self.w.head(MAJOR_UNSIGNED, arg),
            None => {
                return Err(Error::NumericOverflow {
                    value: v.to_string(),
                });
            }
        }
        Ok(())
    }
}
