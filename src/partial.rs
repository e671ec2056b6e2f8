//! Partial encoding: serialized templates with unresolved gaps.

use crate::encode::{EncodeOptions, Encoder};
use crate::error::Result;
use crate::gap::{Fills, Gap};

/// The result of an encode: plain bytes, or a partial structure when gaps
/// were left unresolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Bytes(Vec<u8>),
    Partial(Partial),
}

impl Encoded {
    pub fn is_partial(&self) -> bool {
        matches!(self, Encoded::Partial(_))
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Encoded::Bytes(bytes) => Some(bytes),
            Encoded::Partial(_) => None,
        }
    }

    pub fn into_partial(self) -> Option<Partial> {
        match self {
            Encoded::Bytes(_) => None,
            Encoded::Partial(partial) => Some(partial),
        }
    }
}

/// A value tree serialized around unresolved gaps: an ordered sequence of
/// (byte-segment, gap) pairs plus one trailing segment. Segment *i* holds
/// exactly the bytes written between gap *i - 1* and gap *i* (from the
/// start, for the first segment).
///
/// Produced by [`encode_with`](crate::encode_with) in partial mode, consumed
/// by [`Partial::build`]. The expensive recursive walk over the value tree
/// happens once; `build` only replays flat byte segments, which is what
/// makes a query template cheap to re-finalize per invocation.
///
/// ```
/// use vellum_cbor::{EncodeOptions, Fills, Gap, Value, encode, encode_with};
///
/// let limit = Gap::new();
/// let query = Value::Array(vec![Value::from("select"), Value::Gap(limit.clone())]);
///
/// let opts = EncodeOptions { partial: true, ..Default::default() };
/// let template = encode_with(&query, &opts).unwrap().into_partial().unwrap();
///
/// let mut fills = Fills::new();
/// fills.insert(limit, Value::from(42i64));
/// let bytes = template.build(&fills, true).unwrap().into_bytes().unwrap();
///
/// let resolved = Value::Array(vec![Value::from("select"), Value::from(42i64)]);
/// assert_eq!(bytes, encode(&resolved).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Partial {
    pub(crate) segments: Vec<(Vec<u8>, Gap)>,
    pub(crate) trailer: Vec<u8>,
}

impl Partial {
    /// The gaps still unresolved, in wire order.
    pub fn gaps(&self) -> impl Iterator<Item = &Gap> {
        self.segments.iter().map(|(_, gap)| gap)
    }

    /// Replay the template, substituting each gap from `fills` and falling
    /// back to the gap's declared default.
    ///
    /// With `require_complete`, a gap with neither fill nor default fails
    /// with [`Error::FillMissing`](crate::Error::FillMissing), naming the
    /// gap, and no output is produced. Without it, unresolved gaps are
    /// carried over and the result is a new, shorter [`Partial`]; once
    /// every gap resolves the result is plain bytes either way.
    pub fn build(&self, fills: &Fills, require_complete: bool) -> Result<Encoded> {
        let opts = EncodeOptions {
            hook: None,
            partial: !require_complete,
            fills: Some(fills),
        };
        let mut enc = Encoder::new(&opts);
        enc.splice(self)?;
        Ok(enc.finish())
    }
}
