//! # Vellum CBOR
//!
//! A CBOR-compatible encoder/decoder for the Vellum database wire protocol.
//!
//! ## Features
//! - Full support for wire major types 0-7, including indefinite-length
//!   strings, arrays and maps on decode
//! - A dynamic [`Value`] model with exact numeric semantics: plain integers
//!   up to 2^53, arbitrary-precision integers up to the 64-bit wire ceiling,
//!   and floats always carried as 9-byte doubles
//! - Tagged types (major type 6) with a per-call extension [`Registry`];
//!   unknown tags round-trip bit-exactly as [`Value::Tagged`]
//! - Partial (gap) encoding: serialize a query template once with [`Gap`]
//!   placeholders, then cheaply re-finalize it per invocation with
//!   [`Partial::build`]
//! - Zero-copy splicing of pre-encoded subtrees via [`Value::Encoded`]
//!
//! ## Example
//! ```rust
//! use vellum_cbor::{Value, decode, encode};
//!
//! let mut row = indexmap::IndexMap::new();
//! row.insert("name".to_owned(), Value::from("Alice"));
//! row.insert("age".to_owned(), Value::from(30i64));
//! let value = Value::Object(row);
//!
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```
//!
//! The codec is synchronous and allocation-only: no I/O happens inside it,
//! every call owns its own cursor or writer, and nothing is shared between
//! concurrent calls.

mod decode;
mod encode;
mod error;
mod gap;
mod partial;
mod reader;
mod registry;
pub mod tags;
mod value;
mod writer;

pub use decode::{DecodeOptions, MapMode, decode, decode_from, decode_with};
pub use encode::{EncodeOptions, encode, encode_with};
pub use error::{Error, Result};
pub use gap::{Fills, Gap};
pub use partial::{Encoded, Partial};
pub use reader::Reader;
pub use registry::Registry;
pub use value::Value;
pub use writer::Writer;

// Wire major types
pub(crate) const MAJOR_UNSIGNED: u8 = 0;
pub(crate) const MAJOR_NEGATIVE: u8 = 1;
pub(crate) const MAJOR_BYTES: u8 = 2;
pub(crate) const MAJOR_TEXT: u8 = 3;
pub(crate) const MAJOR_ARRAY: u8 = 4;
pub(crate) const MAJOR_MAP: u8 = 5;
pub(crate) const MAJOR_TAG: u8 = 6;
pub(crate) const MAJOR_SIMPLE: u8 = 7;

// Simple values (major type 7)
pub(crate) const SIMPLE_FALSE: u8 = 20;
pub(crate) const SIMPLE_TRUE: u8 = 21;
pub(crate) const SIMPLE_NULL: u8 = 22;
pub(crate) const SIMPLE_NONE: u8 = 23;

// Indefinite-length framing
pub(crate) const INFO_INDEFINITE: u8 = 31;
pub(crate) const BREAK: u8 = 0xff;

/// 2^53: integers at or below this magnitude stay plain [`Value::Integer`];
/// above it the decoder widens to [`Value::BigInt`]. This is the largest
/// magnitude a peer working in double-precision numbers holds exactly, and
/// the boundary must match the server bit for bit.
pub(crate) const SAFE_INT: u64 = 1 << 53;
