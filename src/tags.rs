//! Well-known tags of the Vellum wire protocol.
//!
//! The codec itself is tag-agnostic; these are the protocol's assignments,
//! plus constructors for the tagged shapes the server expects. The domain
//! types behind them (datetimes, UUIDs, decimals, geometries) live with the
//! driver, which registers transforms for the tags it wants materialized on
//! decode and emits them through the pre-encode hook.

use crate::value::Value;

/// RFC 3339 datetime carried as text.
pub const TAG_DATETIME_STRING: u64 = 0;
/// Absent-value sentinel (tagged null).
pub const TAG_NONE: u64 = 6;
/// Table name carried as text.
pub const TAG_TABLE: u64 = 7;
/// Record identifier: two-element array of table name and key.
pub const TAG_RECORD_ID: u64 = 8;
/// UUID carried as text.
pub const TAG_UUID_STRING: u64 = 9;
/// Arbitrary-precision decimal carried as text.
pub const TAG_DECIMAL: u64 = 10;
/// Datetime as a two-element array of epoch seconds and nanoseconds.
pub const TAG_DATETIME: u64 = 12;
/// Duration carried as text.
pub const TAG_DURATION_STRING: u64 = 13;
/// Duration as a two-element array of seconds and nanoseconds.
pub const TAG_DURATION: u64 = 14;
/// UUID carried as a 16-byte string.
pub const TAG_UUID: u64 = 37;
/// Range with lower and upper bound values.
pub const TAG_RANGE: u64 = 49;
/// Included range bound.
pub const TAG_BOUND_INCLUDED: u64 = 50;
/// Excluded range bound.
pub const TAG_BOUND_EXCLUDED: u64 = 51;

// Geometries (GeoJSON-shaped payloads)
pub const TAG_GEOMETRY_POINT: u64 = 88;
pub const TAG_GEOMETRY_LINE: u64 = 89;
pub const TAG_GEOMETRY_POLYGON: u64 = 90;
pub const TAG_GEOMETRY_MULTIPOINT: u64 = 91;
pub const TAG_GEOMETRY_MULTILINE: u64 = 92;
pub const TAG_GEOMETRY_MULTIPOLYGON: u64 = 93;
pub const TAG_GEOMETRY_COLLECTION: u64 = 94;

/// Wrap `value` under `tag`.
pub fn tagged(tag: u64, value: impl Into<Value>) -> Value {
    Value::Tagged(tag, Box::new(value.into()))
}

/// Record identifier for `table` and `key`.
pub fn record_id(table: impl Into<String>, key: impl Into<Value>) -> Value {
    tagged(
        TAG_RECORD_ID,
        Value::Array(vec![Value::Text(table.into()), key.into()]),
    )
}

/// Compact datetime from epoch seconds and nanoseconds.
pub fn datetime(seconds: i64, nanos: u32) -> Value {
    tagged(
        TAG_DATETIME,
        Value::Array(vec![
            Value::Integer(seconds),
            Value::Integer(i64::from(nanos)),
        ]),
    )
}

/// Compact duration from seconds and nanoseconds.
pub fn duration(seconds: i64, nanos: u32) -> Value {
    tagged(
        TAG_DURATION,
        Value::Array(vec![
            Value::Integer(seconds),
            Value::Integer(i64::from(nanos)),
        ]),
    )
}
