//! Conversions between the host [`Value`] model and engine values.
//!
//! Both directions are total: conversion never fails, it degrades. Anything
//! the other side cannot represent is dropped or replaced with the nearest
//! lossy equivalent, and engine evaluation failure stays the sole error
//! channel of an evaluation. The lossy cases are called out inline.

use chrono::{NaiveDateTime, Timelike};
use rhai::{Dynamic, Map};

use crate::value::Value;

/// Convert a host value into an engine value for binding injection.
///
/// Lossy by design: byte strings are re-encoded as UTF-8 text (invalid
/// sequences replaced), and sub-second datetime precision is not carried.
/// Rhai's native integer is 64-bit, so host integers always fit and the
/// fall-back-to-double path narrower engines would need never triggers.
pub(crate) fn to_engine(value: &Value) -> Dynamic {
    match value {
        Value::None => Dynamic::UNIT,
        Value::Bool(b) => Dynamic::from_bool(*b),
        Value::Int(i) => Dynamic::from_int(*i),
        Value::Float(f) => Dynamic::from_float(*f),
        Value::Str(s) => s.clone().into(),
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned().into(),
        Value::Seq(items) => Dynamic::from_array(items.iter().map(to_engine).collect()),
        Value::Map(entries) => {
            let mut map = Map::new();
            for (key, item) in entries {
                map.insert(key.as_str().into(), to_engine(item));
            }
            Dynamic::from_map(map)
        }
        // Only the six calendar fields cross the bridge; sub-second
        // precision is normalized to zero.
        Value::DateTime(dt) => Dynamic::from(dt.with_nanosecond(0).unwrap_or(*dt)),
    }
}

/// Convert an engine value into a host value for result extraction.
///
/// Engine values with no host counterpart (function pointers, foreign custom
/// types) become [`Value::None`] rather than an error. A single engine
/// character becomes a one-character string.
pub(crate) fn from_engine(value: Dynamic) -> Value {
    // Values captured by closures may be shared; take a plain copy first.
    let value = value.flatten();

    if value.is_unit() {
        return Value::None;
    }
    if let Ok(b) = value.as_bool() {
        return Value::Bool(b);
    }
    if let Ok(i) = value.as_int() {
        return Value::Int(i);
    }
    if let Ok(f) = value.as_float() {
        return Value::Float(f);
    }
    if let Ok(c) = value.as_char() {
        return Value::Str(c.to_string());
    }
    if value.is_string() {
        return Value::Str(value.into_string().unwrap_or_default());
    }
    if value.is::<NaiveDateTime>() {
        return value
            .try_cast::<NaiveDateTime>()
            .map_or(Value::None, Value::DateTime);
    }
    if value.is_array() {
        let items = value.into_array().unwrap_or_default();
        return Value::Seq(items.into_iter().map(from_engine).collect());
    }
    if value.is_map() {
        return match value.try_cast::<Map>() {
            Some(map) => Value::Map(
                map.into_iter()
                    .map(|(key, item)| (key.to_string(), from_engine(item)))
                    .collect(),
            ),
            None => Value::None,
        };
    }
    Value::None
}
