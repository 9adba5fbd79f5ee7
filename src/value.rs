//! Typed cell values and their display rendering

use crate::format::{sprintf, FormatArg};
use crate::schema::{ColumnKind, ColumnSchema};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single typed value at a (row, column) position.
///
/// Exactly one representation is active and it always matches [`kind`].
/// Accessors check the tag and return `None` on mismatch.
///
/// [`kind`]: CellValue::kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Int32(i32),
    Int64(i64),
    #[serde(rename = "uint32")]
    UInt32(u32),
    #[serde(rename = "uint64")]
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    NarrowString(String),
    /// UTF-16 code units
    WideString(Vec<u16>),
}

impl CellValue {
    /// Build a wide string cell from UTF-8 text
    pub fn wide(text: &str) -> Self {
        CellValue::WideString(text.encode_utf16().collect())
    }

    pub fn from_utf16(units: Vec<u16>) -> Self {
        CellValue::WideString(units)
    }

    /// Zero value of a kind, used to fill short rows
    pub fn default_for(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Int32 => CellValue::Int32(0),
            ColumnKind::Int64 => CellValue::Int64(0),
            ColumnKind::UInt32 => CellValue::UInt32(0),
            ColumnKind::UInt64 => CellValue::UInt64(0),
            ColumnKind::Float32 => CellValue::Float32(0.0),
            ColumnKind::Float64 => CellValue::Float64(0.0),
            ColumnKind::NarrowString => CellValue::NarrowString(String::new()),
            ColumnKind::WideString => CellValue::WideString(Vec::new()),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            CellValue::Int32(_) => ColumnKind::Int32,
            CellValue::Int64(_) => ColumnKind::Int64,
            CellValue::UInt32(_) => ColumnKind::UInt32,
            CellValue::UInt64(_) => ColumnKind::UInt64,
            CellValue::Float32(_) => ColumnKind::Float32,
            CellValue::Float64(_) => ColumnKind::Float64,
            CellValue::NarrowString(_) => ColumnKind::NarrowString,
            CellValue::WideString(_) => ColumnKind::WideString,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            CellValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            CellValue::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            CellValue::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            CellValue::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::NarrowString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_wide(&self) -> Option<&[u16]> {
        match self {
            CellValue::WideString(units) => Some(units),
            _ => None,
        }
    }

    /// Numeric view of the value for filters and comparisons across kinds
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int32(v) => Some(*v as f64),
            CellValue::Int64(v) => Some(*v as f64),
            CellValue::UInt32(v) => Some(*v as f64),
            CellValue::UInt64(v) => Some(*v as f64),
            CellValue::Float32(v) => Some(*v as f64),
            CellValue::Float64(v) => Some(*v),
            CellValue::NarrowString(_) | CellValue::WideString(_) => None,
        }
    }

    /// Template argument for numeric kinds; floats widen to `f64`, integers
    /// keep their native width.
    pub fn format_arg(&self) -> Option<FormatArg> {
        match self {
            CellValue::Int32(v) => Some(FormatArg::Signed { value: *v as i64, bits: 32 }),
            CellValue::Int64(v) => Some(FormatArg::Signed { value: *v, bits: 64 }),
            CellValue::UInt32(v) => Some(FormatArg::Unsigned { value: *v as u64, bits: 32 }),
            CellValue::UInt64(v) => Some(FormatArg::Unsigned { value: *v, bits: 64 }),
            CellValue::Float32(v) => Some(FormatArg::Float(*v as f64)),
            CellValue::Float64(v) => Some(FormatArg::Float(*v)),
            CellValue::NarrowString(_) | CellValue::WideString(_) => None,
        }
    }

    /// Render for display.
    ///
    /// Strings come back as stored. Numbers go through the column's format
    /// template; without a schema, or with a template that does not parse,
    /// the result is empty.
    pub fn format_narrow<E>(&self, schema: Option<&ColumnSchema<E>>) -> String {
        match self {
            CellValue::NarrowString(s) => s.clone(),
            CellValue::WideString(units) => String::from_utf16_lossy(units),
            _ => {
                let (Some(schema), Some(arg)) = (schema, self.format_arg()) else {
                    return String::new();
                };
                match sprintf(&schema.format, arg) {
                    Ok(text) => text,
                    Err(e) => {
                        log::trace!("Column '{}' format {:?} rejected: {}", schema.name, schema.format, e);
                        String::new()
                    }
                }
            }
        }
    }

    /// Render for display as UTF-16
    pub fn format_wide<E>(&self, schema: Option<&ColumnSchema<E>>) -> Vec<u16> {
        match self {
            CellValue::WideString(units) => units.clone(),
            _ => self.format_narrow(schema).encode_utf16().collect(),
        }
    }

    /// Ordering between two values of the same kind; `None` when kinds differ.
    pub fn compare(&self, other: &CellValue) -> Option<Ordering> {
        match (self, other) {
            (CellValue::Int32(a), CellValue::Int32(b)) => Some(a.cmp(b)),
            (CellValue::Int64(a), CellValue::Int64(b)) => Some(a.cmp(b)),
            (CellValue::UInt32(a), CellValue::UInt32(b)) => Some(a.cmp(b)),
            (CellValue::UInt64(a), CellValue::UInt64(b)) => Some(a.cmp(b)),
            (CellValue::Float32(a), CellValue::Float32(b)) => Some(a.total_cmp(b)),
            (CellValue::Float64(a), CellValue::Float64(b)) => Some(a.total_cmp(b)),
            (CellValue::NarrowString(a), CellValue::NarrowString(b)) => Some(a.cmp(b)),
            (CellValue::WideString(a), CellValue::WideString(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Int32(0)
    }
}

/// Unformatted value, as a filter or log line would show it
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int32(v) => write!(f, "{}", v),
            CellValue::Int64(v) => write!(f, "{}", v),
            CellValue::UInt32(v) => write!(f, "{}", v),
            CellValue::UInt64(v) => write!(f, "{}", v),
            CellValue::Float32(v) => write!(f, "{}", v),
            CellValue::Float64(v) => write!(f, "{}", v),
            CellValue::NarrowString(s) => f.write_str(s),
            CellValue::WideString(units) => f.write_str(&String::from_utf16_lossy(units)),
        }
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int32(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int64(v)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::UInt32(v)
    }
}

impl From<u64> for CellValue {
    fn from(v: u64) -> Self {
        CellValue::UInt64(v)
    }
}

impl From<f32> for CellValue {
    fn from(v: f32) -> Self {
        CellValue::Float32(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float64(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::NarrowString(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::NarrowString(v)
    }
}
