//! Typed parameter values.
//!
//! Preset parameter values are one of three kinds. The kinds form a small
//! widening lattice, `Integer < Float < String`: aggregating values of two
//! kinds always yields the more general one, and never narrows back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a parameter value.
///
/// The variant order is the widening order, so `Ord` doubles as the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Whole number within the signed 32-bit range.
    Integer,
    /// Finite floating point number.
    Float,
    /// Anything that is not a number.
    String,
}

impl ParamType {
    /// Returns the more general of the two types.
    pub fn widen(self, other: ParamType) -> ParamType {
        self.max(other)
    }

    /// Returns `true` for `Integer` and `Float`.
    pub const fn is_numeric(self) -> bool {
        matches!(self, ParamType::Integer | ParamType::Float)
    }

    /// Lowercase name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            ParamType::Integer => "integer",
            ParamType::Float => "float",
            ParamType::String => "string",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Widen two parameter types along `Integer < Float < String`.
///
/// ```rust
/// use patchgen_core::{ParamType, widen};
///
/// assert_eq!(widen(ParamType::Integer, ParamType::Float), ParamType::Float);
/// assert_eq!(widen(ParamType::Float, ParamType::Integer), ParamType::Float);
/// assert_eq!(widen(ParamType::Integer, ParamType::String), ParamType::String);
/// ```
pub fn widen(a: ParamType, b: ParamType) -> ParamType {
    a.widen(b)
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Verbatim text.
    String(String),
}

impl ParamValue {
    /// Classify a raw value from a preset file.
    ///
    /// A value is an `Integer` when it parses as a finite number without a
    /// fractional part inside the signed 32-bit range, a `Float` when it
    /// parses as any other finite number, and a `String` otherwise. String
    /// values keep the raw text unchanged.
    pub fn parse(raw: &str) -> ParamValue {
        if let Ok(number) = raw.trim().parse::<f64>()
            && number.is_finite()
        {
            if number.fract() == 0.0
                && number >= f64::from(i32::MIN)
                && number <= f64::from(i32::MAX)
            {
                return ParamValue::Integer(number as i64);
            }
            return ParamValue::Float(number);
        }
        ParamValue::String(raw.to_string())
    }

    /// Kind of this value.
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Integer(_) => ParamType::Integer,
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::String(_) => ParamType::String,
        }
    }

    /// Numeric view of the value, `None` for strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::String(_) => None,
        }
    }

    /// Text view of the value, `None` for numbers.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_is_monotonic() {
        use ParamType::*;
        assert_eq!(Integer.widen(Integer), Integer);
        assert_eq!(Integer.widen(Float), Float);
        assert_eq!(Float.widen(Integer), Float);
        assert_eq!(Integer.widen(String), String);
        assert_eq!(Float.widen(String), String);
        assert_eq!(String.widen(Integer), String);
    }

    #[test]
    fn parse_integers() {
        assert_eq!(ParamValue::parse("0"), ParamValue::Integer(0));
        assert_eq!(ParamValue::parse("-12"), ParamValue::Integer(-12));
        assert_eq!(ParamValue::parse("92.00"), ParamValue::Integer(92));
        assert_eq!(ParamValue::parse("2147483647"), ParamValue::Integer(i64::from(i32::MAX)));
        assert_eq!(ParamValue::parse("-2147483648"), ParamValue::Integer(i64::from(i32::MIN)));
    }

    #[test]
    fn large_whole_numbers_are_floats() {
        assert_eq!(ParamValue::parse("2147483648"), ParamValue::Float(2_147_483_648.0));
        assert_eq!(
            ParamValue::parse("9007199254740991"),
            ParamValue::Float(9_007_199_254_740_991.0)
        );
    }

    #[test]
    fn parse_floats() {
        assert_eq!(ParamValue::parse("0.5"), ParamValue::Float(0.5));
        assert_eq!(ParamValue::parse("-3.25"), ParamValue::Float(-3.25));
    }

    #[test]
    fn parse_strings() {
        assert_eq!(ParamValue::parse("Init"), ParamValue::String("Init".into()));
        assert_eq!(ParamValue::parse(""), ParamValue::String(String::new()));
        assert_eq!(ParamValue::parse("inf"), ParamValue::String("inf".into()));
        assert_eq!(ParamValue::parse("NaN"), ParamValue::String("NaN".into()));
        assert_eq!(ParamValue::parse("12abc"), ParamValue::String("12abc".into()));
    }

    #[test]
    fn display_reparses_to_same_value() {
        for raw in ["0", "-7", "0.6", "123.456", "Saw Up", "1e-7"] {
            let value = ParamValue::parse(raw);
            assert_eq!(ParamValue::parse(&value.to_string()), value, "raw {raw}");
        }
    }

    #[test]
    fn numeric_views() {
        assert_eq!(ParamValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(ParamValue::Float(0.25).as_f64(), Some(0.25));
        assert_eq!(ParamValue::from("x").as_f64(), None);
        assert_eq!(ParamValue::from("x").as_str(), Some("x"));
    }
}
