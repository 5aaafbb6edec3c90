//! Lookup tokens and keys.
//!
//! When a `secure` field is diverted into the lookup table, a synthetic
//! key string takes its place in the encoding: `<token><index>_<kind>`,
//! where the token is the lookup prefix plus the encoder id and the kind
//! is the ordinal of the field's value kind. The kind lets a sparse
//! decoder substitute a type-appropriate empty value when the table is
//! not available.

use serde_json::{json, Value};
use std::fmt;

/// Prefix of every lookup token: token = `"<prefix><encoder id>"`.
pub const LOOKUP_PREFIX: &str = "cf";

const TOKEN_SEPARATOR: char = '_';

/// Returns the shared prefix of all lookup keys minted by one encoder.
pub fn lookup_token(prefix: &str, encoder_id: &str) -> String {
    format!("{prefix}{encoder_id}")
}

/// Value kinds carried in lookup keys.
///
/// The ordinals are part of the wire format: encoded values must stay
/// readable, so existing ordinals are frozen and new kinds append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Kind {
    Invalid = 0,
    String = 1,
    Bool = 2,
    Int = 3,
    Uint = 4,
    Float = 5,
    Seq = 6,
    Map = 7,
    Null = 8,
}

impl Kind {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Kind> {
        match ordinal {
            0 => Some(Kind::Invalid),
            1 => Some(Kind::String),
            2 => Some(Kind::Bool),
            3 => Some(Kind::Int),
            4 => Some(Kind::Uint),
            5 => Some(Kind::Float),
            6 => Some(Kind::Seq),
            7 => Some(Kind::Map),
            8 => Some(Kind::Null),
            _ => None,
        }
    }

    /// The kind of a JSON value.
    pub fn of_value(value: &Value) -> Kind {
        match value {
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Bool,
            Value::Number(n) if n.is_i64() => Kind::Int,
            Value::Number(n) if n.is_u64() => Kind::Uint,
            Value::Number(_) => Kind::Float,
            Value::Array(_) => Kind::Seq,
            Value::Object(_) => Kind::Map,
            Value::Null => Kind::Null,
        }
    }

    /// The empty value a sparse decoder substitutes for this kind.
    pub fn empty_value(self) -> Value {
        match self {
            Kind::String => json!(""),
            Kind::Bool => json!(false),
            Kind::Int | Kind::Uint => json!(0),
            Kind::Float => json!(0.0),
            Kind::Seq => json!([]),
            Kind::Map => json!({}),
            Kind::Null | Kind::Invalid => Value::Null,
        }
    }
}

/// A parsed lookup table key: the entry index and the value kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupKey {
    pub index: usize,
    pub kind: Kind,
}

impl LookupKey {
    pub fn new(index: usize, kind: Kind) -> Self {
        Self { index, kind }
    }

    /// Renders the key under a token: `<token><index>_<kind ordinal>`.
    pub fn render(&self, token: &str) -> String {
        format!(
            "{token}{}{}{}",
            self.index,
            TOKEN_SEPARATOR,
            self.kind.ordinal()
        )
    }

    /// Parses a key string minted under `token`. Returns `None` for
    /// strings that merely share the prefix but do not follow the key
    /// grammar.
    pub fn parse(s: &str, token: &str) -> Option<LookupKey> {
        let rest = s.strip_prefix(token)?;
        let (index, kind) = rest.split_once(TOKEN_SEPARATOR)?;
        let index: usize = index.parse().ok()?;
        let kind = Kind::from_ordinal(kind.parse().ok()?)?;
        Some(LookupKey { index, kind })
    }

    /// True if the string was minted under the token.
    pub fn is_token_key(s: &str, token: &str) -> bool {
        !token.is_empty() && s.starts_with(token)
    }
}

// A key has no token of its own; Display shows the bare suffix.
impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.index, TOKEN_SEPARATOR, self.kind.ordinal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_prefix_plus_id() {
        assert_eq!(lookup_token(LOOKUP_PREFIX, "ab12cd34"), "cfab12cd34");
    }

    #[test]
    fn key_renders_and_parses() {
        let token = lookup_token(LOOKUP_PREFIX, "ab12cd34");
        let key = LookupKey::new(3, Kind::String);
        let s = key.render(&token);
        assert_eq!(s, "cfab12cd343_1");
        assert_eq!(LookupKey::parse(&s, &token), Some(key));
    }

    #[test]
    fn parse_rejects_wrong_token() {
        assert_eq!(LookupKey::parse("cfab12cd340_1", "cfzzzzzzzz"), None);
    }

    #[test]
    fn parse_rejects_malformed_suffix() {
        let token = "cfab12cd34";
        assert_eq!(LookupKey::parse("cfab12cd34", token), None);
        assert_eq!(LookupKey::parse("cfab12cd34x_1", token), None);
        assert_eq!(LookupKey::parse("cfab12cd340_99", token), None);
        assert_eq!(LookupKey::parse("cfab12cd340-1", token), None);
    }

    #[test]
    fn kind_of_values() {
        assert_eq!(Kind::of_value(&json!("s")), Kind::String);
        assert_eq!(Kind::of_value(&json!(true)), Kind::Bool);
        assert_eq!(Kind::of_value(&json!(-7)), Kind::Int);
        assert_eq!(Kind::of_value(&json!(42)), Kind::Int);
        assert_eq!(Kind::of_value(&json!(u64::MAX)), Kind::Uint);
        assert_eq!(Kind::of_value(&json!(1.5)), Kind::Float);
        assert_eq!(Kind::of_value(&json!([1])), Kind::Seq);
        assert_eq!(Kind::of_value(&json!({"a": 1})), Kind::Map);
        assert_eq!(Kind::of_value(&Value::Null), Kind::Null);
    }

    #[test]
    fn empty_values_by_kind() {
        assert_eq!(Kind::String.empty_value(), json!(""));
        assert_eq!(Kind::Bool.empty_value(), json!(false));
        assert_eq!(Kind::Int.empty_value(), json!(0));
        assert_eq!(Kind::Float.empty_value(), json!(0.0));
        assert_eq!(Kind::Seq.empty_value(), json!([]));
        assert_eq!(Kind::Map.empty_value(), json!({}));
        assert_eq!(Kind::Null.empty_value(), Value::Null);
    }

    #[test]
    fn ordinals_are_frozen() {
        // the ordinal table is part of the wire format
        assert_eq!(Kind::String.ordinal(), 1);
        assert_eq!(Kind::Bool.ordinal(), 2);
        assert_eq!(Kind::Int.ordinal(), 3);
        assert_eq!(Kind::Uint.ordinal(), 4);
        assert_eq!(Kind::Float.ordinal(), 5);
        assert_eq!(Kind::Seq.ordinal(), 6);
        assert_eq!(Kind::Map.ordinal(), 7);
        assert_eq!(Kind::Null.ordinal(), 8);
    }
}
