use std::collections::BTreeMap;
use std::collections::btree_map;
use std::num::ParseIntError;
use std::ops::Index;

use crate::error::{ValueError, ValueErrorKind};

/// Decoded key/value pairs from one or more `.properties` sources.
///
/// Keys are unique; inserting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    map: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Insert a pair, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.map.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.map.remove(key)
    }

    /// Iterate over pairs in key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.map.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.map
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.map
    }

    /// Value for `key`, or `default` when the key is missing.
    pub fn get_string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Parse `key` as `true` or `false`.
    pub fn try_bool(&self, key: &str) -> Result<Option<bool>, ValueError> {
        self.convert(key, |raw| {
            raw.parse::<bool>()
                .map_err(|_| ValueErrorKind::InvalidBool)
        })
    }

    /// Parse `key` as a signed integer. Decimal and `0x`-prefixed hexadecimal
    /// are accepted, with an optional sign.
    pub fn try_int(&self, key: &str) -> Result<Option<i64>, ValueError> {
        self.convert(key, |raw| parse_int(raw).map_err(ValueErrorKind::from))
    }

    /// Parse `key` as an unsigned integer, decimal or `0x`-prefixed.
    pub fn try_uint(&self, key: &str) -> Result<Option<u64>, ValueError> {
        self.convert(key, |raw| parse_uint(raw).map_err(ValueErrorKind::from))
    }

    pub fn try_float(&self, key: &str) -> Result<Option<f64>, ValueError> {
        self.convert(key, |raw| raw.parse::<f64>().map_err(ValueErrorKind::from))
    }

    /// Like [`Properties::try_bool`], falling back to `default` when the key
    /// is missing or does not convert.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.try_bool(key).ok().flatten().unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.try_int(key).ok().flatten().unwrap_or(default)
    }

    pub fn get_uint(&self, key: &str, default: u64) -> u64 {
        self.try_uint(key).ok().flatten().unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.try_float(key).ok().flatten().unwrap_or(default)
    }

    fn convert<T, F>(&self, key: &str, parse: F) -> Result<Option<T>, ValueError>
    where
        F: FnOnce(&str) -> Result<T, ValueErrorKind>,
    {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        parse(raw)
            .map(Some)
            .map_err(|kind| ValueError::new(key, kind))
    }
}

fn parse_int(raw: &str) -> Result<i64, ParseIntError> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    match strip_hex_prefix(unsigned) {
        Some(hex) if negative => i64::from_str_radix(&format!("-{hex}"), 16),
        Some(hex) => i64::from_str_radix(hex, 16),
        None => raw.parse(),
    }
}

fn parse_uint(raw: &str) -> Result<u64, ParseIntError> {
    match strip_hex_prefix(raw) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => raw.parse(),
    }
}

/// Hex body after a `0x`/`0X` prefix. A body that is empty or starts with a
/// sign is left to the decimal parser, which rejects it.
fn strip_hex_prefix(raw: &str) -> Option<&str> {
    raw.strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .filter(|hex| hex.starts_with(|ch: char| ch.is_ascii_hexdigit()))
}

/// Iterator over `(key, value)` pairs of a [`Properties`] map.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Properties {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        properties.extend(iter);
        properties
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Properties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self { map }
    }
}

impl From<Properties> for BTreeMap<String, String> {
    fn from(properties: Properties) -> Self {
        properties.map
    }
}

impl Index<&str> for Properties {
    type Output = str;

    /// # Panics
    ///
    /// Panics if `key` is not present.
    fn index(&self, key: &str) -> &str {
        match self.map.get(key) {
            Some(value) => value.as_str(),
            None => panic!("no property named `{key}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> Properties {
        Properties::from_iter([
            ("string", "found"),
            ("bool", "true"),
            ("float", "4.940656458412465441765687928682213723651e-324"),
            ("int", "-9223372036854775808"),
            ("uint", "18446744073709551615"),
            ("hex", "0xCAFEBABE"),
            ("neg_hex", "-0x10"),
            ("junk", "not a number"),
            ("overflow", "9223372036854775808"),
        ])
    }

    #[test]
    fn get_string_falls_back_to_default() {
        let props = sample();
        assert_eq!(props.get_string("string", "not found"), "found");
        assert_eq!(props.get_string("missed", "not found"), "not found");
    }

    #[test]
    fn get_bool_parses_exact_literals() {
        let props = sample();
        assert!(props.get_bool("bool", false));
        assert!(props.get_bool("missed", true));
        assert!(!props.get_bool("junk", false));
    }

    #[rstest]
    #[case("TRUE")]
    #[case("1")]
    #[case("yes")]
    fn try_bool_rejects_non_literals(#[case] raw: &str) {
        let props = Properties::from_iter([("flag", raw)]);
        let err = props.try_bool("flag").expect_err("expected value error");
        assert_eq!(err.key, "flag");
        assert_eq!(err.kind, ValueErrorKind::InvalidBool);
    }

    #[test]
    fn get_float_parses_subnormals() {
        let props = sample();
        assert_eq!(props.get_float("float", f64::MAX), f64::from_bits(1));
        assert_eq!(props.get_float("missed", f64::MAX), f64::MAX);
    }

    #[test]
    fn get_int_accepts_decimal_and_hex() {
        let props = sample();
        assert_eq!(props.get_int("int", i64::MAX), i64::MIN);
        assert_eq!(props.get_int("missed", i64::MAX), i64::MAX);
        assert_eq!(props.get_int("hex", 0), 0xCAFE_BABE);
        assert_eq!(props.get_int("neg_hex", 0), -16);
    }

    #[test]
    fn get_uint_accepts_decimal_and_hex() {
        let props = sample();
        assert_eq!(props.get_uint("uint", 42), u64::MAX);
        assert_eq!(props.get_uint("missed", 42), 42);
        assert_eq!(props.get_uint("hex", 0), 0xCAFE_BABE);
    }

    #[test]
    fn try_int_surfaces_overflow() {
        let props = sample();
        let err = props.try_int("overflow").expect_err("expected overflow");
        assert!(matches!(err.kind, ValueErrorKind::InvalidInt(_)));
        assert_eq!(props.get_int("overflow", 7), 7);
        assert_eq!(props.try_int("missed"), Ok(None));
    }

    #[rstest]
    #[case("0x-10")]
    #[case("0x+ff")]
    #[case("+0x+1")]
    #[case("-0x-1")]
    #[case("0x")]
    #[case("-0x")]
    fn rejects_signs_inside_hex_literals(#[case] raw: &str) {
        let props = Properties::from_iter([("n", raw)]);

        let err = props.try_int("n").expect_err("expected int error");
        assert!(matches!(err.kind, ValueErrorKind::InvalidInt(_)));
        let err = props.try_uint("n").expect_err("expected uint error");
        assert!(matches!(err.kind, ValueErrorKind::InvalidInt(_)));

        assert_eq!(props.get_int("n", 7), 7);
        assert_eq!(props.get_uint("n", 7), 7);
    }

    #[test]
    fn try_uint_rejects_negative_values() {
        let props = sample();
        assert!(props.try_uint("int").is_err());
    }

    #[test]
    fn iterates_in_key_order() {
        let props = Properties::from_iter([("b", "2"), ("a", "1"), ("c", "3")]);
        let pairs: Vec<_> = props.iter().collect();
        assert_eq!(pairs, [("a", "1"), ("b", "2"), ("c", "3")]);
        assert_eq!(&props["b"], "2");
    }

    #[test]
    fn insert_replaces_existing_values() {
        let mut props = Properties::new();
        assert_eq!(props.insert("a", "1"), None);
        assert_eq!(props.insert("a", "2"), Some("1".to_owned()));
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("a"), Some("2"));
    }
}
