//! Assertion collector for generated tests.
//!
//! Each check records a [`Mismatch`] instead of panicking, so one run of a
//! test reports every field that disagrees with the fixture.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::body;

/// One field that did not match its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Every mismatch a test collected.
#[derive(Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub test: String,
    pub mismatches: Vec<Mismatch>,
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} mismatch", self.test, self.mismatches.len())?;
        if self.mismatches.len() != 1 {
            write!(f, "es")?;
        }
        for m in &self.mismatches {
            write!(f, "\n  - {m}")?;
        }
        Ok(())
    }
}

// A test returning Err prints the error with Debug; keep it readable.
impl fmt::Debug for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for CheckFailure {}

/// Equality where NaN equals NaN.
pub trait NanEq {
    fn nan_eq(&self, other: &Self) -> bool;
}

impl NanEq for f32 {
    fn nan_eq(&self, other: &Self) -> bool {
        (self.is_nan() && other.is_nan()) || self == other
    }
}

impl NanEq for f64 {
    fn nan_eq(&self, other: &Self) -> bool {
        (self.is_nan() && other.is_nan()) || self == other
    }
}

impl<T: NanEq> NanEq for Option<T> {
    fn nan_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.nan_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: NanEq> NanEq for Vec<T> {
    fn nan_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.nan_eq(b))
    }
}

impl<K: Eq + Hash, V: NanEq, S: BuildHasher> NanEq for HashMap<K, V, S> {
    fn nan_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|w| v.nan_eq(w)))
    }
}

impl<K: Ord, V: NanEq> NanEq for BTreeMap<K, V> {
    fn nan_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|((ka, va), (kb, vb))| ka == kb && va.nan_eq(vb))
    }
}

/// Query string split into raw `key=value` segments.
fn query_segments(query: Option<&str>) -> Vec<&str> {
    query
        .unwrap_or_default()
        .split('&')
        .filter(|s| !s.is_empty())
        .collect()
}

fn query_key(segment: &str) -> &str {
    segment.split_once('=').map_or(segment, |(k, _)| k)
}

fn show_query(query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("?{q}"),
        _ => "no query string".to_string(),
    }
}

fn header_values<'a>(headers: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    headers
        .iter()
        .filter(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
        .collect()
}

/// Collects mismatches for one test.
#[derive(Debug)]
pub struct Check {
    test: String,
    mismatches: Vec<Mismatch>,
}

impl Check {
    pub fn new(test: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            mismatches: Vec::new(),
        }
    }

    fn record(
        &mut self,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) {
        self.mismatches.push(Mismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        });
    }

    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn method(&mut self, expected: &str, actual: &str) {
        if expected != actual {
            self.record("method", expected, actual);
        }
    }

    pub fn path(&mut self, expected: &str, actual: &str) {
        if expected != actual {
            self.record("path", expected, actual);
        }
    }

    pub fn host(&mut self, expected: &str, actual: Option<&str>) {
        if Some(expected) != actual {
            self.record("host", expected, actual.unwrap_or("<none>"));
        }
    }

    /// Each `key=value` pair must appear verbatim.
    pub fn query_params(&mut self, expected: &[&str], actual: Option<&str>) {
        let segments = query_segments(actual);
        for pair in expected {
            if !segments.contains(pair) {
                self.record(format!("query `{pair}`"), "present", show_query(actual));
            }
        }
    }

    pub fn forbidden_query_params(&mut self, keys: &[&str], actual: Option<&str>) {
        let segments = query_segments(actual);
        for key in keys {
            if segments.iter().any(|s| query_key(s) == *key) {
                self.record(format!("query key `{key}`"), "absent", show_query(actual));
            }
        }
    }

    pub fn required_query_params(&mut self, keys: &[&str], actual: Option<&str>) {
        let segments = query_segments(actual);
        for key in keys {
            if !segments.iter().any(|s| query_key(s) == *key) {
                self.record(format!("query key `{key}`"), "present", show_query(actual));
            }
        }
    }

    /// Any query key outside `allowed` is a mismatch.
    pub fn no_unspecified_query_params(&mut self, allowed: &[&str], actual: Option<&str>) {
        for segment in query_segments(actual) {
            let key = query_key(segment);
            if !allowed.contains(&key) {
                self.record(format!("query key `{key}`"), "unspecified", segment);
            }
        }
    }

    /// Header names compare case-insensitively; repeated headers are joined with `, `.
    pub fn headers(&mut self, expected: &[(&str, &str)], actual: &[(String, String)]) {
        for (name, value) in expected {
            let found = header_values(actual, name);
            if found.is_empty() {
                self.record(format!("header `{name}`"), *value, "<missing>");
            } else {
                let joined = found.join(", ");
                if joined != *value {
                    self.record(format!("header `{name}`"), *value, joined);
                }
            }
        }
    }

    pub fn forbidden_headers(&mut self, names: &[&str], actual: &[(String, String)]) {
        for name in names {
            let found = header_values(actual, name);
            if !found.is_empty() {
                self.record(format!("header `{name}`"), "absent", found.join(", "));
            }
        }
    }

    pub fn required_headers(&mut self, names: &[&str], actual: &[(String, String)]) {
        for name in names {
            if header_values(actual, name).is_empty() {
                self.record(format!("header `{name}`"), "present", "<missing>");
            }
        }
    }

    /// Any header whose name is outside `allowed` is a mismatch.
    pub fn no_unspecified_headers(&mut self, allowed: &[&str], actual: &[(String, String)]) {
        for (name, value) in actual {
            if !allowed.iter().any(|a| a.eq_ignore_ascii_case(name)) {
                self.record(format!("header `{name}`"), "unspecified", value.as_str());
            }
        }
    }

    /// Compare a body under the rules of its media type.
    ///
    /// An empty actual body is reported once and nothing further about the
    /// body is checked.
    pub fn body(&mut self, expected: &str, media_type: Option<&str>, actual: &[u8]) {
        if actual.is_empty() && !expected.is_empty() {
            self.record("body", expected, "<empty>");
            return;
        }
        match body::compare(media_type, expected.as_bytes(), actual) {
            Ok(()) => {}
            Err(body::BodyError::Differs {
                path,
                expected,
                actual,
            }) => self.record(format!("body at {path}"), expected, actual),
            Err(malformed) => {
                self.record("body", expected, malformed.to_string());
            }
        }
    }

    pub fn body_empty(&mut self, actual: &[u8]) {
        if !actual.is_empty() {
            self.record(
                "body",
                "<empty>",
                String::from_utf8_lossy(actual).into_owned(),
            );
        }
    }

    /// Compare a modeled member by value.
    pub fn member<T: PartialEq + fmt::Debug + ?Sized>(&mut self, name: &str, expected: &T, actual: &T) {
        if expected != actual {
            self.record(name, format!("{expected:?}"), format!("{actual:?}"));
        }
    }

    /// Compare a float-valued member; NaN matches NaN.
    pub fn float_member<T: NanEq + fmt::Debug>(&mut self, name: &str, expected: &T, actual: &T) {
        if !expected.nan_eq(actual) {
            self.record(name, format!("{expected:?}"), format!("{actual:?}"));
        }
    }

    /// # Errors
    ///
    /// Returns every recorded mismatch.
    pub fn finish(self) -> Result<(), CheckFailure> {
        if self.mismatches.is_empty() {
            Ok(())
        } else {
            Err(CheckFailure {
                test: self.test,
                mismatches: self.mismatches,
            })
        }
    }
}
