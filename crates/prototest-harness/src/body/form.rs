//! `application/x-www-form-urlencoded` comparison as an unordered multiset of pairs.

use super::BodyError;

fn pairs(body: &[u8]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();
    pairs
}

pub(super) fn compare(expected: &[u8], actual: &[u8]) -> Result<(), BodyError> {
    let expected = pairs(expected);
    let mut actual = pairs(actual);

    for (key, value) in &expected {
        match actual.iter().position(|(k, v)| k == key && v == value) {
            Some(i) => {
                actual.remove(i);
            }
            None => {
                let found: Vec<&str> = actual
                    .iter()
                    .filter(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
                    .collect();
                let shown = if found.is_empty() {
                    "<missing>".to_string()
                } else {
                    format!("{key}={}", found.join(" | "))
                };
                return Err(BodyError::differs(key.clone(), format!("{key}={value}"), shown));
            }
        }
    }
    match actual.first() {
        Some((key, value)) => Err(BodyError::differs(
            key.clone(),
            "<absent>",
            format!("{key}={value}"),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ignored() {
        assert!(compare(b"Action=Greet&Version=2020-01-01", b"Version=2020-01-01&Action=Greet").is_ok());
    }

    #[test]
    fn encoding_normalized() {
        assert!(compare(b"name=hello%20world&x=%2F", b"name=hello+world&x=/").is_ok());
    }

    #[test]
    fn invalid_utf8_decodes_lossily_on_both_sides() {
        assert!(compare(b"k=%FF%FE", b"k=%ff%fe").is_ok());
        let err = compare(b"k=%FF", b"k=%FE%FF").unwrap_err();
        assert_eq!(err, BodyError::differs("k", "k=\u{FFFD}", "k=\u{FFFD}\u{FFFD}"));
    }

    #[test]
    fn repeated_pairs_are_counted() {
        let err = compare(b"a=1&a=1", b"a=1").unwrap_err();
        assert_eq!(err, BodyError::differs("a", "a=1", "<missing>"));
    }

    #[test]
    fn value_mismatch_and_extra_pair() {
        let err = compare(b"a=1", b"a=2").unwrap_err();
        assert_eq!(err, BodyError::differs("a", "a=1", "a=2"));

        let err = compare(b"a=1", b"a=1&b=2").unwrap_err();
        assert_eq!(err, BodyError::differs("b", "<absent>", "b=2"));
    }
}
