//! Structural JSON comparison.

use serde_json::Value;

use super::BodyError;

pub(super) fn compare(expected: &[u8], actual: &[u8]) -> Result<(), BodyError> {
    let expected = parse(expected, "expected")?;
    let actual = parse(actual, "actual")?;
    diff("$", &expected, &actual)
}

fn parse(bytes: &[u8], side: &'static str) -> Result<Value, BodyError> {
    serde_json::from_slice(bytes).map_err(|e| BodyError::Malformed {
        kind: "JSON",
        side,
        message: e.to_string(),
    })
}

fn numbers_equal(expected: &serde_json::Number, actual: &serde_json::Number) -> bool {
    if let (Some(e), Some(a)) = (expected.as_i64(), actual.as_i64()) {
        return e == a;
    }
    if let (Some(e), Some(a)) = (expected.as_u64(), actual.as_u64()) {
        return e == a;
    }
    // 1 == 1.0
    matches!((expected.as_f64(), actual.as_f64()), (Some(e), Some(a)) if e == a)
}

fn diff(path: &str, expected: &Value, actual: &Value) -> Result<(), BodyError> {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => {
            if numbers_equal(e, a) {
                Ok(())
            } else {
                Err(BodyError::differs(path, e.to_string(), a.to_string()))
            }
        }
        (Value::Object(e), Value::Object(a)) => {
            let mut keys: Vec<&String> = e.keys().chain(a.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child = format!("{path}.{key}");
                match (e.get(key), a.get(key)) {
                    (Some(ev), Some(av)) => diff(&child, ev, av)?,
                    (Some(ev), None) => {
                        return Err(BodyError::differs(child, ev.to_string(), "<missing>"));
                    }
                    (None, Some(av)) => {
                        return Err(BodyError::differs(child, "<absent>", av.to_string()));
                    }
                    (None, None) => {}
                }
            }
            Ok(())
        }
        (Value::Array(e), Value::Array(a)) => {
            for (i, (ev, av)) in e.iter().zip(a).enumerate() {
                diff(&format!("{path}[{i}]"), ev, av)?;
            }
            let common = e.len().min(a.len());
            match (e.get(common), a.get(common)) {
                (Some(ev), None) => Err(BodyError::differs(
                    format!("{path}[{common}]"),
                    ev.to_string(),
                    "<missing>",
                )),
                (None, Some(av)) => Err(BodyError::differs(
                    format!("{path}[{common}]"),
                    "<absent>",
                    av.to_string(),
                )),
                _ => Ok(()),
            }
        }
        (e, a) if e == a => Ok(()),
        (e, a) => Err(BodyError::differs(path, e.to_string(), a.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(expected: &str, actual: &str) -> Result<(), BodyError> {
        compare(expected.as_bytes(), actual.as_bytes())
    }

    #[test]
    fn key_order_and_whitespace_ignored() {
        assert!(check(r#"{"a":1,"b":[true,null]}"#, "{ \"b\": [true, null],\n \"a\": 1 }").is_ok());
    }

    #[test]
    fn numeric_equivalence() {
        assert!(check(r#"{"n":1}"#, r#"{"n":1.0}"#).is_ok());
        assert!(check("1e2", "100").is_ok());
        assert!(check(r#"{"n":1}"#, r#"{"n":"1"}"#).is_err());
    }

    #[test]
    fn reports_first_differing_path() {
        let err = check(r#"{"a":[1,2,3]}"#, r#"{"a":[1,2,4]}"#).unwrap_err();
        assert_eq!(err, BodyError::differs("$.a[2]", "3", "4"));
    }

    #[test]
    fn missing_and_extra_keys() {
        let err = check(r#"{"a":1,"b":2}"#, r#"{"a":1}"#).unwrap_err();
        assert_eq!(err, BodyError::differs("$.b", "2", "<missing>"));

        let err = check(r#"{"a":1}"#, r#"{"a":1,"c":"x"}"#).unwrap_err();
        assert_eq!(err, BodyError::differs("$.c", "<absent>", "\"x\""));
    }

    #[test]
    fn array_length_difference() {
        let err = check("[1,2]", "[1]").unwrap_err();
        assert_eq!(err, BodyError::differs("$[1]", "2", "<missing>"));
    }

    #[test]
    fn malformed_side_named() {
        let err = check("{}", "{oops").unwrap_err();
        assert!(matches!(err, BodyError::Malformed { side: "actual", kind: "JSON", .. }));
    }
}
