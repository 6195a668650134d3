//! Structural XML comparison.
//!
//! Elements match on local name and namespace. Attributes are an unordered
//! set (namespace declarations excluded). Whitespace-only text between
//! elements is dropped and remaining text is trimmed. Comments and
//! processing instructions are ignored.

use roxmltree::{Document, Node};

use super::BodyError;

pub(super) fn compare(expected: &[u8], actual: &[u8]) -> Result<(), BodyError> {
    let expected_text = utf8(expected, "expected")?;
    let actual_text = utf8(actual, "actual")?;
    let expected = parse(expected_text, "expected")?;
    let actual = parse(actual_text, "actual")?;

    let root = expected.root_element();
    diff(&format!("/{}", root.tag_name().name()), root, actual.root_element())
}

fn utf8<'a>(bytes: &'a [u8], side: &'static str) -> Result<&'a str, BodyError> {
    std::str::from_utf8(bytes).map_err(|e| BodyError::Malformed {
        kind: "XML",
        side,
        message: e.to_string(),
    })
}

fn parse<'a>(text: &'a str, side: &'static str) -> Result<Document<'a>, BodyError> {
    Document::parse(text).map_err(|e| BodyError::Malformed {
        kind: "XML",
        side,
        message: e.to_string(),
    })
}

fn qualified(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    match tag.namespace() {
        Some(ns) => format!("{{{ns}}}{}", tag.name()),
        None => tag.name().to_string(),
    }
}

fn attributes(node: Node<'_, '_>) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = node
        .attributes()
        .map(|a| {
            let name = match a.namespace() {
                Some(ns) => format!("{{{ns}}}{}", a.name()),
                None => a.name().to_string(),
            };
            (name, a.value().to_string())
        })
        .collect();
    attrs.sort();
    attrs
}

/// Element children and significant text, in document order.
enum Child<'a, 'input> {
    Element(Node<'a, 'input>),
    Text(&'a str),
}

fn children<'a, 'input>(node: Node<'a, 'input>) -> Vec<Child<'a, 'input>> {
    node.children()
        .filter_map(|c| {
            if c.is_element() {
                Some(Child::Element(c))
            } else if c.is_text() {
                c.text()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(Child::Text)
            } else {
                None
            }
        })
        .collect()
}

fn describe(child: Option<&Child<'_, '_>>) -> String {
    match child {
        Some(Child::Element(node)) => format!("<{}>", qualified(*node)),
        Some(Child::Text(text)) => format!("text {text:?}"),
        None => "<missing>".to_string(),
    }
}

fn diff(path: &str, expected: Node<'_, '_>, actual: Node<'_, '_>) -> Result<(), BodyError> {
    let (e_name, a_name) = (qualified(expected), qualified(actual));
    if e_name != a_name {
        return Err(BodyError::differs(
            path,
            format!("<{e_name}>"),
            format!("<{a_name}>"),
        ));
    }

    let (e_attrs, a_attrs) = (attributes(expected), attributes(actual));
    if e_attrs != a_attrs {
        let show = |attrs: &[(String, String)]| {
            attrs
                .iter()
                .map(|(k, v)| format!("{k}={v:?}"))
                .collect::<Vec<_>>()
                .join(" ")
        };
        return Err(BodyError::differs(
            format!("{path}/@"),
            show(&e_attrs),
            show(&a_attrs),
        ));
    }

    let (e_children, a_children) = (children(expected), children(actual));
    let mut element_index = 0usize;
    for i in 0..e_children.len().max(a_children.len()) {
        match (e_children.get(i), a_children.get(i)) {
            (Some(Child::Element(e)), Some(Child::Element(a))) => {
                element_index += 1;
                let child_path = format!("{path}/{}[{element_index}]", e.tag_name().name());
                diff(&child_path, *e, *a)?;
            }
            (Some(Child::Text(e)), Some(Child::Text(a))) if e == a => {}
            (e, a) => {
                return Err(BodyError::differs(
                    format!("{path}/node()[{}]", i + 1),
                    describe(e),
                    describe(a),
                ));
            }
        }
    }
    Ok(())
}
