//! Recover structured action arguments from a JSON document that was cut off mid-stream.
//!
//! [`repair_json`] walks the text once, tracking open containers and the end of the longest
//! prefix that is valid once those containers are closed. At the end of input a half-written
//! token is either completed (string value, literal, number) or dropped back to that prefix
//! (object key, dangling `:` or `,`).

use std::borrow::Cow;

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Document start, after `:`, or after `,` in an array.
    Value,
    /// After `[`.
    ElementOrEnd,
    /// After `{`.
    KeyOrEnd,
    /// After `,` in an object.
    Key,
    Colon,
    /// After a complete value.
    CommaOrEnd,
}

enum StringEnd {
    /// Index just past the closing quote.
    Closed(usize),
    /// Input ran out inside the string; keep bytes before this index.
    Truncated(usize),
}

/// Heal a truncated JSON document so that it parses.
///
/// Complete documents come back borrowed and unchanged. So does text that is invalid for a
/// reason other than truncation; parsing it will still fail.
pub fn repair_json(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let mut stack: Vec<Container> = Vec::new();
    let mut expect = Expect::Value;
    let mut safe: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        match expect {
            Expect::ElementOrEnd if b == b']' => {
                stack.pop();
                i += 1;
                expect = Expect::CommaOrEnd;
                safe = Some(i);
            }
            Expect::Value | Expect::ElementOrEnd => match b {
                b'{' => {
                    stack.push(Container::Object);
                    i += 1;
                    expect = Expect::KeyOrEnd;
                    safe = Some(i);
                }
                b'[' => {
                    stack.push(Container::Array);
                    i += 1;
                    expect = Expect::ElementOrEnd;
                    safe = Some(i);
                }
                b'"' => match scan_string(bytes, i) {
                    StringEnd::Closed(end) => {
                        i = end;
                        expect = Expect::CommaOrEnd;
                        safe = Some(i);
                    }
                    StringEnd::Truncated(keep) => {
                        return Cow::Owned(close(&input[..keep], "\"", &stack));
                    }
                },
                b'-' | b'0'..=b'9' => {
                    let end = scan_number(bytes, i);
                    if end < bytes.len() {
                        i = end;
                        expect = Expect::CommaOrEnd;
                        safe = Some(i);
                        continue;
                    }
                    let number = input[i..]
                        .trim_end_matches(|c: char| matches!(c, '.' | 'e' | 'E' | '+' | '-'));
                    if number.is_empty() {
                        break;
                    }
                    return Cow::Owned(close(&input[..i + number.len()], "", &stack));
                }
                b't' | b'f' | b'n' => {
                    let word = match b {
                        b't' => "true",
                        b'f' => "false",
                        _ => "null",
                    };
                    let rest = &bytes[i..];
                    let n = rest.len().min(word.len());
                    if rest[..n] != word.as_bytes()[..n] {
                        return Cow::Borrowed(input);
                    }
                    if n < word.len() {
                        return Cow::Owned(close(&input[..i], word, &stack));
                    }
                    i += n;
                    expect = Expect::CommaOrEnd;
                    safe = Some(i);
                }
                _ => return Cow::Borrowed(input),
            },
            Expect::KeyOrEnd if b == b'}' => {
                stack.pop();
                i += 1;
                expect = Expect::CommaOrEnd;
                safe = Some(i);
            }
            Expect::KeyOrEnd | Expect::Key => {
                if b != b'"' {
                    return Cow::Borrowed(input);
                }
                match scan_string(bytes, i) {
                    StringEnd::Closed(end) => {
                        i = end;
                        expect = Expect::Colon;
                    }
                    StringEnd::Truncated(_) => break,
                }
            }
            Expect::Colon => {
                if b != b':' {
                    return Cow::Borrowed(input);
                }
                i += 1;
                expect = Expect::Value;
            }
            Expect::CommaOrEnd => match (b, stack.last()) {
                (b',', Some(Container::Object)) => {
                    i += 1;
                    expect = Expect::Key;
                }
                (b',', Some(Container::Array)) => {
                    i += 1;
                    expect = Expect::Value;
                }
                (b'}', Some(Container::Object)) | (b']', Some(Container::Array)) => {
                    stack.pop();
                    i += 1;
                    safe = Some(i);
                }
                _ => return Cow::Borrowed(input),
            },
        }
    }

    if stack.is_empty() && expect == Expect::CommaOrEnd {
        return Cow::Borrowed(input);
    }
    // Containers only open or close at safe points, so `stack` still matches `safe`.
    match safe {
        Some(end) => Cow::Owned(close(&input[..end], "", &stack)),
        None => Cow::Borrowed(input),
    }
}

fn scan_string(bytes: &[u8], start: usize) -> StringEnd {
    let mut i = start + 1;
    // Start of a trailing `\uD8xx` escape; useless without its low half.
    let mut high_surrogate: Option<usize> = None;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return StringEnd::Closed(i + 1),
            b'\\' => {
                let escape_start = i;
                match bytes.get(i + 1) {
                    None => return StringEnd::Truncated(high_surrogate.unwrap_or(escape_start)),
                    Some(b'u') => {
                        let Some(hex) = bytes.get(i + 2..i + 6) else {
                            return StringEnd::Truncated(high_surrogate.unwrap_or(escape_start));
                        };
                        let code = std::str::from_utf8(hex)
                            .ok()
                            .and_then(|h| u16::from_str_radix(h, 16).ok());
                        high_surrogate = match code {
                            Some(0xD800..=0xDBFF) => Some(escape_start),
                            _ => None,
                        };
                        i += 6;
                    }
                    Some(_) => {
                        high_surrogate = None;
                        i += 2;
                    }
                }
            }
            _ => {
                high_surrogate = None;
                i += 1;
            }
        }
    }
    StringEnd::Truncated(high_surrogate.unwrap_or(bytes.len()))
}

fn scan_number(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| !matches!(b, b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-'))
        .map(|n| start + n)
        .unwrap_or(bytes.len())
}

fn close(prefix: &str, token_tail: &str, stack: &[Container]) -> String {
    let mut out = String::with_capacity(prefix.len() + token_tail.len() + stack.len());
    out.push_str(prefix);
    out.push_str(token_tail);
    for c in stack.iter().rev() {
        out.push(match c {
            Container::Object => '}',
            Container::Array => ']',
        });
    }
    out
}

fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut joined = String::new();
    for fragment in fragments {
        joined.push_str(fragment.as_ref());
    }
    joined
}

fn parse_or_empty(text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("arguments not parseable ({}), using empty object", e);
            Value::Object(Map::new())
        }
    }
}

/// Concatenate streamed argument fragments, repair, and parse. Never fails: anything that
/// still does not parse becomes an empty object.
pub fn parse_partial_arguments<S: AsRef<str>>(fragments: &[S]) -> Value {
    let joined = join_fragments(fragments);
    parse_or_empty(&repair_json(&joined))
}

/// Concatenate and parse without repair; an empty object on failure.
pub fn parse_arguments<S: AsRef<str>>(fragments: &[S]) -> Value {
    parse_or_empty(&join_fragments(fragments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repaired(s: &str) -> String {
        repair_json(s).into_owned()
    }

    #[test]
    fn closes_truncated_string_value() {
        assert_eq!(
            parse_partial_arguments(&["{\"a\":1,\"b\":\"x"]),
            json!({ "a": 1, "b": "x" })
        );
    }

    #[test]
    fn garbage_becomes_empty_object() {
        assert_eq!(parse_partial_arguments(&["not json at all"]), json!({}));
        assert_eq!(parse_partial_arguments::<&str>(&[]), json!({}));
        assert_eq!(parse_partial_arguments(&["{\"a\":1} trailing"]), json!({}));
    }

    #[test]
    fn drops_dangling_keys_and_commas() {
        assert_eq!(repaired("{\"a\":1,\"b"), "{\"a\":1}");
        assert_eq!(repaired("{\"a\":1,\"b\""), "{\"a\":1}");
        assert_eq!(repaired("{\"a\":1,\"b\":"), "{\"a\":1}");
        assert_eq!(repaired("{\"a\":1 ,"), "{\"a\":1}");
        assert_eq!(repaired("[1,2,"), "[1,2]");
        assert_eq!(repaired("{"), "{}");
    }

    #[test]
    fn closes_nested_containers_and_completes_literals() {
        assert_eq!(
            repaired("{\"a\":{\"b\":[1,{\"c\":tr"),
            "{\"a\":{\"b\":[1,{\"c\":true}]}}"
        );
        assert_eq!(repaired("[nul"), "[null]");
        assert_eq!(repaired("{\"ok\":false"), "{\"ok\":false}");
    }

    #[test]
    fn trims_partial_numbers() {
        assert_eq!(repaired("{\"n\":12."), "{\"n\":12}");
        assert_eq!(repaired("[1e-"), "[1]");
        assert_eq!(repaired("{\"a\":1,\"n\":-"), "{\"a\":1}");
    }

    #[test]
    fn drops_half_written_escapes() {
        assert_eq!(repaired("{\"s\":\"line\\"), "{\"s\":\"line\"}");
        assert_eq!(repaired("{\"s\":\"a\\u00"), "{\"s\":\"a\"}");
        assert_eq!(
            parse_partial_arguments(&["{\"e\":\"\\ud83d"]),
            json!({ "e": "" })
        );
    }

    #[test]
    fn complete_documents_are_untouched() {
        let doc = "{\"a\":[1,2],\"b\":{\"c\":null}}";
        assert!(matches!(repair_json(doc), Cow::Borrowed(_)));
        assert_eq!(repaired(" true "), " true ");
    }

    #[test]
    fn joins_fragments_in_order() {
        assert_eq!(
            parse_partial_arguments(&["{\"q\":", "\"ru", "st\",\"lim"]),
            json!({ "q": "rust" })
        );
    }

    #[test]
    fn strict_parse_does_not_repair() {
        assert_eq!(parse_arguments(&["{\"a\":1"]), json!({}));
        assert_eq!(parse_arguments(&["{\"a\":", "1}"]), json!({ "a": 1 }));
    }
}
