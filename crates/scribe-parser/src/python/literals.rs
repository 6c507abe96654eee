//! Decoding of Python string literals.

/// Decode the source text of a single string literal into its value.
///
/// Returns `None` for bytes and f-strings, which never act as docstrings.
#[must_use]
pub fn decode_string_literal(text: &str) -> Option<String> {
    let prefix_len = text
        .find(|c: char| c == '"' || c == '\'')
        .filter(|&index| index <= 2)?;
    let prefix = text[..prefix_len].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }
    let raw = prefix.contains('r');

    let quoted = &text[prefix_len..];
    let quote = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        &quoted[..3]
    } else {
        &quoted[..1]
    };
    let body = quoted
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))?;

    Some(if raw {
        body.to_string()
    } else {
        unescape(body)
    })
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{b}'),
            '0'..='7' => {
                let mut digits = String::from(next);
                while digits.len() < 3 && chars.peek().is_some_and(|d| ('0'..='7').contains(d)) {
                    digits.extend(chars.next());
                }
                push_code_point(&mut out, &digits, 8, next);
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = (0..width).map_while(|_| chars.next_if(char::is_ascii_hexdigit)).collect();
                if digits.len() == width {
                    push_code_point(&mut out, &digits, 16, next);
                } else {
                    out.push('\\');
                    out.push(next);
                    out.push_str(&digits);
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn push_code_point(out: &mut String, digits: &str, radix: u32, marker: char) {
    match u32::from_str_radix(digits, radix).ok().and_then(char::from_u32) {
        Some(decoded) => out.push(decoded),
        None => {
            out.push('\\');
            if radix == 16 {
                out.push(marker);
            }
            out.push_str(digits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#""""Doc.""""#, Some("Doc."))]
    #[case("'''Doc.'''", Some("Doc."))]
    #[case(r#""plain""#, Some("plain"))]
    #[case(r#"r"raw\n""#, Some(r"raw\n"))]
    #[case(r#"u"unicode""#, Some("unicode"))]
    #[case(r#""tab\there""#, Some("tab\there"))]
    #[case(r#""\x41é\101""#, Some("Aé\u{41}"))]
    #[case(r#""keep \d""#, Some(r"keep \d"))]
    #[case(r#"b"bytes""#, None)]
    #[case(r#"f"{value}""#, None)]
    #[case(r#"Rb"raw-bytes""#, None)]
    fn decodes_literals(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(decode_string_literal(text).as_deref(), expected);
    }

    #[test]
    fn line_continuation_is_removed() {
        assert_eq!(
            decode_string_literal("\"\"\"one \\\ntwo\"\"\"").as_deref(),
            Some("one two")
        );
    }

    #[test]
    fn non_literal_text_is_rejected() {
        assert_eq!(decode_string_literal("value"), None);
    }
}
