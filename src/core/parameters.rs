// src/core/parameters.rs

use std::collections::BTreeMap;

/// Parses the argument list of a function call, e.g. `version=21, quiet, msg='it''s'`.
///
/// Commas inside single or double quotes do not split. A backslash escapes the
/// next character except inside single quotes. Each piece is either `key=value`
/// or a bare flag, which is stored as `"true"`. Later keys overwrite earlier ones.
pub fn parse_call_args(s: &str) -> BTreeMap<String, String> {
    let mut args = BTreeMap::new();
    for token in split_top_level(s) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.split_once('=') {
            None => {
                args.insert(unescape(token), "true".to_string());
            }
            Some((key, value)) => {
                let key = key.trim();
                if key.is_empty() {
                    log::debug!("Ignoring call argument without a key: '{}'", token);
                    continue;
                }
                args.insert(key.to_string(), unquote(value.trim()));
            }
        }
    }
    log::debug!("Parsed call args '{}': {:?}", s, args);
    args
}

/// Splits on commas outside quotes. Escape sequences are kept verbatim so the
/// value decoder sees them exactly once.
fn split_top_level(s: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let (mut in_single, mut in_double, mut escape) = (false, false, false);

    for c in s.chars() {
        if escape {
            current.push(c);
            escape = false;
            continue;
        }
        match c {
            '\\' if !in_single => {
                current.push(c);
                escape = true;
            }
            '\'' if !in_double => {
                in_single = !in_single;
                current.push(c);
            }
            '"' if !in_single => {
                in_double = !in_double;
                current.push(c);
            }
            ',' if !in_single && !in_double => pieces.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    pieces.push(current);
    pieces
}

/// Decodes a value: `'...'` doubles quotes shell-style, `"..."` honours
/// backslash escapes, and a bare value only drops escaping backslashes.
fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].replace("''", "'");
    }
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return unescape(&value[1..value.len() - 1]);
    }
    unescape(value)
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_pairs() {
        let args = parse_call_args("version=21.0.8-tem, vendor = tem");
        assert_eq!(args["version"], "21.0.8-tem");
        assert_eq!(args["vendor"], "tem");
    }

    #[test]
    fn test_bare_token_is_true_flag() {
        let args = parse_call_args("quiet, level=2");
        assert_eq!(args["quiet"], "true");
        assert_eq!(args["level"], "2");
    }

    #[test]
    fn test_quoted_commas_do_not_split() {
        let args = parse_call_args(r#"a='x, y', b="p, q""#);
        assert_eq!(args.len(), 2);
        assert_eq!(args["a"], "x, y");
        assert_eq!(args["b"], "p, q");
    }

    #[test]
    fn test_single_quote_doubling() {
        let args = parse_call_args("msg='it''s fine'");
        assert_eq!(args["msg"], "it's fine");
    }

    #[test]
    fn test_double_quote_escapes() {
        let args = parse_call_args(r#"msg="say \"hi\" \\ bye""#);
        assert_eq!(args["msg"], r#"say "hi" \ bye"#);
    }

    #[test]
    fn test_backslash_escapes_comma_in_bare_value() {
        let args = parse_call_args(r"list=a\,b, other=c");
        assert_eq!(args["list"], "a,b");
        assert_eq!(args["other"], "c");
    }

    #[test]
    fn test_backslash_is_literal_in_single_quotes() {
        let args = parse_call_args(r"path='C:\work'");
        assert_eq!(args["path"], r"C:\work");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let args = parse_call_args("opt=-Dkey=value");
        assert_eq!(args["opt"], "-Dkey=value");
    }

    #[test]
    fn test_empty_input_and_empty_tokens() {
        assert!(parse_call_args("").is_empty());
        assert!(parse_call_args(" , ,").is_empty());
    }
}
