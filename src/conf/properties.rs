//! Flat `key=value` properties files, read the way `java.util.Properties`
//! reads them: ISO-8859-1 bytes, `#`/`!` comment lines, `=`, `:` or blank
//! separators, backslash line continuation and `\t \n \r \f \uXXXX` escapes.

use crate::erx::{Erx, Layouted, PreL4, ResultE};
use std::collections::HashMap;
use std::path::Path;

const WHITESPACE: &[char] = &[' ', '\t', '\x0c'];

/// Pairs read from properties text, in file order, plus one warning per
/// line that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub pairs: Vec<(String, String)>,
    pub warnings: Vec<String>,
}

impl Parsed {
    /// later keys override earlier ones
    pub fn into_map(self) -> HashMap<String, String> {
        self.pairs.into_iter().collect()
    }
}

/// Read a properties file into a map, logging every warning.
/// A missing or unreadable file yields an empty map; a malformed line is skipped.
pub fn read_properties_from_file(path: &Path) -> HashMap<String, String> {
    let parsed = load(path);
    for warning in &parsed.warnings {
        tracing::warn!("{}", warning);
    }
    parsed.into_map()
}

/// Read a properties file, returning its warnings instead of logging them.
pub fn load(path: &Path) -> Parsed {
    match std::fs::read(path) {
        Ok(bytes) => {
            let mut parsed = parse(&latin1(&bytes));
            for warning in parsed.warnings.iter_mut() {
                *warning = format!("{}: {}", path.display(), warning);
            }
            parsed
        },
        Err(err) => Parsed {
            pairs: Vec::new(),
            warnings: vec![format!("Failed to load config from file: {} ({})", path.display(), err)],
        },
    }
}

/// Parse properties text. A line with a malformed escape is skipped and reported.
pub fn parse(input: &str) -> Parsed {
    let mut parsed = Parsed::default();
    for (number, line) in logical_lines(input) {
        let (key, value) = split_pair(&line);
        match unescape(key).and_then(|key| Ok((key, unescape(value)?))) {
            Ok(pair) => parsed.pairs.push(pair),
            Err(err) => parsed.warnings.push(format!("line {} skipped: {}", number, err.message())),
        }
    }
    parsed
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

// (1-based physical line where the logical line starts, content)
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in input.lines().enumerate() {
        let trimmed = raw.trim_start_matches(WHITESPACE);
        let (start, mut line) = match pending.take() {
            Some((start, mut head)) => {
                head.push_str(trimmed);
                (start, head)
            },
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                (index + 1, trimmed.to_string())
            },
        };

        if continues(&line) {
            line.pop();
            pending = Some((start, line));
        } else {
            lines.push((start, line));
        }
    }

    if let Some(line) = pending {
        lines.push(line);
    }

    lines
}

// an odd run of trailing backslashes escapes the line terminator
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_pair(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut hard_separator = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                hard_separator = true;
                break;
            },
            ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            },
            _ => {},
        }
    }

    let key = &line[..key_end];
    let mut rest = &line[key_end..];
    if hard_separator {
        rest = &rest[1..];
    }
    rest = rest.trim_start_matches(WHITESPACE);
    if !hard_separator {
        if let Some(stripped) = rest.strip_prefix(&['=', ':'][..]) {
            rest = stripped.trim_start_matches(WHITESPACE);
        }
    }

    (key, rest)
}

fn unescape(raw: &str) -> ResultE<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = hex_unit(&mut chars)?;
                if (0xD800..0xDC00).contains(&unit) {
                    // high surrogate, pair it with a following \uXXXX
                    let mut lookahead = chars.clone();
                    if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
                        let low = hex_unit(&mut lookahead)?;
                        if (0xDC00..0xE000).contains(&low) {
                            chars = lookahead;
                            let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                            continue;
                        }
                    }
                }
                out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
            },
            Some(other) => out.push(other),
            None => {},
        }
    }

    Ok(out)
}

fn hex_unit<I: Iterator<Item = char>>(chars: &mut I) -> ResultE<u32> {
    let digits: String = chars.take(4).collect();
    if digits.chars().count() != 4 {
        return Err(Erx::coded(Layouted::conf(PreL4::FUZZ.four(), "0002"), "Malformed \\uxxxx encoding."));
    }
    u32::from_str_radix(&digits, 16)
        .map_err(|_| Erx::coded(Layouted::conf(PreL4::FUZZ.four(), "0002"), "Malformed \\uxxxx encoding."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn map(input: &str) -> HashMap<String, String> {
        let parsed = parse(input);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        parsed.into_map()
    }

    #[test]
    fn test_separators_and_comments() {
        let m = map("# comment\n! also comment\n\na=1\nb : 2\nc 3\n  d   =   4  \ne\n");
        assert_eq!(m.get("a").map(String::as_str), Some("1"));
        assert_eq!(m.get("b").map(String::as_str), Some("2"));
        assert_eq!(m.get("c").map(String::as_str), Some("3"));
        assert_eq!(m.get("d").map(String::as_str), Some("4  "));
        assert_eq!(m.get("e").map(String::as_str), Some(""));
        assert_eq!(m.len(), 5);
    }

    #[test]
    fn test_blank_separator_followed_by_equals() {
        let m = map("key   =   value\nother :x");
        assert_eq!(m["key"], "value");
        assert_eq!(m["other"], "x");
    }

    #[test]
    fn test_line_continuation() {
        let m = map("fruits = apple, \\\n         banana, \\\n         pear\n");
        assert_eq!(m["fruits"], "apple, banana, pear");
    }

    #[test]
    fn test_even_backslashes_do_not_continue() {
        let m = map("path=c:\\\\\nnext=1");
        assert_eq!(m["path"], "c:\\");
        assert_eq!(m["next"], "1");
    }

    #[test]
    fn test_escapes() {
        let m = map("tab=a\\tb\nkey\\=with\\:sep=v\nuni=\\u00e9t\\u00e9\nemoji=\\uD83D\\uDE00\nplain=\\q");
        assert_eq!(m["tab"], "a\tb");
        assert_eq!(m["key=with:sep"], "v");
        assert_eq!(m["uni"], "été");
        assert_eq!(m["emoji"], "😀");
        assert_eq!(m["plain"], "q");
    }

    #[test]
    fn test_malformed_unicode_skips_only_that_line() {
        let parsed = parse("web.port=9090\nbad=\\u12\nworse=\\uzzzz\nrm.url=http://rm.example/rest/rm\n");
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed.warnings[0].starts_with("line 2 skipped: Malformed"));
        assert!(parsed.warnings[1].starts_with("line 3 skipped"));
        let m = parsed.into_map();
        assert_eq!(m["web.port"], "9090");
        assert_eq!(m["rm.url"], "http://rm.example/rest/rm");
        assert!(!m.contains_key("bad"));
    }

    #[test]
    fn test_continued_line_reports_its_first_line() {
        let parsed = parse("# head\nbad = a \\\n   \\u1\n");
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].starts_with("line 2 skipped"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let m = map("k=1\nk=2");
        assert_eq!(m["k"], "2");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let m = read_properties_from_file(Path::new("/definitely/not/here/portal.properties"));
        assert!(m.is_empty());
        let parsed = load(Path::new("/definitely/not/here/portal.properties"));
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("/definitely/not/here/portal.properties"));
    }

    #[test]
    fn test_reads_latin1_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name=caf\xe9\r\nrm.url=http://rm:8080/rest\r\n").unwrap();
        let m = read_properties_from_file(file.path());
        assert_eq!(m["name"], "café");
        assert_eq!(m["rm.url"], "http://rm:8080/rest");
    }
}
