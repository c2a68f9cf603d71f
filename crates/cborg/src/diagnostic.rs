//! Annotated hex dumps of CBOR data.
//!
//! Each token is printed on its own line as the hex of its header, padded to
//! half the output width, followed by a comment naming the token. String
//! payloads follow on their own lines. Nested items are indented by two
//! spaces per level.
//!
//! ```
//! let lines = cborg::tokens_to_diagnostic(&[0x82, 0x01, 0x61, 0x61], 40)
//!     .collect::<cborg::Result<Vec<_>>>()?;
//! assert_eq!(
//!     lines,
//!     [
//!         "82                  # array(2)",
//!         "  01                #   uint(1)",
//!         "  61                #   string(1)",
//!         "    61              #     \"a\"",
//!     ]
//! );
//! # Ok::<(), cborg::Error>(())
//! ```

use core::fmt::Write;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{
    borrow::{Cow, ToOwned},
    collections::{BTreeMap, VecDeque},
    format,
    string::String,
    vec::Vec,
};
#[cfg(feature = "std")]
use std::{
    borrow::{Cow, ToOwned},
    collections::{BTreeMap, VecDeque},
    format,
    string::String,
    vec::Vec,
};

use crate::{
    bytes::{from_hex, to_hex},
    decode::DecodeOptions,
    read::{TokenRead, Tokenizer},
    token::{Token, TokenValue, Type},
    Result,
};

/// Output width used by the command line tools.
pub const DEFAULT_WIDTH: usize = 100;

static DIAGNOSTIC_OPTIONS: DecodeOptions = DecodeOptions {
    strict: false,
    allow_indefinite: true,
    allow_undefined: true,
    coerce_undefined_to_null: false,
    allow_infinity: true,
    allow_nan: true,
    allow_big_int: true,
    use_maps: false,
    reject_duplicate_map_keys: false,
    retain_string_bytes: true,
    tags: BTreeMap::new(),
    decode_err_prefix: Cow::Borrowed("Diagnostic decode error:"),
};

/// Iterator over the lines of a diagnostic dump.
///
/// Created by [`tokens_to_diagnostic`]. A malformed item yields an error and
/// ends the iteration.
#[derive(Debug)]
pub struct Diagnostic<'a> {
    data: &'a [u8],
    tokens: Tokenizer<'a, 'static>,
    width: usize,
    // Remaining entries of each enclosing container, `None` if indefinite
    indent: Vec<Option<u64>>,
    pending: VecDeque<String>,
    failed: bool,
}

/// Describes each token of `data`, one line at a time.
///
/// Lines are padded so that comments start at column `width / 2`.
#[must_use]
pub fn tokens_to_diagnostic(data: &[u8], width: usize) -> Diagnostic<'_> {
    Diagnostic {
        data,
        tokens: Tokenizer::new(data, &DIAGNOSTIC_OPTIONS),
        width,
        indent: Vec::new(),
        pending: VecDeque::new(),
        failed: false,
    }
}

/// Parses the hex column of a diagnostic dump back into bytes.
///
/// Everything from a `#` to the end of a line is ignored, as is whitespace.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidDiagnostic`][crate::ErrorKind::InvalidDiagnostic]
/// if the remaining characters are not an even number of hex digits.
pub fn from_diag(input: &str) -> Result<Vec<u8>> {
    let hex: String = input
        .lines()
        .flat_map(|line| line.split('#').next().unwrap_or_default().chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    from_hex(&hex)
}

impl Iterator for Diagnostic<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.pop_front() {
            return Some(Ok(line));
        }
        if self.failed || self.tokens.done() {
            return None;
        }

        let pos = self.tokens.pos();
        match self.tokens.next_token() {
            Ok(token) => {
                self.describe(pos, &token);
                self.pending.pop_front().map(Ok)
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err
                    .or_prefix(&DIAGNOSTIC_OPTIONS.decode_err_prefix)
                    .or_byte_offset(pos)))
            }
        }
    }
}

impl Diagnostic<'_> {
    fn describe(&mut self, pos: usize, token: &Token) {
        let margin = " ".repeat(self.indent.len() * 2);
        let typ = token.typ();

        // Text which does not round trip through UTF-8 is shown as bytes
        let payload = match token.value() {
            TokenValue::Bytes(b) => Some((b.as_slice(), None)),
            TokenValue::Text(s) => match token.byte_value() {
                Some(raw) if raw != s.as_bytes() => Some((raw, None)),
                _ => Some((s.as_bytes(), Some(s.as_str()))),
            },
            _ => None,
        };
        let payload_len = payload.map_or(0, |(p, _)| p.len());

        let header_len = token.encoded_length().saturating_sub(payload_len).max(1);
        let header = self
            .data
            .get(pos..pos + header_len)
            .unwrap_or_default();
        let mut hex = to_hex(&header[..header.len().min(1)]);
        if header.len() > 1 {
            hex.push(' ');
            hex.push_str(&to_hex(&header[1..]));
        }

        let name = typ.name();
        let desc = match token.value() {
            TokenValue::Uint(n) => format!("{name}({n})"),
            TokenValue::Negint(n) => format!("{name}({n})"),
            TokenValue::Float(f) => format!("{name}({})", float_repr(*f)),
            TokenValue::Bytes(_) | TokenValue::Text(_) => format!("{name}({payload_len})"),
            TokenValue::Indefinite => format!("{name}(indefinite)"),
            TokenValue::None | TokenValue::Bool(_) => name.to_owned(),
        };
        let line = self.line(&margin, &hex, &desc);
        self.pending.push_back(line);

        if let Some((payload, text)) = payload {
            let margin = format!("{margin}  ");
            let chunk = ((self.width / 2).saturating_sub(margin.len() + 1) / 2).max(1);
            let pieces: Vec<(&[u8], String)> = match text {
                Some(text) => split_text(text, chunk)
                    .into_iter()
                    .map(|piece| (piece.as_bytes(), piece.to_owned()))
                    .collect(),
                None => payload
                    .chunks(chunk)
                    .map(|piece| (piece, escape(piece)))
                    .collect(),
            };
            for (piece, st) in pieces {
                let line = self.line(&margin, &to_hex(piece), &format!("\"{st}\""));
                self.pending.push_back(line);
            }
        }

        self.nest(token);
    }

    fn line(&self, margin: &str, hex: &str, comment: &str) -> String {
        let width = self.width / 2;
        format!("{:<width$}# {margin}{comment}", format!("{margin}{hex}"))
    }

    fn nest(&mut self, token: &Token) {
        if let Some(Some(remaining)) = self.indent.last_mut() {
            *remaining = remaining.saturating_sub(1);
        }

        let typ = token.typ();
        if typ == Type::BREAK {
            if let Some(None) = self.indent.last() {
                self.indent.pop();
            }
        } else if !typ.is_terminal() {
            let entries = match token.value() {
                TokenValue::Uint(n) if typ == Type::MAP => Some(n.saturating_mul(2)),
                TokenValue::Uint(_) if typ == Type::TAG => Some(1),
                TokenValue::Uint(n) => Some(*n),
                _ => None,
            };
            self.indent.push(entries);
        }

        while let Some(Some(0)) = self.indent.last() {
            self.indent.pop();
        }
    }
}

fn float_repr(f: f64) -> String {
    match f {
        f64::INFINITY => "Infinity".to_owned(),
        f64::NEG_INFINITY => "-Infinity".to_owned(),
        _ => format!("{f}"),
    }
}

// Pieces of at most `max` bytes, never splitting a character
fn split_text(text: &str, max: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if i > start && i + c.len_utf8() - start > max {
            pieces.push(&text[start..i]);
            start = i;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

// Latin-1 with control and invisible characters escaped
fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &c in bytes {
        if c < 0x20 || (0x7f..0xa1).contains(&c) || c == 0xad {
            // Writing to a String does not fail
            let _ = write!(out, "\\x{c:02x}");
        } else {
            out.push(char::from(c));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use hex_literal::hex;

    fn dump(data: &[u8]) -> String {
        let mut out = String::new();
        for line in tokens_to_diagnostic(data, DEFAULT_WIDTH) {
            out.push_str(&line.unwrap());
            out.push('\n');
        }
        out
    }

    #[test]
    fn map_of_mixed_values() {
        let data = hex!("a4616101616282020363627566440102036165736d696c6564f09f9880");
        assert_eq!(
            dump(&data),
            r#"a4                                                # map(4)
  61                                              #   string(1)
    61                                            #     "a"
  01                                              #   uint(1)
  61                                              #   string(1)
    62                                            #     "b"
  82                                              #   array(2)
    02                                            #     uint(2)
    03                                            #     uint(3)
  63                                              #   string(3)
    627566                                        #     "buf"
  44                                              #   bytes(4)
    01020361                                      #     "\x01\x02\x03a"
  65                                              #   string(5)
    736d696c65                                    #     "smile"
  64                                              #   string(4)
    f09f9880                                      #     "😀"
"#
        );
    }

    #[test]
    fn indefinite_and_tagged() {
        let data = hex!("9ff5c11a514b67b03903e7f93c00ff");
        assert_eq!(
            dump(&data),
            r"9f                                                # array(indefinite)
  f5                                              #   true
  c1                                              #   tag(1)
    1a 514b67b0                                   #     uint(1363896240)
  39 03e7                                         #   negint(-1000)
  f9 3c00                                         #   float(1)
  ff                                              #   break
"
        );
    }

    #[test]
    fn long_strings_are_split() {
        let mut data = vec![0x78, 30];
        data.extend_from_slice(&[b'a'; 30]);
        let lines = tokens_to_diagnostic(&data, DEFAULT_WIDTH)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("78 1e "));
        assert!(lines[0].ends_with("# string(30)"));
        assert!(lines[1].ends_with(&format!("#   \"{}\"", "a".repeat(23))));
        assert!(lines[2].ends_with(&format!("#   \"{}\"", "a".repeat(7))));
    }

    #[test]
    fn long_text_splits_between_characters() {
        let text = format!("{}\u{1f600}b", "a".repeat(22));
        let mut data = vec![0x78, 27];
        data.extend_from_slice(text.as_bytes());
        let lines = tokens_to_diagnostic(&data, DEFAULT_WIDTH)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(&format!("#   \"{}\"", "a".repeat(22))));
        assert_eq!(
            lines[2],
            format!("{:<50}#   \"\u{1f600}b\"", "  f09f988062")
        );
        assert_eq!(split_text("\u{e9}\u{e9}", 1), ["\u{e9}", "\u{e9}"]);
        assert!(split_text("", 4).is_empty());
    }

    #[test]
    fn invalid_text_is_shown_as_bytes() {
        let lines = tokens_to_diagnostic(&hex!("628061"), DEFAULT_WIDTH)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(lines[0], format!("{:<50}# string(2)", "62"));
        assert_eq!(lines[1], format!("{:<50}#   \"\\x80a\"", "  8061"));
    }

    #[test]
    fn error_ends_output() {
        let mut lines = tokens_to_diagnostic(&hex!("011c02"), DEFAULT_WIDTH);
        assert!(lines.next().unwrap().is_ok());
        let err = lines.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidMinor { major: 0, minor: 28 });
        assert_eq!(err.byte_offset(), 1);
        assert!(err.to_string().starts_with("Diagnostic decode error:"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn parse_dump() {
        let data = hex!("a4616101616282020363627566440102036165736d696c6564f09f9880");
        assert_eq!(from_diag(&dump(&data)).unwrap(), data);

        assert_eq!(
            from_diag("82  # array(2)\n  01\n  f9 3c00 # float(1)").unwrap(),
            hex!("8201f93c00")
        );

        let err = from_diag("82 zz\n").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidDiagnostic);
        assert!(from_diag("820").is_err());
    }
}
