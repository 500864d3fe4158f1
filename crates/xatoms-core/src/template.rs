//! # Output templates
//!
//! A [`Template`] is a printf-style format string compiled once into a list of
//! [`Token`]s. Rendering walks the token list and never re-scans the raw
//! string.
//!
//! ## Syntax
//!
//! - `%d` - the atom identifier in decimal
//! - `%s` - the atom name, raw bytes
//! - `%%` - a literal `%`
//! - `\n`, `\t`, `\r` - newline, tab, carriage return (expanded before
//!   compilation)
//!
//! Everything else is literal text. That includes a trailing `%`, a `%`
//! followed by any other byte, and any other backslash sequence.

use crate::atom::AtomId;
use core::fmt;
use std::io::{self, Write};

/// Template used when `--format` is not given.
pub const DEFAULT_FORMAT: &str = "%d\\t%s\\n";

/// A compiled template element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Bytes copied to the output as-is.
    Literal(Vec<u8>),
    /// The atom identifier, in decimal.
    Id,
    /// The atom name.
    Name,
    /// A single `%`.
    Percent,
}

/// A compiled output template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    tokens: Vec<Token>,
}

impl Template {
    /// Expands backslash escapes in `raw` and compiles the result.
    pub fn parse(raw: &str) -> Self {
        Self::compile(&expand_escapes(raw.as_bytes()))
    }

    /// Compiles an already-expanded template.
    pub fn compile(bytes: &[u8]) -> Self {
        let mut tokens = Vec::new();
        let mut literal = Vec::new();
        let mut iter = bytes.iter().copied().peekable();

        while let Some(byte) = iter.next() {
            let token = match (byte, iter.peek()) {
                (b'%', Some(b'd')) => Token::Id,
                (b'%', Some(b's')) => Token::Name,
                (b'%', Some(b'%')) => Token::Percent,
                _ => {
                    literal.push(byte);
                    continue;
                }
            };
            iter.next();
            if !literal.is_empty() {
                tokens.push(Token::Literal(core::mem::take(&mut literal)));
            }
            tokens.push(token);
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Writes one record for `atom` / `name` to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `out`.
    pub fn render<W>(&self, out: &mut W, atom: AtomId, name: &[u8]) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        for token in &self.tokens {
            match token {
                Token::Literal(bytes) => out.write_all(bytes)?,
                Token::Id => write!(out, "{atom}")?,
                Token::Name => out.write_all(name)?,
                Token::Percent => out.write_all(b"%")?,
            }
        }
        Ok(())
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::parse(DEFAULT_FORMAT)
    }
}

impl fmt::Display for Template {
    /// Writes the template back in its source syntax, with escapes applied.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                Token::Literal(bytes) => write!(f, "{}", bytes.escape_ascii())?,
                Token::Id => f.write_str("%d")?,
                Token::Name => f.write_str("%s")?,
                Token::Percent => f.write_str("%%")?,
            }
        }
        Ok(())
    }
}

/// Replaces `\n`, `\t` and `\r` with the bytes they name. Any other backslash
/// is kept along with the byte after it.
pub fn expand_escapes(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut iter = raw.iter().copied().peekable();

    while let Some(byte) = iter.next() {
        if byte != b'\\' {
            out.push(byte);
            continue;
        }
        let expanded = match iter.peek() {
            Some(b'n') => b'\n',
            Some(b't') => b'\t',
            Some(b'r') => b'\r',
            _ => {
                out.push(byte);
                continue;
            }
        };
        iter.next();
        out.push(expanded);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: &str, atom: AtomId, name: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        Template::parse(format).render(&mut out, atom, name).unwrap();
        out
    }

    #[test]
    fn substitutes_id_and_name() {
        assert_eq!(render("%d=%s;", 42, b"FOO"), b"42=FOO;");
    }

    #[test]
    fn default_format_is_tab_separated_line() {
        let mut out = Vec::new();
        Template::default().render(&mut out, 39, b"WM_NAME").unwrap();
        assert_eq!(out, b"39\tWM_NAME\n");
    }

    #[test]
    fn percent_escape() {
        assert_eq!(render("100%%", 1, b"X"), b"100%");
        assert_eq!(
            Template::parse("100%%").tokens(),
            &[Token::Literal(b"100".to_vec()), Token::Percent]
        );
    }

    #[test]
    fn trailing_percent_is_literal() {
        assert_eq!(render("%s 100%", 1, b"X"), b"X 100%");
        assert_eq!(render("%", 1, b"X"), b"%");
    }

    #[test]
    fn unknown_specifier_is_literal() {
        assert_eq!(render("%x %d", 5, b"X"), b"%x 5");
        assert_eq!(render("%%d", 5, b"X"), b"%d");
    }

    #[test]
    fn escapes_expand_before_compilation() {
        assert_eq!(expand_escapes(br"a\tb\nc\rd"), b"a\tb\nc\rd");
        assert_eq!(expand_escapes(br"\q"), br"\q");
        assert_eq!(expand_escapes(br"trailing\"), br"trailing\");
        assert_eq!(expand_escapes(br"\\n"), b"\\\n");
        assert_eq!(render(r"%d\t%s\n", 7, b"N"), b"7\tN\n");
    }

    #[test]
    fn name_bytes_are_copied_raw() {
        assert_eq!(render("[%s]", 9, b"\x00\xff%d"), b"[\x00\xff%d]");
    }

    #[test]
    fn literal_runs_are_merged() {
        let template = Template::parse("a%zb%sc");
        assert_eq!(
            template.tokens(),
            &[
                Token::Literal(b"a%zb".to_vec()),
                Token::Name,
                Token::Literal(b"c".to_vec()),
            ]
        );
    }

    #[test]
    fn display_round_trips_source_syntax() {
        assert_eq!(Template::default().to_string(), r"%d\t%s\n");
        assert_eq!(Template::parse("100%%").to_string(), "100%%");
    }

    #[test]
    fn empty_template_renders_nothing() {
        assert_eq!(render("", 1, b"X"), b"");
        assert!(Template::parse("").tokens().is_empty());
    }
}
