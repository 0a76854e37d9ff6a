//! Lexical scanning of enum reverse-mappings.
//!
//! TypeScript-style enums compile to a self-assigning idiom:
//!
//! ```text
//! (function (e) {
//!     e[e.None = 0] = "None";
//!     e[e.UserId = 1] = "UserId";
//! })(Kind || (Kind = {}));
//! ```
//!
//! Each `e[e.<Member> = <Number>]` occurrence yields one [`Token`]. Nothing
//! else in the artifact is understood; non-matching text is skipped.
//!
//! ## Algorithm Overview
//!
//! 1. Find every `[<container>.<member> = <number>]` bracket with a regex
//! 2. Check that the identifier directly before the bracket is the same
//!    container (ASCII case-insensitive), and not the tail of a longer name
//! 3. Parse the number, dropping occurrences that do not fit `u32`
//!
//! ## Extensibility
//!
//! The [`TokenSource`] trait lets the schema builder be driven by anything
//! that yields tokens in document order:
//!
//! ```
//! use revenum_core::scanner::{Token, TokenSource};
//!
//! struct Fixed(Vec<Token>);
//!
//! impl TokenSource for Fixed {
//!     fn tokens<'a>(&'a self, _text: &'a str) -> Box<dyn Iterator<Item = Token> + 'a> {
//!         Box::new(self.0.iter().cloned())
//!     }
//! }
//! ```

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::ops::Range;
use std::path::Path;
use tracing::{debug, trace};

lazy_static! {
    /// The bracketed half of the idiom: `[<container>.<member> = <number>]`.
    /// The outer container is checked by hand since `regex` has no backreferences.
    static ref REVERSE_MAPPING: Regex = Regex::new(
        r"(?i)\[\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*\.\s*([A-Za-z0-9_]+)\s*=\s*(\d+)\s*\]"
    )
    .unwrap();
}

/// One `(name, index)` pair recovered from the artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Enum member name, original casing
    pub name: String,
    /// Numeric value assigned to the member
    pub index: u32,
    /// Byte range of the whole idiom occurrence in the artifact
    pub span: Range<usize>,
}

impl Token {
    /// Creates a token with an empty span, for synthetic sequences
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
            span: 0..0,
        }
    }

    /// Sets the source span
    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = span;
        self
    }
}

/// Configuration for the scanner
#[derive(Debug, Clone, Default)]
pub struct ScannerConfig {
    /// Maximum number of tokens to yield (0 = unlimited)
    pub max_tokens: usize,
}

impl ScannerConfig {
    /// Creates a new scanner config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of tokens to yield
    pub fn max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = max;
        self
    }
}

/// Trait for anything that turns artifact text into a token sequence
///
/// Implementations must preserve document order: the schema builder relies
/// on it to group fields into models.
pub trait TokenSource {
    /// Lazily yield the tokens found in `text`, in document order
    fn tokens<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = Token> + 'a>;

    /// Collect every token into a vector
    fn collect_tokens(&self, text: &str) -> Vec<Token> {
        self.tokens(text).collect()
    }
}

/// Regex-driven scanner for the reverse-mapping idiom
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    /// Creates a new scanner with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Turn one regex match into a token, if the surrounding text agrees
    fn match_token(text: &str, caps: &Captures<'_>) -> Option<Token> {
        let bracket = caps.get(0)?;
        let container = caps.get(1)?.as_str();
        let member = caps.get(2)?.as_str();
        let number = caps.get(3)?.as_str();

        let start = owning_container_start(text, bracket.start(), container)?;

        let Ok(index) = number.parse::<u32>() else {
            trace!("Skipping {}.{}: index {} out of range", container, member, number);
            return None;
        };

        Some(Token::new(member, index).with_span(start..bracket.end()))
    }
}

impl TokenSource for Scanner {
    fn tokens<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = Token> + 'a> {
        debug!("Scanning {} bytes for enum reverse-mappings", text.len());

        let iter = REVERSE_MAPPING
            .captures_iter(text)
            .filter_map(move |caps| Self::match_token(text, &caps))
            .inspect(|token| {
                trace!(
                    "Token {} = {} at {}..{}",
                    token.name,
                    token.index,
                    token.span.start,
                    token.span.end
                );
            });

        if self.config.max_tokens > 0 {
            Box::new(iter.take(self.config.max_tokens))
        } else {
            Box::new(iter)
        }
    }
}

/// Find where the container identifier owning the bracket at `bracket_start` begins.
///
/// The text right before `[` must end with `container` and the character
/// before that must not continue the identifier.
fn owning_container_start(text: &str, bracket_start: usize, container: &str) -> Option<usize> {
    let start = bracket_start.checked_sub(container.len())?;
    let outer = text.get(start..bracket_start)?;
    if !outer.eq_ignore_ascii_case(container) {
        return None;
    }

    let continues_identifier = text[..start]
        .chars()
        .next_back()
        .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    (!continues_identifier).then_some(start)
}

/// Read an artifact into memory
///
/// This is the one fallible step of the pipeline.
pub fn read_artifact(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<(String, u32)> {
        Scanner::new()
            .tokens(text)
            .map(|t| (t.name, t.index))
            .collect()
    }

    #[test]
    fn test_minified_enum() {
        let text = r#"!function(e){e[e.None=0]="None",e[e.UserId=1]="UserId"}(t||(t={}))"#;
        assert_eq!(
            scan(text),
            vec![("None".to_string(), 0), ("UserId".to_string(), 1)]
        );
    }

    #[test]
    fn test_spaced_enum_preserves_order() {
        let text = "e[e.Zeta = 7] = \"Zeta\";\n  e[e.alpha = 2] = \"alpha\";\n";
        assert_eq!(
            scan(text),
            vec![("Zeta".to_string(), 7), ("alpha".to_string(), 2)]
        );
    }

    #[test]
    fn test_container_case_insensitive() {
        assert_eq!(scan("E[e.Foo = 3]"), vec![("Foo".to_string(), 3)]);
        assert_eq!(scan("Kind[KIND.Bar = 4]"), vec![("Bar".to_string(), 4)]);
    }

    #[test]
    fn test_container_mismatch_rejected() {
        assert!(scan("a[b.Foo = 1]").is_empty());
        // `xe` is not the container `e`
        assert!(scan("xe[e.Foo = 1]").is_empty());
    }

    #[test]
    fn test_span_covers_container() {
        let text = "var x; e[e.Foo = 12] = \"Foo\"";
        let tokens = Scanner::new().collect_tokens(text);
        assert_eq!(tokens.len(), 1);
        assert_eq!(&text[tokens[0].span.clone()], "e[e.Foo = 12]");
    }

    #[test]
    fn test_index_overflow_skipped() {
        assert_eq!(
            scan("e[e.Big = 99999999999] e[e.Small = 5]"),
            vec![("Small".to_string(), 5)]
        );
    }

    #[test]
    fn test_no_matches() {
        assert!(scan("").is_empty());
        assert!(scan("const x = y[z]; obj.field = 3;").is_empty());
    }

    #[test]
    fn test_max_tokens() {
        let scanner = Scanner::with_config(ScannerConfig::new().max_tokens(2));
        let tokens = scanner.collect_tokens("e[e.A=0] e[e.B=1] e[e.C=2]");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].name, "B");
    }

    #[test]
    fn test_read_artifact_missing() {
        let err = read_artifact("/definitely/not/here/worker.js").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
