//! Text and string generators
//!
//! This module provides [`string`], a configurable random string schema:
//! - Length bounds
//! - Character sets, either presets ([`Charset`]) or explicit alphabets
//! - Excluded characters
//! - Fixed prefix and suffix

use seedling::{Context, DiagnosticKind, Schema};

// ============================================================================
// Character sets
// ============================================================================

/// Preset character sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// a-z, A-Z
    Alphabetic,
    /// a-z, A-Z, 0-9
    Alphanumeric,
    /// a-z
    Lowercase,
    /// A-Z
    Uppercase,
    /// 0-9
    Numeric,
    /// 0-9, a-f
    Hex,
    /// Printable ASCII including space
    AsciiPrintable,
}

impl Charset {
    /// Characters in this set, in code point order
    pub fn chars(self) -> Vec<char> {
        match self {
            Charset::Alphabetic => ('a'..='z').chain('A'..='Z').collect(),
            Charset::Alphanumeric => ('a'..='z').chain('A'..='Z').chain('0'..='9').collect(),
            Charset::Lowercase => ('a'..='z').collect(),
            Charset::Uppercase => ('A'..='Z').collect(),
            Charset::Numeric => ('0'..='9').collect(),
            Charset::Hex => ('0'..='9').chain('a'..='f').collect(),
            Charset::AsciiPrintable => (' '..='~').collect(),
        }
    }
}

// ============================================================================
// String Generator
// ============================================================================

/// Options for [`string`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringOptions {
    /// Minimum number of random characters, excluding prefix and suffix
    pub min_len: usize,
    /// Maximum number of random characters, excluding prefix and suffix
    pub max_len: usize,
    /// Characters to draw from
    pub charset: Vec<char>,
    /// Characters that must never appear in the random part
    pub exclude: Vec<char>,
    pub prefix: String,
    pub suffix: String,
}

impl Default for StringOptions {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 16,
            charset: Charset::Alphanumeric.chars(),
            exclude: Vec::new(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

/// Random strings; alphanumeric, 1 to 16 characters by default
pub fn string() -> Schema<String, StringOptions> {
    Schema::with_options(StringOptions::default(), generate_string)
}

fn generate_string(ctx: &mut Context<'_>, options: &StringOptions) -> String {
    let len: usize = ctx.int_in(options.min_len, options.max_len);
    let mut out = String::with_capacity(options.prefix.len() + len + options.suffix.len());
    out.push_str(&options.prefix);

    if options.charset.is_empty() {
        if len > 0 {
            ctx.report(
                DiagnosticKind::InvalidParameter,
                "string charset is empty, generating only prefix and suffix",
            );
        }
        out.push_str(&options.suffix);
        return out;
    }

    let max_attempts = ctx.config().filter_attempts;
    let mut dropped = 0usize;
    for _ in 0..len {
        let mut accepted = None;
        for _ in 0..max_attempts {
            let Some(&c) = ctx.pick(&options.charset) else {
                break;
            };
            if !options.exclude.contains(&c) {
                accepted = Some(c);
                break;
            }
        }
        match accepted {
            Some(c) => out.push(c),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        ctx.report(
            DiagnosticKind::ExclusionExhausted,
            format!("dropped {dropped} of {len} characters: no allowed character after {max_attempts} draws"),
        );
    }

    out.push_str(&options.suffix);
    out
}

/// Typed setters for string schemas
pub trait StringSchemaExt: Sized {
    /// Exact number of random characters
    fn length(&self, len: usize) -> Self;
    fn min_length(&self, len: usize) -> Self;
    fn max_length(&self, len: usize) -> Self;
    /// Draw from the characters of `alphabet`
    fn alphabet(&self, alphabet: &str) -> Self;
    /// Draw from a preset character set
    fn charset(&self, charset: Charset) -> Self;
    /// Never emit any character of `chars`
    fn exclude(&self, chars: &str) -> Self;
    fn prefix(&self, prefix: impl Into<String>) -> Self;
    fn suffix(&self, suffix: impl Into<String>) -> Self;
}

impl StringSchemaExt for Schema<String, StringOptions> {
    fn length(&self, len: usize) -> Self {
        self.map_options(|o| {
            o.min_len = len;
            o.max_len = len;
        })
    }

    fn min_length(&self, len: usize) -> Self {
        self.map_options(|o| o.min_len = len)
    }

    fn max_length(&self, len: usize) -> Self {
        self.map_options(|o| o.max_len = len)
    }

    fn alphabet(&self, alphabet: &str) -> Self {
        let chars: Vec<char> = alphabet.chars().collect();
        self.map_options(|o| o.charset = chars)
    }

    fn charset(&self, charset: Charset) -> Self {
        self.map_options(|o| o.charset = charset.chars())
    }

    fn exclude(&self, chars: &str) -> Self {
        self.map_options(|o| o.exclude = chars.chars().collect())
    }

    fn prefix(&self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.map_options(|o| o.prefix = prefix)
    }

    fn suffix(&self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.map_options(|o| o.suffix = suffix)
    }
}
