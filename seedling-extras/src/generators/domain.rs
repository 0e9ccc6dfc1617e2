//! Domain-specific generators
//!
//! This module provides generators for common identifier formats:
//! - UUIDs (v4)
//! - Hexadecimal strings

use rand::RngCore;
use seedling::{Context, Schema};

// ============================================================================
// Hex Generator
// ============================================================================

/// Options for [`hex`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexOptions {
    pub min_len: usize,
    pub max_len: usize,
    /// Use A-F instead of a-f
    pub uppercase: bool,
}

impl Default for HexOptions {
    fn default() -> Self {
        Self {
            min_len: 8,
            max_len: 32,
            uppercase: false,
        }
    }
}

/// Hexadecimal strings, 8 to 32 lowercase digits by default
pub fn hex() -> Schema<String, HexOptions> {
    Schema::with_options(HexOptions::default(), generate_hex)
}

fn generate_hex(ctx: &mut Context<'_>, options: &HexOptions) -> String {
    let digits: &[u8; 16] = if options.uppercase {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let len: usize = ctx.int_in(options.min_len, options.max_len);
    (0..len)
        .map(|_| digits[(ctx.next_u32() & 0x0f) as usize] as char)
        .collect()
}

/// Typed setters for hex schemas
pub trait HexSchemaExt: Sized {
    fn length(&self, len: usize) -> Self;
    fn min_length(&self, len: usize) -> Self;
    fn max_length(&self, len: usize) -> Self;
    fn uppercase(&self, uppercase: bool) -> Self;
}

impl HexSchemaExt for Schema<String, HexOptions> {
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

    fn uppercase(&self, uppercase: bool) -> Self {
        self.map_options(|o| o.uppercase = uppercase)
    }
}

// ============================================================================
// UUID v4 Generator
// ============================================================================

/// UUID v4 strings in the standard format
///
/// xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx
///
/// Where x is any hex digit and y is one of 8, 9, a, or b. The sixteen
/// random bytes come from the run's source, so the value is reproducible.
pub fn uuid() -> Schema<String> {
    Schema::new(|ctx| {
        let mut bytes = [0u8; 16];
        ctx.rng().fill_bytes(&mut bytes);

        // Set version to 4 (bits 12-15 of time_hi_and_version)
        bytes[6] = (bytes[6] & 0x0f) | 0x40;

        // Set variant to RFC4122 (bits 6-7 of clock_seq_hi_and_reserved)
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        format_uuid(&bytes)
    })
}

fn format_uuid(bytes: &[u8; 16]) -> String {
    let mut out = String::with_capacity(36);
    for (i, byte) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
