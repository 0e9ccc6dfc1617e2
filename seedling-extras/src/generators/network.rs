//! Network-related generators
//!
//! This module provides [`email`]. Addresses are either random
//! alphanumeric local parts or, with `from_name`, built from the run's
//! locale name lists.

use std::fmt;
use std::sync::Arc;

use seedling::{Context, DiagnosticKind, Schema};

use crate::locale::{BuiltinLocales, LocaleProvider, NameKind, ascii_slug, names};

// ============================================================================
// Email Generator
// ============================================================================

const LOCAL_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const FALLBACK_DOMAIN: &str = "example.com";

/// Options for [`email`]
#[derive(Clone)]
pub struct EmailOptions {
    /// Domains to pick from
    pub domains: Vec<String>,
    /// Inclusive length bounds of a random local part
    pub local_len: (usize, usize),
    /// Build the local part as `first.last` from locale names
    pub from_name: bool,
    /// Name lists used when `from_name` is set
    pub provider: Arc<dyn LocaleProvider>,
}

impl Default for EmailOptions {
    fn default() -> Self {
        Self {
            domains: ["example.com", "example.org", "example.net"]
                .into_iter()
                .map(String::from)
                .collect(),
            local_len: (5, 12),
            from_name: false,
            provider: Arc::new(BuiltinLocales),
        }
    }
}

impl fmt::Debug for EmailOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailOptions")
            .field("domains", &self.domains)
            .field("local_len", &self.local_len)
            .field("from_name", &self.from_name)
            .finish_non_exhaustive()
    }
}

/// Email addresses on reserved example domains by default
pub fn email() -> Schema<String, EmailOptions> {
    Schema::with_options(EmailOptions::default(), generate_email)
}

fn generate_email(ctx: &mut Context<'_>, options: &EmailOptions) -> String {
    let local = if options.from_name {
        let locale = ctx.locale().to_string();
        let first = names(options.provider.as_ref(), ctx, &locale, NameKind::First);
        let first = ctx.pick(first).map(|n| ascii_slug(n)).unwrap_or_default();
        let last = names(options.provider.as_ref(), ctx, &locale, NameKind::Last);
        let last = ctx.pick(last).map(|n| ascii_slug(n)).unwrap_or_default();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first}.{last}"),
            (false, true) => first,
            (true, false) => last,
            (true, true) => random_local(ctx, options.local_len),
        }
    } else {
        random_local(ctx, options.local_len)
    };

    let domain = match ctx.pick(&options.domains) {
        Some(domain) => domain.clone(),
        None => {
            ctx.report(
                DiagnosticKind::InvalidParameter,
                format!("no email domains configured, using {FALLBACK_DOMAIN}"),
            );
            FALLBACK_DOMAIN.to_string()
        }
    };

    format!("{local}@{domain}")
}

fn random_local(ctx: &mut Context<'_>, (min, max): (usize, usize)) -> String {
    let len: usize = ctx.int_in(min.max(1), max.max(1));
    (0..len)
        .filter_map(|_| ctx.pick(LOCAL_CHARS).map(|&b| b as char))
        .collect()
}

/// Typed setters for email schemas
pub trait EmailSchemaExt: Sized {
    fn domains<I, S>(&self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;
    /// Length bounds of a random local part
    fn local_length(&self, min: usize, max: usize) -> Self;
    fn from_name(&self, from_name: bool) -> Self;
    fn provider(&self, provider: Arc<dyn LocaleProvider>) -> Self;
}

impl EmailSchemaExt for Schema<String, EmailOptions> {
    fn domains<I, S>(&self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let domains: Vec<String> = domains.into_iter().map(Into::into).collect();
        self.map_options(|o| o.domains = domains)
    }

    fn local_length(&self, min: usize, max: usize) -> Self {
        self.map_options(|o| o.local_len = (min, max))
    }

    fn from_name(&self, from_name: bool) -> Self {
        self.map_options(|o| o.from_name = from_name)
    }

    fn provider(&self, provider: Arc<dyn LocaleProvider>) -> Self {
        self.map_options(|o| o.provider = provider)
    }
}
