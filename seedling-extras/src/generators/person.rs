//! Person name generators
//!
//! Names come from a [`LocaleProvider`], looked up with the run's locale
//! unless the schema pins one.

use std::fmt;
use std::sync::Arc;

use seedling::{Context, Schema};

use crate::locale::{BuiltinLocales, LocaleProvider, NameKind, names};

/// Options shared by the name generators
#[derive(Clone)]
pub struct NameOptions {
    /// Locale to use instead of the run's locale
    pub locale: Option<String>,
    pub provider: Arc<dyn LocaleProvider>,
}

impl Default for NameOptions {
    fn default() -> Self {
        Self {
            locale: None,
            provider: Arc::new(BuiltinLocales),
        }
    }
}

impl fmt::Debug for NameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameOptions")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

fn pick_name(ctx: &mut Context<'_>, options: &NameOptions, kind: NameKind) -> String {
    let locale = options
        .locale
        .clone()
        .unwrap_or_else(|| ctx.locale().to_string());
    let list = names(options.provider.as_ref(), ctx, &locale, kind);
    ctx.pick(list).map(|name| name.to_string()).unwrap_or_default()
}

/// Given name in the run's locale
pub fn first_name() -> Schema<String, NameOptions> {
    Schema::with_options(NameOptions::default(), |ctx, options: &NameOptions| {
        pick_name(ctx, options, NameKind::First)
    })
}

/// Family name in the run's locale
pub fn last_name() -> Schema<String, NameOptions> {
    Schema::with_options(NameOptions::default(), |ctx, options: &NameOptions| {
        pick_name(ctx, options, NameKind::Last)
    })
}

/// "First Last" in the run's locale
pub fn full_name() -> Schema<String, NameOptions> {
    Schema::with_options(NameOptions::default(), |ctx, options: &NameOptions| {
        let first = pick_name(ctx, options, NameKind::First);
        let last = pick_name(ctx, options, NameKind::Last);
        format!("{first} {last}")
    })
}

/// Typed setters for name schemas
pub trait NameSchemaExt: Sized {
    /// Pin the locale regardless of the run's locale
    fn locale(&self, locale: impl Into<String>) -> Self;
    fn provider(&self, provider: Arc<dyn LocaleProvider>) -> Self;
}

impl NameSchemaExt for Schema<String, NameOptions> {
    fn locale(&self, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        self.map_options(|o| o.locale = Some(locale))
    }

    fn provider(&self, provider: Arc<dyn LocaleProvider>) -> Self {
        self.map_options(|o| o.provider = provider)
    }
}
