//! Locale datasets consumed by the person and network generators
//!
//! Generators never hold locale data themselves: they ask a
//! [`LocaleProvider`] for the list matching the run's locale code. The
//! built-in provider ships small English, French and German lists.

use seedling::{Context, DiagnosticKind};

/// Locale used when the requested one is unknown
pub const FALLBACK_LOCALE: &str = "en";

/// Source of per-locale word lists
pub trait LocaleProvider: Send + Sync {
    /// Given names for `locale`, `None` when the locale is unknown
    fn first_names(&self, locale: &str) -> Option<&[&str]>;

    /// Family names for `locale`, `None` when the locale is unknown
    fn last_names(&self, locale: &str) -> Option<&[&str]>;

    /// Whether `locale` is known to this provider
    fn supports(&self, locale: &str) -> bool {
        self.first_names(locale).is_some() && self.last_names(locale).is_some()
    }
}

/// Which list to read from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    First,
    Last,
}

/// Built-in `en`, `fr` and `de` lists
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLocales;

const EN_FIRST: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Daniel", "Emily", "Matthew", "Olivia",
];

const EN_LAST: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Wilson",
    "Anderson", "Taylor", "Thomas", "Moore", "Jackson", "Martin", "Lee", "Thompson", "White",
    "Harris", "Clark",
];

const FR_FIRST: &[&str] = &[
    "Jean", "Marie", "Pierre", "Camille", "Louis", "Léa", "Lucas", "Chloé", "Hugo", "Manon",
    "Gabriel", "Inès", "Jules", "Zoé", "Théo", "Juliette", "Arthur", "Élodie", "Raphaël", "Margaux",
];

const FR_LAST: &[&str] = &[
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
    "Moreau", "Simon", "Laurent", "Lefèvre", "Michel", "Garnier", "François", "Rousseau", "Fontaine",
];

const DE_FIRST: &[&str] = &[
    "Lukas", "Anna", "Jonas", "Lena", "Leon", "Marie", "Finn", "Sophie", "Paul", "Emma", "Felix",
    "Hannah", "Maximilian", "Mia", "Jürgen", "Katharina", "Tobias", "Lea", "Moritz", "Jörg",
];

const DE_LAST: &[&str] = &[
    "Müller", "Schmidt", "Schneider", "Fischer", "Weber", "Meyer", "Wagner", "Becker", "Schulz",
    "Hoffmann", "Schäfer", "Koch", "Bauer", "Richter", "Klein", "Wolf", "Schröder", "Neumann",
];

impl LocaleProvider for BuiltinLocales {
    fn first_names(&self, locale: &str) -> Option<&[&str]> {
        match locale {
            "en" => Some(EN_FIRST),
            "fr" => Some(FR_FIRST),
            "de" => Some(DE_FIRST),
            _ => None,
        }
    }

    fn last_names(&self, locale: &str) -> Option<&[&str]> {
        match locale {
            "en" => Some(EN_LAST),
            "fr" => Some(FR_LAST),
            "de" => Some(DE_LAST),
            _ => None,
        }
    }
}

/// Language part of a locale code: `fr-CA` and `fr_CA` both give `fr`
pub fn language(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Look up a name list for `locale`, trying the full code, then its
/// language, then [`FALLBACK_LOCALE`].
///
/// Falling back to the default records an `UnknownLocale` diagnostic.
pub fn names<'p>(
    provider: &'p dyn LocaleProvider,
    ctx: &mut Context<'_>,
    locale: &str,
    kind: NameKind,
) -> &'p [&'p str] {
    let lookup = |code: &str| match kind {
        NameKind::First => provider.first_names(code),
        NameKind::Last => provider.last_names(code),
    };

    if let Some(list) = lookup(locale) {
        return list;
    }
    if let Some(list) = lookup(language(locale)) {
        tracing::trace!(locale, language = language(locale), "using language-level name list");
        return list;
    }

    ctx.report(
        DiagnosticKind::UnknownLocale,
        format!("no {kind:?} names for locale '{locale}', using '{FALLBACK_LOCALE}'"),
    );
    lookup(FALLBACK_LOCALE).unwrap_or(match kind {
        NameKind::First => EN_FIRST,
        NameKind::Last => EN_LAST,
    })
}

/// Lowercase ASCII form of a name, suitable for identifiers and email local parts
pub fn ascii_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            'à' | 'â' | 'ä' | 'á' => slug.push('a'),
            'é' | 'è' | 'ê' | 'ë' => slug.push('e'),
            'î' | 'ï' | 'í' => slug.push('i'),
            'ô' | 'ö' | 'ó' => slug.push('o'),
            'ù' | 'û' | 'ü' | 'ú' => slug.push('u'),
            'ç' => slug.push('c'),
            'ß' => slug.push_str("ss"),
            _ => {}
        }
    }
    slug
}
