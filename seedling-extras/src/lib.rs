//! # Seedling Extras
//!
//! Value generators for the seedling engine.
//!
//! This crate provides schemas for:
//! - **Text**: random strings with charsets, exclusions, prefix and suffix
//! - **Numeric**: integers and floats shaped by distributions
//! - **Boolean**: weighted coin flips
//! - **Domain**: UUID v4 and hex strings
//! - **Network**: email addresses
//! - **Finance**: card numbers with a Luhn check digit
//! - **DateTime**: chrono date-times with weekday and hour filters
//! - **Person**: locale-aware first, last and full names
//!
//! Every factory returns a plain [`seedling::Schema`], so the engine's
//! combinators (`optional`, `filter`, `transform`, ...) and composites
//! (`object`, `array`, ...) apply unchanged. Typed setters come from the
//! extension traits in [`prelude`].
//!
//! ## Quick Start
//!
//! ```rust
//! use seedling::{GenerateOptions, object};
//! use seedling_extras::prelude::*;
//!
//! let customer = object()
//!     .field("id", uuid())
//!     .field("name", full_name())
//!     .field("email", email().from_name(true))
//!     .field("age", int().range(18, 90))
//!     .field("code", string().length(5).alphabet("a"))
//!     .field("card", card_number())
//!     .build();
//!
//! let value = customer.generate(GenerateOptions::seeded(1).with_locale("fr"));
//! assert_eq!(value["code"], "aaaaa");
//! assert_eq!(value["id"].as_str().map(str::len), Some(36));
//! assert!(luhn_valid(value["card"].as_str().unwrap()));
//! ```
//!
//! ## Locales
//!
//! Name-based generators read the run's locale (see
//! [`seedling::GenerateOptions::with_locale`]) through a
//! [`locale::LocaleProvider`]. Unknown locales fall back to English and
//! record an `UnknownLocale` diagnostic.
//!
//! ```rust
//! use seedling::{DiagnosticKind, GenerateOptions};
//! use seedling_extras::prelude::*;
//!
//! let generated = first_name().run(GenerateOptions::seeded(3).with_locale("xx"));
//! assert!(generated.has(DiagnosticKind::UnknownLocale));
//! ```

// Re-export seedling for convenience
pub use seedling;

// Generators module
pub mod generators;

// Locale datasets
pub mod locale;

pub use generators::{boolean, datetime, domain, finance, network, numeric, person, text};

// Re-export commonly used items
pub mod prelude {
    //! Convenient re-exports of the factories and their setter traits

    // Text
    pub use crate::generators::text::{Charset, StringOptions, StringSchemaExt, string};

    // Numeric
    pub use crate::generators::numeric::{
        FloatOptions, FloatSchemaExt, IntOptions, IntSchemaExt, float, int,
    };

    // Boolean
    pub use crate::generators::boolean::{BoolOptions, BoolSchemaExt, boolean};

    // Domain
    pub use crate::generators::domain::{HexOptions, HexSchemaExt, hex, uuid};

    // Network
    pub use crate::generators::network::{EmailOptions, EmailSchemaExt, email};

    // Finance
    pub use crate::generators::finance::{
        CardOptions, CardSchemaExt, card_number, luhn_check_digit, luhn_valid,
    };

    // DateTime
    pub use crate::generators::datetime::{DateTimeOptions, DateTimeSchemaExt, datetime};

    // Person
    pub use crate::generators::person::{
        NameOptions, NameSchemaExt, first_name, full_name, last_name,
    };

    // Locales
    pub use crate::locale::{BuiltinLocales, LocaleProvider};
}
