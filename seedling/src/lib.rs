//! # Seedling - Seeded Synthetic Test Data
//!
//! Seedling builds structured test data from declarative, composable schemas
//! evaluated against a seeded pseudorandom source. The same schema and seed
//! always produce the same output tree, so a failing test can be replayed
//! from the seed printed alongside it.
//!
//! ## Quick Start
//!
//! ```rust
//! use seedling::composite::{array, object};
//! use seedling::factory::one_of;
//! use seedling::{GenerateOptions, Schema};
//!
//! let role = one_of(vec!["admin", "editor", "viewer"]).unwrap();
//! let user = object()
//!     .field("id", Schema::new(|ctx| ctx.next_int(1, 10_000)))
//!     .field("role", role)
//!     .field("scores", array(Schema::new(|ctx| ctx.next_int(0, 100))).length(3))
//!     .build();
//!
//! let generated = user.run(GenerateOptions::seeded(42));
//! assert_eq!(generated.value, user.generate(GenerateOptions::seeded(generated.seed)));
//! assert_eq!(generated.value["scores"].as_array().map(Vec::len), Some(3));
//! ```
//!
//! Nothing that happens during generation is an error. Reversed ranges,
//! exhausted retries and failing callbacks degrade to a best-effort value
//! and are recorded as [`Diagnostic`]s on the run.

pub mod composite;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod distribution;
pub mod error;
pub mod factory;
pub mod parallel;
pub mod rng;
pub mod schema;

// Re-export the main public API
pub use composite::{ArrayOptions, ObjectSchema, RecordOptions};
pub use config::{
    ConfigError, ConfigManager, EngineConfig, GenerateOptions, get_global_config,
    reset_global_config, set_global_config,
};
pub use context::{Cache, Context, Parent, Run, Segment};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use distribution::Distribution;
pub use error::{BoxError, CallbackResult, SchemaError};
pub use parallel::{ParallelConfig, generate_batches, run_batches};
pub use rng::{DefaultRngProvider, Pcg32, RngProvider};
pub use schema::{Generated, RetryPolicy, Schema, Step, step};

// Re-export schema builders for convenience
pub use composite::{array, object, record, tuple2, tuple3, union};
pub use factory::{constant, one_of, weighted};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_retries, 10);
        assert_eq!(config.unique_attempt_factor, 10);
        assert_eq!(config.filter_attempts, 100);
    }

    #[test]
    fn test_public_api_integration() {
        let schema = tuple2(constant(42), Schema::new(|ctx| ctx.next_int(1, 10)));
        let (left, right) = schema.generate(GenerateOptions::seeded(5));
        assert_eq!(left, 42);
        assert!((1..=10).contains(&right));
    }

    #[test]
    fn test_schema_composition_public_api() {
        let schema = Schema::new(|ctx| ctx.next_int(1, 5))
            .transform(|x, _| x * 2)
            .filter_retries(|&x| x > 4, 50);

        let generated = schema.run(GenerateOptions::seeded(17));
        assert!(generated.diagnostics.is_empty());
        assert!(generated.value > 4 && generated.value <= 10);
        assert_eq!(generated.value % 2, 0);
    }

    #[test]
    fn test_diagnostic_display() {
        let generated = Schema::new(|ctx| ctx.next_int(9, 1)).run(GenerateOptions::seeded(1));
        assert_eq!(generated.diagnostics.len(), 1);
        assert!(
            generated.diagnostics[0]
                .to_string()
                .starts_with("[swapped-bounds]")
        );
    }
}
