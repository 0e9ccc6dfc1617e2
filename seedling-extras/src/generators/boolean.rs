//! Boolean generator with a configurable probability of `true`

use seedling::{Context, DiagnosticKind, Schema};

/// Options for [`boolean`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoolOptions {
    /// Probability of `true`, in `[0, 1]`
    pub probability: f64,
}

impl Default for BoolOptions {
    fn default() -> Self {
        Self { probability: 0.5 }
    }
}

/// Fair coin by default; always one draw per value
pub fn boolean() -> Schema<bool, BoolOptions> {
    Schema::with_options(BoolOptions::default(), generate_bool)
}

fn generate_bool(ctx: &mut Context<'_>, options: &BoolOptions) -> bool {
    let p = options.probability;
    if !(0.0..=1.0).contains(&p) {
        ctx.report(
            DiagnosticKind::InvalidParameter,
            format!("boolean probability {p} is outside [0, 1]"),
        );
    }
    ctx.next_bool(p)
}

/// Typed setters for boolean schemas
pub trait BoolSchemaExt: Sized {
    fn probability(&self, probability: f64) -> Self;
}

impl BoolSchemaExt for Schema<bool, BoolOptions> {
    fn probability(&self, probability: f64) -> Self {
        self.map_options(|o| o.probability = probability)
    }
}
