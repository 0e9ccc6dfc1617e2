//! Numeric generators
//!
//! This module provides:
//! - [`int`]: integers in a range, optionally shaped by a distribution and
//!   restricted to multiples of a step
//! - [`float`]: floats in a range with optional decimal precision

use seedling::{Context, DiagnosticKind, Distribution, Schema};

// ============================================================================
// Integer Generator
// ============================================================================

/// Options for [`int`]
#[derive(Debug, Clone, PartialEq)]
pub struct IntOptions {
    pub min: i64,
    pub max: i64,
    pub distribution: Distribution,
    /// Only produce multiples of this step
    pub multiple_of: Option<i64>,
}

impl Default for IntOptions {
    fn default() -> Self {
        Self {
            min: 0,
            max: 1000,
            distribution: Distribution::Uniform,
            multiple_of: None,
        }
    }
}

/// Integers in `[0, 1000]` by default
pub fn int() -> Schema<i64, IntOptions> {
    Schema::with_options(IntOptions::default(), generate_int)
}

fn generate_int(ctx: &mut Context<'_>, options: &IntOptions) -> i64 {
    let (min, max) = if options.min > options.max {
        ctx.report(
            DiagnosticKind::SwappedBounds,
            format!("int min {} > max {}, swapping", options.min, options.max),
        );
        (options.max, options.min)
    } else {
        (options.min, options.max)
    };

    let step = match options.multiple_of {
        None | Some(1) => 1,
        Some(step) if step > 0 => step,
        Some(step) => {
            ctx.report(
                DiagnosticKind::InvalidParameter,
                format!("multiple_of {step} must be positive, ignoring it"),
            );
            1
        }
    };

    // Draw an index k in [lo, hi] and scale it, so every result is a multiple.
    let lo = div_ceil(min, step);
    let hi = max.div_euclid(step);
    if lo > hi {
        ctx.report(
            DiagnosticKind::DegenerateRange,
            format!("no multiple of {step} in [{min}, {max}], returning the lower bound"),
        );
        return min;
    }

    let k = match options.distribution {
        _ if lo == hi => lo,
        Distribution::Uniform => ctx.next_int(lo, hi),
        ref shaped => {
            let drawn = ctx.sample(shaped, lo as f64, hi as f64).round();
            (drawn as i64).clamp(lo, hi)
        }
    };
    k.saturating_mul(step)
}

fn div_ceil(value: i64, step: i64) -> i64 {
    let quotient = value.div_euclid(step);
    if value.rem_euclid(step) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

/// Typed setters for integer schemas
pub trait IntSchemaExt: Sized {
    /// Inclusive bounds
    fn range(&self, min: i64, max: i64) -> Self;
    fn min_value(&self, min: i64) -> Self;
    fn max_value(&self, max: i64) -> Self;
    fn distribution(&self, distribution: Distribution) -> Self;
    fn multiple_of(&self, step: i64) -> Self;
}

impl IntSchemaExt for Schema<i64, IntOptions> {
    fn range(&self, min: i64, max: i64) -> Self {
        self.map_options(|o| {
            o.min = min;
            o.max = max;
        })
    }

    fn min_value(&self, min: i64) -> Self {
        self.map_options(|o| o.min = min)
    }

    fn max_value(&self, max: i64) -> Self {
        self.map_options(|o| o.max = max)
    }

    fn distribution(&self, distribution: Distribution) -> Self {
        self.map_options(|o| o.distribution = distribution)
    }

    fn multiple_of(&self, step: i64) -> Self {
        self.map_options(|o| o.multiple_of = Some(step))
    }
}

// ============================================================================
// Float Generator
// ============================================================================

/// Options for [`float`]
#[derive(Debug, Clone, PartialEq)]
pub struct FloatOptions {
    pub min: f64,
    pub max: f64,
    /// Round to this many decimal places
    pub precision: Option<u32>,
    pub distribution: Distribution,
}

impl Default for FloatOptions {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            precision: None,
            distribution: Distribution::Uniform,
        }
    }
}

/// Floats in `[0, 1]` by default
pub fn float() -> Schema<f64, FloatOptions> {
    Schema::with_options(FloatOptions::default(), generate_float)
}

fn generate_float(ctx: &mut Context<'_>, options: &FloatOptions) -> f64 {
    let value = ctx.sample(&options.distribution, options.min, options.max);
    let Some(places) = options.precision else {
        return value;
    };

    let factor = 10f64.powi(places.min(300) as i32);
    let rounded = (value * factor).round() / factor;
    if !rounded.is_finite() {
        return value;
    }
    let (lo, hi) = if options.min <= options.max {
        (options.min, options.max)
    } else {
        (options.max, options.min)
    };
    if rounded < lo || rounded > hi {
        // Rounding pushed the value over a bound that is not itself on the grid.
        let step = 1.0 / factor;
        let nudged = if rounded < lo { rounded + step } else { rounded - step };
        if (lo..=hi).contains(&nudged) {
            return nudged;
        }
        return value;
    }
    rounded
}

/// Typed setters for float schemas
pub trait FloatSchemaExt: Sized {
    /// Inclusive bounds
    fn range(&self, min: f64, max: f64) -> Self;
    fn precision(&self, places: u32) -> Self;
    fn distribution(&self, distribution: Distribution) -> Self;
}

impl FloatSchemaExt for Schema<f64, FloatOptions> {
    fn range(&self, min: f64, max: f64) -> Self {
        self.map_options(|o| {
            o.min = min;
            o.max = max;
        })
    }

    fn precision(&self, places: u32) -> Self {
        self.map_options(|o| o.precision = Some(places))
    }

    fn distribution(&self, distribution: Distribution) -> Self {
        self.map_options(|o| o.distribution = distribution)
    }
}
