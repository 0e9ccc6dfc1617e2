//! Mapping raw uniform draws onto numeric distributions within a range.

use std::f64::consts::PI;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::rng::Pcg32;

/// Probability law used to place a value inside `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Distribution {
    /// Every value in the range is equally likely
    #[default]
    Uniform,
    /// Gaussian, clamped to the range. Defaults: mean at the midpoint,
    /// standard deviation a quarter of the range.
    Normal {
        mean: Option<f64>,
        std_dev: Option<f64>,
    },
    /// Exponential decay from `min`, clamped at `max`. Default rate puts the
    /// mean near the midpoint.
    Exponential { lambda: Option<f64> },
}

impl Distribution {
    /// Normal distribution with default parameters
    pub fn normal() -> Self {
        Distribution::Normal {
            mean: None,
            std_dev: None,
        }
    }

    /// Normal distribution with explicit parameters
    pub fn normal_with(mean: f64, std_dev: f64) -> Self {
        Distribution::Normal {
            mean: Some(mean),
            std_dev: Some(std_dev),
        }
    }

    /// Exponential distribution with the default rate
    pub fn exponential() -> Self {
        Distribution::Exponential { lambda: None }
    }

    /// Exponential distribution with an explicit rate
    pub fn exponential_with(lambda: f64) -> Self {
        Distribution::Exponential {
            lambda: Some(lambda),
        }
    }
}

/// Draw one value from `distribution` restricted to `[min, max]`.
///
/// Never fails: degenerate bounds and unusable parameters fall back to
/// `min` or to uniform sampling, with a diagnostic recorded under `path`.
pub fn sample(
    rng: &mut Pcg32,
    distribution: &Distribution,
    min: f64,
    max: f64,
    diagnostics: &mut Diagnostics,
    path: &str,
) -> f64 {
    if !min.is_finite() || !max.is_finite() {
        diagnostics.report(
            DiagnosticKind::DegenerateRange,
            path,
            format!("non-finite sampling bounds [{min}, {max}]"),
        );
        return if min.is_finite() {
            min
        } else if max.is_finite() {
            max
        } else {
            0.0
        };
    }

    let (min, max) = if min > max {
        diagnostics.report(
            DiagnosticKind::SwappedBounds,
            path,
            format!("sampling min {min} > max {max}, swapping"),
        );
        (max, min)
    } else {
        (min, max)
    };

    if min == max {
        diagnostics.report(
            DiagnosticKind::DegenerateRange,
            path,
            format!("empty sampling range at {min}"),
        );
        return min;
    }

    match *distribution {
        Distribution::Uniform => uniform(rng, min, max),
        Distribution::Normal { mean, std_dev } => {
            let std_dev = match std_dev {
                None => (max - min) / 4.0,
                Some(sd) if sd > 0.0 && sd.is_finite() => sd,
                Some(sd) => {
                    diagnostics.report(
                        DiagnosticKind::InvalidParameter,
                        path,
                        format!("normal std_dev {sd} must be positive, sampling uniformly"),
                    );
                    return uniform(rng, min, max);
                }
            };
            let mean = match mean {
                Some(m) if m.is_finite() => m,
                Some(m) => {
                    diagnostics.report(
                        DiagnosticKind::InvalidParameter,
                        path,
                        format!("normal mean {m} is not finite, using the midpoint"),
                    );
                    midpoint(min, max)
                }
                None => midpoint(min, max),
            };
            (mean + standard_normal(rng) * std_dev).clamp(min, max)
        }
        Distribution::Exponential { lambda } => {
            let lambda = match lambda {
                None => 2.0 / (max - min),
                Some(l) if l > 0.0 && l.is_finite() => l,
                Some(l) => {
                    diagnostics.report(
                        DiagnosticKind::InvalidParameter,
                        path,
                        format!("exponential lambda {l} must be positive, sampling uniformly"),
                    );
                    return uniform(rng, min, max);
                }
            };
            let u = nonzero_float(rng);
            (min - u.ln() / lambda).min(max)
        }
    }
}

fn uniform(rng: &mut Pcg32, min: f64, max: f64) -> f64 {
    let f = rng.next_float();
    let span = max - min;
    let value = if span.is_finite() {
        min + f * span
    } else {
        min * (1.0 - f) + max * f
    };
    value.clamp(min, max)
}

fn midpoint(min: f64, max: f64) -> f64 {
    min / 2.0 + max / 2.0
}

fn nonzero_float(rng: &mut Pcg32) -> f64 {
    loop {
        let u = rng.next_float();
        if u > 0.0 {
            return u;
        }
    }
}

/// Box-Muller transform over two uniform draws
fn standard_normal(rng: &mut Pcg32) -> f64 {
    let u1 = nonzero_float(rng);
    let u2 = rng.next_float();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
