//! Non-fatal generation diagnostics.
//!
//! Generation never fails once a schema has been built. Anything that had
//! to be degraded (swapped bounds, unsatisfiable constraints, exhausted
//! uniqueness budgets, failing user callbacks) is recorded here and logged
//! through `tracing`, so a harness can assert against it.

use std::fmt;

/// What kind of degradation happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A range was given with `min > max` and was swapped
    SwappedBounds,
    /// A range collapsed to a single value or had non-finite bounds
    DegenerateRange,
    /// A distribution or option parameter was unusable and a fallback was used
    InvalidParameter,
    /// A schema's constraints were never all satisfied
    ConstraintExhausted,
    /// A composite could not find enough distinct values
    UniquenessExhausted,
    /// Character exclusions left nothing to draw from
    ExclusionExhausted,
    /// A value filter (weekday, hour, multiple) was never satisfied
    FilterExhausted,
    /// A user supplied callback returned an error
    CallbackFailed,
    /// A value could not be converted to or from `serde_json::Value`
    SerializationFailed,
    /// The requested locale has no dataset
    UnknownLocale,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::SwappedBounds => "swapped-bounds",
            DiagnosticKind::DegenerateRange => "degenerate-range",
            DiagnosticKind::InvalidParameter => "invalid-parameter",
            DiagnosticKind::ConstraintExhausted => "constraint-exhausted",
            DiagnosticKind::UniquenessExhausted => "uniqueness-exhausted",
            DiagnosticKind::ExclusionExhausted => "exclusion-exhausted",
            DiagnosticKind::FilterExhausted => "filter-exhausted",
            DiagnosticKind::CallbackFailed => "callback-failed",
            DiagnosticKind::SerializationFailed => "serialization-failed",
            DiagnosticKind::UnknownLocale => "unknown-locale",
        };
        f.write_str(name)
    }
}

/// One recorded degradation
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Category of the problem
    pub kind: DiagnosticKind,
    /// Path of the node being generated when it happened
    pub path: String,
    /// Human readable detail
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.kind, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.kind, self.path, self.message)
        }
    }
}

/// Collector for the diagnostics of one run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a warning
    pub fn report(&mut self, kind: DiagnosticKind, path: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%kind, path, "{}", message);
        self.entries.push(Diagnostic {
            kind,
            path: path.to_string(),
            message,
        });
    }

    /// All diagnostics recorded so far, in order
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Whether any diagnostic of `kind` was recorded
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    /// Number of diagnostics of `kind`
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the collector
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
