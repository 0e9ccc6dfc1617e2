//! Schemas: immutable, composable descriptions of how to produce one value.
//!
//! A [`Schema<T, O>`] bundles a generator function, a list of constraints
//! and an option record `O`. Every combinator returns a *new* schema that
//! wraps the old generator; the receiver is never modified, so a base schema
//! can be specialised several ways.
//!
//! ```rust
//! use seedling::{GenerateOptions, Schema};
//!
//! let dice = Schema::new(|ctx| ctx.next_int(1, 6));
//! let even = dice.filter(|v| v % 2 == 0);
//!
//! let a = even.generate(GenerateOptions::seeded(42));
//! let b = even.generate(GenerateOptions::seeded(42));
//! assert_eq!(a, b);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{GenerateOptions, get_global_config};
use crate::context::{Context, Run, Segment};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::CallbackResult;

type GeneratorFn<T, O> = dyn Fn(&mut Context<'_>, &O) -> T + Send + Sync;
type PredicateFn<T> = dyn Fn(&T) -> bool + Send + Sync;

/// One step of a [`Schema::pipe`] chain
pub type Step<T> = Arc<dyn Fn(T, &mut Context<'_>) -> T + Send + Sync>;

/// Wrap a closure as a pipe step
pub fn step<T, F>(f: F) -> Step<T>
where
    F: Fn(T, &mut Context<'_>) -> T + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How the attempt budget is derived when several constraints are attached.
///
/// The schema makes `1 + budget` attempts in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Retries of the first attached constraint
    #[default]
    First,
    /// Smallest retry count among the constraints
    Min,
    /// Largest retry count among the constraints
    Max,
    /// Sum of all retry counts
    Sum,
}

impl RetryPolicy {
    fn budget(self, retries: impl Iterator<Item = usize>) -> usize {
        match self {
            RetryPolicy::First => retries.take(1).sum(),
            RetryPolicy::Min => retries.min().unwrap_or(0),
            RetryPolicy::Max => retries.max().unwrap_or(0),
            RetryPolicy::Sum => retries.fold(0usize, usize::saturating_add),
        }
    }
}

struct Constraint<T> {
    predicate: Arc<PredicateFn<T>>,
    retries: usize,
}

impl<T> Clone for Constraint<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            retries: self.retries,
        }
    }
}

/// Value produced by a root call together with how it was produced
#[derive(Debug, Clone)]
pub struct Generated<T> {
    /// The generated value
    pub value: T,
    /// Seed the run was built from; pass it back to reproduce `value`
    pub seed: u64,
    /// Everything that had to be degraded along the way
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Generated<T> {
    /// Whether a diagnostic of `kind` was recorded
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }
}

/// Immutable description of how to produce one `T`
pub struct Schema<T, O = ()> {
    generator: Arc<GeneratorFn<T, O>>,
    constraints: Vec<Constraint<T>>,
    retry_policy: RetryPolicy,
    options: O,
}

impl<T, O: Clone> Clone for Schema<T, O> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            constraints: self.constraints.clone(),
            retry_policy: self.retry_policy,
            options: self.options.clone(),
        }
    }
}

impl<T, O: fmt::Debug> fmt::Debug for Schema<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("value", &std::any::type_name::<T>())
            .field("constraints", &self.constraints.len())
            .field("retry_policy", &self.retry_policy)
            .field("options", &self.options)
            .finish()
    }
}

impl<T: 'static> Schema<T, ()> {
    /// Schema from a plain generator function
    pub fn new<F>(generator: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> T + Send + Sync + 'static,
    {
        Self::with_options((), move |ctx, _| generator(ctx))
    }
}

impl<T, O> Schema<T, O>
where
    T: 'static,
    O: Clone + Send + Sync + 'static,
{
    /// Schema whose generator reads an option record
    pub fn with_options<F>(options: O, generator: F) -> Self
    where
        F: Fn(&mut Context<'_>, &O) -> T + Send + Sync + 'static,
    {
        Self {
            generator: Arc::new(generator),
            constraints: Vec::new(),
            retry_policy: RetryPolicy::default(),
            options,
        }
    }

    fn wrap<U, F>(&self, generator: F) -> Schema<U, O>
    where
        U: 'static,
        F: Fn(&mut Context<'_>, &O) -> U + Send + Sync + 'static,
    {
        Schema::with_options(self.options.clone(), generator)
    }

    /// Current option record
    pub fn options(&self) -> &O {
        &self.options
    }

    /// New schema with a modified copy of the option record.
    ///
    /// No validation happens here; generators check their options when they run.
    pub fn map_options(&self, update: impl FnOnce(&mut O)) -> Self {
        let mut next = self.clone();
        update(&mut next.options);
        next
    }

    /// Number of constraints attached
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Generate inside an existing run
    pub fn generate_in(&self, ctx: &mut Context<'_>) -> T {
        self.produce(ctx, &self.options)
    }

    /// Run the generator under this schema's constraints.
    ///
    /// The whole generation is retried as one unit; when every attempt is
    /// rejected the last value is returned and the exhaustion is reported.
    fn produce(&self, ctx: &mut Context<'_>, options: &O) -> T {
        if self.constraints.is_empty() {
            return (self.generator)(ctx, options);
        }

        let budget = self
            .retry_policy
            .budget(self.constraints.iter().map(|c| c.retries));
        let attempts = budget.saturating_add(1);
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            let value = (self.generator)(ctx, options);
            if self.constraints.iter().all(|c| (c.predicate)(&value)) {
                return value;
            }
            tracing::trace!(path = ctx.path(), attempt, attempts, "constraint rejected value");
            if attempt >= attempts {
                ctx.report(
                    DiagnosticKind::ConstraintExhausted,
                    format!("no value satisfied the constraints after {attempts} attempts, using the last one"),
                );
                return value;
            }
        }
    }

    /// Generate one value in a fresh run
    pub fn generate(&self, options: GenerateOptions<'_>) -> T {
        self.run(options).value
    }

    /// Generate one value and report the seed and diagnostics of the run
    pub fn run(&self, options: GenerateOptions<'_>) -> Generated<T> {
        let mut run = Run::new(options);
        let value = {
            let mut ctx = run.context();
            self.generate_in(&mut ctx)
        };
        Generated {
            value,
            seed: run.seed(),
            diagnostics: run.into_diagnostics().into_vec(),
        }
    }

    /// Generate `count` values from one continuous stream.
    ///
    /// The batch shares a single source and cache, so element `i` is not
    /// the value a separate `generate` with the same seed would give.
    pub fn generate_many(&self, count: usize, seed: Option<u64>) -> Vec<T> {
        let options = GenerateOptions {
            seed,
            ..GenerateOptions::default()
        };
        self.run_many(count, options).value
    }

    /// [`Schema::generate_many`] with full overrides and the run report
    pub fn run_many(&self, count: usize, options: GenerateOptions<'_>) -> Generated<Vec<T>> {
        self.run_batch(count, Run::new(options))
    }

    pub(crate) fn run_batch(&self, count: usize, mut run: Run<'_>) -> Generated<Vec<T>> {
        let values = {
            let mut ctx = run.context();
            (0..count)
                .map(|i| {
                    let mut item = ctx.derive(Segment::Index(i), None);
                    self.generate_in(&mut item)
                })
                .collect()
        };
        Generated {
            value: values,
            seed: run.seed(),
            diagnostics: run.into_diagnostics().into_vec(),
        }
    }

    /// `None` with the given probability, otherwise a value.
    ///
    /// Exactly one draw is consumed for the coin flip on every invocation;
    /// the wrapped generator is not run when the result is `None`.
    pub fn optional(&self, probability: f64) -> Schema<Option<T>, O> {
        let inner = self.clone();
        self.wrap(move |ctx, options| {
            if !(0.0..=1.0).contains(&probability) {
                ctx.report(
                    DiagnosticKind::InvalidParameter,
                    format!("optional probability {probability} is outside [0, 1]"),
                );
            }
            if ctx.next_bool(probability) {
                None
            } else {
                Some(inner.produce(ctx, options))
            }
        })
    }

    /// Reshape each generated value
    pub fn transform<U, F>(&self, f: F) -> Schema<U, O>
    where
        U: 'static,
        F: Fn(T, &mut Context<'_>) -> U + Send + Sync + 'static,
    {
        let inner = self.clone();
        self.wrap(move |ctx, options| {
            let value = inner.produce(ctx, options);
            f(value, ctx)
        })
    }

    /// Reshape with a fallible callback; an error yields `None` and a diagnostic
    pub fn try_transform<U, F>(&self, f: F) -> Schema<Option<U>, O>
    where
        U: 'static,
        F: Fn(T, &mut Context<'_>) -> CallbackResult<U> + Send + Sync + 'static,
    {
        let inner = self.clone();
        self.wrap(move |ctx, options| {
            let value = inner.produce(ctx, options);
            match f(value, ctx) {
                Ok(reshaped) => Some(reshaped),
                Err(err) => {
                    ctx.report(
                        DiagnosticKind::CallbackFailed,
                        format!("transform failed: {err}"),
                    );
                    None
                }
            }
        })
    }

    /// Keep only values satisfying `predicate`, with the configured default retries
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_retries(predicate, get_global_config().default_retries)
    }

    /// Keep only values satisfying `predicate`, regenerating up to `retries` times
    pub fn filter_retries<P>(&self, predicate: P, retries: usize) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let mut next = self.clone();
        next.constraints.push(Constraint {
            predicate: Arc::new(predicate),
            retries,
        });
        next
    }

    /// Choose how multiple constraints combine into one attempt budget
    pub fn retry_policy(&self, policy: RetryPolicy) -> Self {
        let mut next = self.clone();
        next.retry_policy = policy;
        next
    }

    /// Generate once, then thread the value through each step in order
    pub fn pipe<I>(&self, steps: I) -> Self
    where
        I: IntoIterator<Item = Step<T>>,
    {
        let inner = self.clone();
        let steps: Vec<Step<T>> = steps.into_iter().collect();
        self.wrap(move |ctx, options| {
            let mut value = inner.produce(ctx, options);
            for step in &steps {
                value = step(value, ctx);
            }
            value
        })
    }

    /// Hide the option record, e.g. to mix schemas of different kinds in a union
    pub fn erased(&self) -> Schema<T> {
        let inner = self.clone();
        Schema::new(move |ctx| inner.generate_in(ctx))
    }
}

impl<T, O> Schema<T, O>
where
    T: Serialize + DeserializeOwned + 'static,
    O: Clone + Send + Sync + 'static,
{
    /// Memoise the first value generated in a run under `key` in the shared
    /// cache; later invocations in the same run reuse it.
    pub fn cached(&self, key: impl Into<String>) -> Self {
        let key = key.into();
        let inner = self.clone();
        self.wrap(move |ctx, options| {
            if let Some(stored) = ctx.cache().get(&key).cloned() {
                match serde_json::from_value(stored) {
                    Ok(value) => return value,
                    Err(err) => ctx.report(
                        DiagnosticKind::SerializationFailed,
                        format!("cached entry '{key}' has the wrong shape: {err}"),
                    ),
                }
            }
            let value = inner.produce(ctx, options);
            match serde_json::to_value(&value) {
                Ok(stored) => {
                    ctx.cache_mut().insert(key.clone(), stored);
                }
                Err(err) => ctx.report(
                    DiagnosticKind::SerializationFailed,
                    format!("cannot cache '{key}': {err}"),
                ),
            }
            value
        })
    }
}
