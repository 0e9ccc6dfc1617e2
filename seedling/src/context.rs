//! Generation context threaded through one run.
//!
//! A [`Run`] owns the pseudorandom source, the diagnostics collector and
//! (unless one was supplied) the cache for a single root call. Every
//! [`Context`] in the generation tree borrows those from the run, so the
//! whole tree consumes one ordered sequence of draws.

use std::collections::HashMap;

use num_traits::{NumCast, PrimInt};
use serde_json::{Map, Value};

use crate::config::{EngineConfig, GenerateOptions, get_global_config};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::distribution::{Distribution, sample};
use crate::rng::{DefaultRngProvider, Pcg32, RngProvider};

/// String-keyed store shared by every node of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cache {
    entries: HashMap<String, Value>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Store a value, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Read-only view of the composite currently being built around a node
#[derive(Debug, Clone, Copy)]
pub enum Parent<'a> {
    /// Fields of an object generated so far, in declaration order
    Object(&'a Map<String, Value>),
    /// Elements of an array or tuple generated so far
    Array(&'a [Value]),
}

impl<'a> Parent<'a> {
    /// Look up an already generated sibling field
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        match self {
            Parent::Object(map) => map.get(key),
            Parent::Array(_) => None,
        }
    }

    /// Look up an already generated sibling element
    pub fn at(&self, index: usize) -> Option<&'a Value> {
        match self {
            Parent::Object(_) => None,
            Parent::Array(items) => items.get(index),
        }
    }

    /// Number of siblings generated so far
    pub fn len(&self) -> usize {
        match self {
            Parent::Object(map) => map.len(),
            Parent::Array(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One step down the generation tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'s> {
    /// Named field or record key, rendered as `.name`
    Field(&'s str),
    /// Positional element, rendered as `[i]`
    Index(usize),
}

enum CacheSlot<'c> {
    Owned(Cache),
    Shared(&'c mut Cache),
}

/// State owned by a single root `generate`/`generate_many` call
pub struct Run<'c> {
    rng: Pcg32,
    cache: CacheSlot<'c>,
    diagnostics: Diagnostics,
    config: EngineConfig,
    seed: u64,
    locale: String,
    path: String,
    key: Option<String>,
}

impl<'c> Run<'c> {
    /// Resolve overrides against the thread's engine configuration and
    /// allocate a fresh source (and cache, unless one was supplied).
    pub fn new(options: GenerateOptions<'c>) -> Self {
        Self::with_config(options, get_global_config())
    }

    /// Like [`Run::new`] with an explicit configuration
    pub fn with_config(options: GenerateOptions<'c>, config: EngineConfig) -> Self {
        let GenerateOptions {
            seed,
            locale,
            cache,
            path,
            key,
        } = options;

        let seed = seed
            .or(config.default_seed)
            .unwrap_or_else(crate::rng::fresh_seed);
        let locale = locale.unwrap_or_else(|| config.default_locale.clone());
        let path = path.or_else(|| key.clone()).unwrap_or_default();
        let cache = match cache {
            Some(shared) => CacheSlot::Shared(shared),
            None => CacheSlot::Owned(Cache::new()),
        };

        tracing::debug!(seed, %locale, %path, "starting generation run");

        Self {
            rng: DefaultRngProvider.create_rng(Some(seed)),
            cache,
            diagnostics: Diagnostics::new(),
            config,
            seed,
            locale,
            path,
            key,
        }
    }

    /// The seed this run was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Root context of the run
    pub fn context(&mut self) -> Context<'_> {
        let cache = match &mut self.cache {
            CacheSlot::Owned(cache) => cache,
            CacheSlot::Shared(cache) => &mut **cache,
        };
        Context {
            rng: &mut self.rng,
            cache,
            diagnostics: &mut self.diagnostics,
            config: &self.config,
            locale: &self.locale,
            seed: self.seed,
            parent: None,
            path: self.path.clone(),
            index: None,
            key: self.key.clone(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Finish the run, keeping only its diagnostics
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

/// Per-node view of a run, handed to every generator function
#[derive(Debug)]
pub struct Context<'a> {
    rng: &'a mut Pcg32,
    cache: &'a mut Cache,
    diagnostics: &'a mut Diagnostics,
    config: &'a EngineConfig,
    locale: &'a str,
    seed: u64,
    parent: Option<Parent<'a>>,
    path: String,
    index: Option<usize>,
    key: Option<String>,
}

impl<'a> Context<'a> {
    /// Derive a child context one step below this one.
    ///
    /// The child shares this run's source, cache, diagnostics, locale and
    /// seed; it gets its own path, key, index and parent view.
    pub fn derive<'b>(&'b mut self, segment: Segment<'_>, parent: Option<Parent<'b>>) -> Context<'b> {
        let (path, key, index) = match segment {
            Segment::Field(name) => {
                let path = if self.path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}.{}", self.path, name)
                };
                (path, Some(name.to_string()), None)
            }
            Segment::Index(i) => (format!("{}[{}]", self.path, i), None, Some(i)),
        };
        Context {
            rng: &mut *self.rng,
            cache: &mut *self.cache,
            diagnostics: &mut *self.diagnostics,
            config: self.config,
            locale: self.locale,
            seed: self.seed,
            parent,
            path,
            index,
            key,
        }
    }

    /// Child context for a named field of a partially built object
    pub fn field<'b>(&'b mut self, name: &str, siblings: &'b Map<String, Value>) -> Context<'b> {
        self.derive(Segment::Field(name), Some(Parent::Object(siblings)))
    }

    /// Child context for a positional element of a partially built array
    pub fn element<'b>(&'b mut self, index: usize, siblings: &'b [Value]) -> Context<'b> {
        self.derive(Segment::Index(index), Some(Parent::Array(siblings)))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn locale(&self) -> &str {
        self.locale
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Partially built enclosing composite; `None` at the root
    pub fn parent(&self) -> Option<Parent<'a>> {
        self.parent
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    pub fn cache(&self) -> &Cache {
        &*self.cache
    }

    pub fn cache_mut(&mut self) -> &mut Cache {
        &mut *self.cache
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &*self.diagnostics
    }

    /// Record a diagnostic against the current path
    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.report(kind, &self.path, message);
    }

    /// Direct access to the run's source
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut *self.rng
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// Uniform float in `[0, 1)`
    pub fn next_float(&mut self) -> f64 {
        self.rng.next_float()
    }

    /// Uniform integer in `[min, max]`; reversed bounds are swapped and reported
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if min > max {
            self.report(
                DiagnosticKind::SwappedBounds,
                format!("integer range min {min} > max {max}, swapping"),
            );
            return self.rng.next_int(max, min);
        }
        self.rng.next_int(min, max)
    }

    /// `true` with the given probability. Consumes exactly one draw.
    pub fn next_bool(&mut self, probability: f64) -> bool {
        self.rng.next_float() < probability
    }

    /// Uniform integer of any primitive type in `[min, max]`
    pub fn int_in<T>(&mut self, min: T, max: T) -> T
    where
        T: PrimInt + NumCast,
    {
        match (<i64 as NumCast>::from(min), <i64 as NumCast>::from(max)) {
            (Some(lo), Some(hi)) => {
                let drawn = self.next_int(lo, hi);
                <T as NumCast>::from(drawn).unwrap_or(min)
            }
            _ => {
                self.report(
                    DiagnosticKind::InvalidParameter,
                    "integer bounds do not fit in i64, returning the lower bound",
                );
                min
            }
        }
    }

    /// Uniformly choose one item; `None` for an empty slice (no draw)
    pub fn pick<'s, T>(&mut self, items: &'s [T]) -> Option<&'s T> {
        if items.is_empty() {
            return None;
        }
        let last = i64::try_from(items.len() - 1).unwrap_or(i64::MAX);
        let index = self.rng.next_int(0, last);
        usize::try_from(index).ok().and_then(|i| items.get(i))
    }

    /// Draw from a distribution restricted to `[min, max]`
    pub fn sample(&mut self, distribution: &Distribution, min: f64, max: f64) -> f64 {
        sample(
            &mut *self.rng,
            distribution,
            min,
            max,
            &mut *self.diagnostics,
            &self.path,
        )
    }
}
