//! Parallel generation of independent batches.
//!
//! Each batch is a separate run with its own source and cache, seeded
//! from `base_seed` and the batch index, so the output depends only on the
//! seeds and never on how batches were spread across threads.

use std::panic;

use crate::config::{EngineConfig, GenerateOptions, get_global_config};
use crate::context::Run;
use crate::schema::{Generated, Schema};

/// Configuration for parallel execution
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads
    pub num_threads: usize,
    /// Whether to use worker threads at all
    pub enabled: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            enabled: true,
        }
    }
}

impl ParallelConfig {
    /// Sequential execution on the calling thread
    pub fn sequential() -> Self {
        Self {
            num_threads: 1,
            enabled: false,
        }
    }

    /// Parallel execution on a fixed number of threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads,
            enabled: true,
        }
    }
}

/// Seed used for batch `index`
pub fn batch_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add(index as u64)
}

/// Generate `batches` batches of `per_batch` values, reporting each run.
///
/// Results are ordered by batch index. Workers use the calling thread's
/// engine configuration.
pub fn run_batches<T, O>(
    schema: &Schema<T, O>,
    batches: usize,
    per_batch: usize,
    base_seed: u64,
    config: &ParallelConfig,
) -> Vec<Generated<Vec<T>>>
where
    T: Send + 'static,
    O: Clone + Send + Sync + 'static,
{
    let engine = get_global_config();
    let threads = config.num_threads.clamp(1, batches.max(1));

    if !config.enabled || threads == 1 || batches <= 1 {
        return (0..batches)
            .map(|index| run_one(schema, index, per_batch, base_seed, &engine))
            .collect();
    }

    tracing::debug!(batches, per_batch, threads, "generating batches in parallel");

    let outcome = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|thread_id| {
                let engine = &engine;
                s.spawn(move |_| {
                    (thread_id..batches)
                        .step_by(threads)
                        .map(|index| (index, run_one(schema, index, per_batch, base_seed, engine)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut results = Vec::with_capacity(batches);
        for handle in handles {
            match handle.join() {
                Ok(batch) => results.extend(batch),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        results
    });

    let mut results = match outcome {
        Ok(results) => results,
        Err(payload) => panic::resume_unwind(payload),
    };
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, generated)| generated).collect()
}

/// Generate `batches` batches of `per_batch` values
pub fn generate_batches<T, O>(
    schema: &Schema<T, O>,
    batches: usize,
    per_batch: usize,
    base_seed: u64,
    config: &ParallelConfig,
) -> Vec<Vec<T>>
where
    T: Send + 'static,
    O: Clone + Send + Sync + 'static,
{
    run_batches(schema, batches, per_batch, base_seed, config)
        .into_iter()
        .map(|generated| generated.value)
        .collect()
}

fn run_one<T, O>(
    schema: &Schema<T, O>,
    index: usize,
    per_batch: usize,
    base_seed: u64,
    engine: &EngineConfig,
) -> Generated<Vec<T>>
where
    T: 'static,
    O: Clone + Send + Sync + 'static,
{
    let options = GenerateOptions::seeded(batch_seed(base_seed, index));
    schema.run_batch(per_batch, Run::with_config(options, engine.clone()))
}
