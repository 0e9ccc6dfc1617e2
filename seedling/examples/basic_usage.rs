//! Basic usage examples demonstrating the core seedling API
//!
//! This example shows the fundamental concepts of schema-driven generation:
//! leaf schemas, composites, constraints, diagnostics and replay by seed.

use seedling::{
    Cache, DiagnosticKind, GenerateOptions, ParallelConfig, RetryPolicy, Schema, array,
    constant, generate_batches, object, one_of, weighted,
};
use serde_json::Value;

// Example 1: A leaf schema and replay by seed
fn example_1_leaf_schema() {
    println!("=== Example 1: Leaf Schema ===");

    let dice = Schema::new(|ctx| ctx.next_int(1, 6));
    let rolls = dice.generate_many(10, Some(42));
    println!("rolls with seed 42: {rolls:?}");

    let replay = dice.generate_many(10, Some(42));
    if rolls == replay {
        println!("✓ Same seed, same rolls");
    } else {
        println!("✗ Replay diverged");
    }
}

// Example 2: Objects whose fields read earlier siblings
fn example_2_object() {
    println!("\n=== Example 2: Objects ===");

    let roles = match one_of(vec!["admin", "editor", "viewer"]) {
        Ok(schema) => schema,
        Err(e) => {
            println!("✗ {e}");
            return;
        }
    };

    let user = object()
        .field("id", Schema::new(|ctx| ctx.next_int(1, 10_000)))
        .field("role", roles)
        .field(
            "handle",
            Schema::new(|ctx| {
                let role = ctx
                    .parent()
                    .and_then(|p| p.get("role"))
                    .and_then(Value::as_str)
                    .unwrap_or("guest")
                    .to_string();
                format!("{role}-{}", ctx.next_int(100, 999))
            }),
        )
        .field("tags", array(constant("beta")).length(2))
        .build();

    let value = user.generate(GenerateOptions::seeded(7));
    println!("{value}");
}

// Example 3: Constraints, retry policies and diagnostics
fn example_3_constraints() {
    println!("\n=== Example 3: Constraints ===");

    let even = Schema::new(|ctx| ctx.next_int(0, 100))
        .filter_retries(|n| n % 2 == 0, 20)
        .filter_retries(|n| *n > 10, 5)
        .retry_policy(RetryPolicy::Sum);
    let generated = even.run(GenerateOptions::seeded(3));
    println!(
        "value {} with {} diagnostics",
        generated.value,
        generated.diagnostics.len()
    );

    let impossible = Schema::new(|ctx| ctx.next_int(0, 9)).filter_retries(|n| *n > 100, 3);
    let generated = impossible.run(GenerateOptions::seeded(3));
    if generated.has(DiagnosticKind::ConstraintExhausted) {
        println!("✓ Exhaustion reported: {}", generated.diagnostics[0]);
    }
}

// Example 4: Weighted choices and a shared cache
fn example_4_weighted_and_cache() {
    println!("\n=== Example 4: Weighted Choices and Caching ===");

    let tier = match weighted(vec![("free", 8.0), ("pro", 1.5), ("enterprise", 0.5)]) {
        Ok(schema) => schema,
        Err(e) => {
            println!("✗ {e}");
            return;
        }
    };
    let tiers = tier.generate_many(20, Some(11));
    println!("tiers: {tiers:?}");

    let tenant = Schema::new(|ctx| ctx.next_int(1, 1_000_000)).cached("tenant");
    let mut cache = Cache::new();
    let first = tenant.generate(GenerateOptions::seeded(1).with_cache(&mut cache));
    let second = tenant.generate(GenerateOptions::seeded(2).with_cache(&mut cache));
    println!("tenant {first} then {second} (cache size {})", cache.len());
}

// Example 5: Parallel batches
fn example_5_parallel() {
    println!("\n=== Example 5: Parallel Batches ===");

    let schema = Schema::new(|ctx| ctx.next_float());
    let batches = generate_batches(&schema, 8, 1_000, 99, &ParallelConfig::default());
    let total: usize = batches.iter().map(Vec::len).sum();
    println!("✓ {} batches, {total} values", batches.len());
}

fn main() {
    example_1_leaf_schema();
    example_2_object();
    example_3_constraints();
    example_4_weighted_and_cache();
    example_5_parallel();
}
