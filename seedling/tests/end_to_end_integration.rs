//! End-to-end integration tests for the seedling engine
//!
//! These tests drive realistic nested schemas through the public API and
//! check determinism, context propagation and the diagnostics channel.

use seedling::{
    Cache, DiagnosticKind, Distribution, GenerateOptions, ParallelConfig, RetryPolicy, Schema,
    array, constant, generate_batches, object, one_of, record, step, tuple2, union, weighted,
};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn order_schema() -> Schema<Value> {
    let sku = Schema::new(|ctx| format!("SKU-{:05}", ctx.next_int(0, 99_999)));
    let line = object()
        .field("sku", sku)
        .field("quantity", Schema::new(|ctx| ctx.next_int(1, 5)))
        .field(
            "unit_price",
            Schema::new(|ctx| {
                let cents = ctx.sample(&Distribution::normal(), 100.0, 10_000.0).round();
                cents / 100.0
            }),
        )
        .build();

    object()
        .field("id", Schema::new(|ctx| ctx.next_int(1, 1_000_000)))
        .field(
            "status",
            weighted(vec![("paid", 6.0), ("pending", 3.0), ("refunded", 1.0)]).unwrap(),
        )
        .field("lines", array(line).min_length(1).max_length(4))
        .field(
            "coupon",
            one_of(vec!["WELCOME", "SPRING"]).unwrap().optional(0.7),
        )
        .field_when("refund_reason", constant("damaged"), |fields| {
            Ok(fields.get("status") == Some(&Value::from("refunded")))
        })
        .build()
}

#[test]
fn test_complete_nested_schema_is_reproducible() {
    let schema = order_schema();
    for seed in [0, 1, 42, u64::MAX] {
        let first = schema.run(GenerateOptions::seeded(seed));
        let second = schema.run(GenerateOptions::seeded(seed));
        assert_eq!(first.value, second.value);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}

#[test]
fn test_unseeded_run_can_be_replayed() {
    let schema = order_schema();
    let original = schema.run(GenerateOptions::default());
    let replay = schema.generate(GenerateOptions::seeded(original.seed));
    assert_eq!(original.value, replay);
}

#[test]
fn test_nested_shape() {
    let schema = order_schema();
    for order in schema.generate_many(50, Some(8)) {
        let map = order.as_object().unwrap();
        let lines = map["lines"].as_array().unwrap();
        assert!((1..=4).contains(&lines.len()));
        for line in lines {
            let quantity = line["quantity"].as_i64().unwrap();
            assert!((1..=5).contains(&quantity));
            let price = line["unit_price"].as_f64().unwrap();
            assert!((1.0..=100.0).contains(&price));
            assert!(line["sku"].as_str().unwrap().starts_with("SKU-"));
        }
        let refunded = map["status"] == "refunded";
        assert_eq!(map.contains_key("refund_reason"), refunded);
    }
}

#[test]
fn test_field_order_matches_declaration() {
    let value = order_schema().generate(GenerateOptions::seeded(3));
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .filter(|k| *k != "refund_reason")
        .collect();
    assert_eq!(keys, ["id", "status", "lines", "coupon"]);
}

#[test]
fn test_later_fields_derive_from_earlier_ones() {
    let schema = object()
        .field("first", one_of(vec!["Ada", "Grace", "Alan"]).unwrap())
        .field("last", one_of(vec!["Lovelace", "Hopper", "Turing"]).unwrap())
        .field(
            "email",
            Schema::new(|ctx| {
                let parent = ctx.parent();
                let part = |key: &str| {
                    parent
                        .and_then(|p| p.get(key))
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_lowercase()
                };
                format!("{}.{}@example.com", part("first"), part("last"))
            }),
        )
        .build();

    for user in schema.generate_many(20, Some(1)) {
        let expected = format!(
            "{}.{}@example.com",
            user["first"].as_str().unwrap().to_lowercase(),
            user["last"].as_str().unwrap().to_lowercase()
        );
        assert_eq!(user["email"], expected);
    }
}

#[test]
fn test_conditional_field_failure_is_diagnosed() {
    let schema = object()
        .field("plan", constant("pro"))
        .field_when("seats", Schema::new(|ctx| ctx.next_int(1, 50)), |fields| {
            match fields.get("plan").and_then(Value::as_str) {
                Some("pro") => Err("seat lookup unavailable".into()),
                _ => Ok(true),
            }
        })
        .build();

    let generated = schema.run(GenerateOptions::seeded(2).with_path("account"));
    assert!(generated.value.get("seats").is_none());
    assert_eq!(generated.diagnostics.len(), 1);
    let diagnostic = &generated.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::CallbackFailed);
    assert_eq!(diagnostic.path, "account.seats");
    assert!(diagnostic.message.contains("seat lookup unavailable"));
}

#[test]
fn test_diagnostics_carry_nested_paths() {
    let schema = object()
        .field(
            "items",
            array(Schema::new(|ctx| ctx.next_int(10, 1))).length(2),
        )
        .build();
    let generated = schema.run(GenerateOptions::seeded(0));
    let paths: Vec<&str> = generated
        .diagnostics
        .iter()
        .map(|d| d.path.as_str())
        .collect();
    assert_eq!(paths, ["items[0]", "items[1]"]);
    assert!(generated.has(DiagnosticKind::SwappedBounds));
}

#[test]
fn test_constraint_retries_whole_subtree() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let pair = tuple2(
        Schema::new(move |ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            ctx.next_int(0, 9)
        }),
        Schema::new(|ctx| ctx.next_int(0, 9)),
    )
    .filter_retries(|(a, b)| a < b, 100);

    let generated = pair.run(GenerateOptions::seeded(4));
    let (a, b) = generated.value;
    assert!(a < b);
    assert!(generated.diagnostics.is_empty());
    assert!(calls.load(Ordering::SeqCst) >= 1);
}

#[test]
fn test_rejected_tuple_regenerates_every_child() {
    let left_calls = Arc::new(AtomicUsize::new(0));
    let right_calls = Arc::new(AtomicUsize::new(0));
    let left = Arc::clone(&left_calls);
    let right = Arc::clone(&right_calls);
    let pair = tuple2(
        Schema::new(move |ctx| {
            left.fetch_add(1, Ordering::SeqCst);
            ctx.next_int(0, 9)
        }),
        Schema::new(move |ctx| {
            right.fetch_add(1, Ordering::SeqCst);
            ctx.next_int(0, 9)
        }),
    )
    .filter_retries(|_| false, 3);

    let generated = pair.run(GenerateOptions::seeded(4));
    assert_eq!(left_calls.load(Ordering::SeqCst), 4);
    assert_eq!(right_calls.load(Ordering::SeqCst), 4);
    assert!(generated.has(DiagnosticKind::ConstraintExhausted));
}

#[test]
fn test_constraint_exhaustion_returns_last_value() {
    let schema = Schema::new(|ctx| ctx.next_int(0, 9))
        .filter_retries(|v| *v > 100, 2)
        .filter_retries(|_| true, 7)
        .retry_policy(RetryPolicy::First);
    let generated = schema.run(GenerateOptions::seeded(5));
    assert!((0..=9).contains(&generated.value));
    assert_eq!(generated.diagnostics.len(), 1);
    assert_eq!(generated.diagnostics[0].kind, DiagnosticKind::ConstraintExhausted);
}

#[test]
fn test_shared_cache_spans_runs() {
    let tenant = Schema::new(|ctx| ctx.next_int(1, i64::MAX)).cached("tenant");
    let user = object()
        .field("tenant", tenant)
        .field("name", constant("x"))
        .build();

    let mut cache = Cache::new();
    let first = user.generate(GenerateOptions::seeded(1).with_cache(&mut cache));
    let second = user.generate(GenerateOptions::seeded(2).with_cache(&mut cache));
    assert_eq!(first["tenant"], second["tenant"]);
    assert!(cache.contains_key("tenant"));

    let fresh = user.generate(GenerateOptions::seeded(2));
    let independent = user.generate(GenerateOptions::seeded(1));
    assert_eq!(independent["tenant"], first["tenant"]);
    assert_ne!(fresh["tenant"], first["tenant"]);
}

#[test]
fn test_locale_reaches_every_node() {
    let locale = Schema::new(|ctx| ctx.locale().to_string());
    let schema = object()
        .field("top", locale.clone())
        .field("nested", array(locale).length(2))
        .build();
    let value = schema.generate(GenerateOptions::seeded(1).with_locale("de"));
    assert_eq!(value["top"], "de");
    assert_eq!(value["nested"], serde_json::json!(["de", "de"]));
}

#[test]
fn test_pipe_and_transform_chain() {
    let slug = Schema::new(|ctx| ctx.next_int(1000, 9999))
        .transform(|n, _| format!("Item {n}"))
        .pipe([
            step(|s: String, _| s.to_lowercase()),
            step(|s: String, _| s.replace(' ', "-")),
        ]);
    let value = slug.generate(GenerateOptions::seeded(12));
    assert!(value.starts_with("item-"));
    assert_eq!(value.len(), "item-0000".len());
}

#[test]
fn test_record_and_union_together() {
    let key = one_of(vec!["alpha", "beta", "gamma", "delta"])
        .unwrap()
        .transform(|k, _| k.to_string());
    let value = union(vec![
        Schema::new(|ctx| Value::from(ctx.next_int(0, 9))),
        Schema::new(|_| Value::Null),
    ])
    .unwrap();
    let schema = record(key, value).min_entries(2).max_entries(3);
    let generated = schema.run(GenerateOptions::seeded(77));
    let map = generated.value.as_object().unwrap();
    assert!((2..=3).contains(&map.len()));
    assert!(generated.diagnostics.is_empty());
}

#[test]
fn test_parallel_batches_independent_of_thread_count() {
    let schema = order_schema();
    let baseline = generate_batches(&schema, 6, 10, 500, &ParallelConfig::sequential());
    let parallel = generate_batches(&schema, 6, 10, 500, &ParallelConfig::with_threads(4));
    assert_eq!(baseline, parallel);
    assert_eq!(baseline[2], schema.generate_many(10, Some(502)));
}
