//! Composite schemas that build objects, arrays, tuples, records and unions
//! out of child schemas.
//!
//! Children run in derived contexts: they share the run's source, cache,
//! diagnostics, locale and seed, get a path one step below their parent and
//! can read the siblings generated before them through [`Context::parent`].
//! To make that possible every child value is rendered to a
//! [`serde_json::Value`] as soon as it is produced.
//!
//! ```rust
//! use seedling::composite::object;
//! use seedling::factory::constant;
//! use seedling::{GenerateOptions, Schema};
//!
//! let user = object()
//!     .field("id", Schema::new(|ctx| ctx.next_int(1, 1000)))
//!     .field("role", constant("admin"))
//!     .field(
//!         "label",
//!         Schema::new(|ctx| {
//!             let role = ctx
//!                 .parent()
//!                 .and_then(|p| p.get("role"))
//!                 .and_then(|v| v.as_str())
//!                 .unwrap_or("guest")
//!                 .to_string();
//!             format!("{role}@{}", ctx.path())
//!         }),
//!     )
//!     .build();
//!
//! let value = user.generate(GenerateOptions::seeded(7));
//! assert_eq!(value["label"], "admin@label");
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::{Context, Parent, Segment};
use crate::diagnostics::DiagnosticKind;
use crate::error::{CallbackResult, SchemaError};
use crate::schema::Schema;

type RenderFn = dyn Fn(&mut Context<'_>) -> Value + Send + Sync;
type ConditionFn = dyn Fn(&Map<String, Value>) -> CallbackResult<bool> + Send + Sync;

/// Serialize a child value, degrading to `null` on failure
fn render<T: Serialize>(ctx: &mut Context<'_>, value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        ctx.report(
            DiagnosticKind::SerializationFailed,
            format!("value cannot be represented as JSON: {err}"),
        );
        Value::Null
    })
}

fn renderer<T, O>(schema: Schema<T, O>) -> Arc<RenderFn>
where
    T: Serialize + 'static,
    O: Clone + Send + Sync + 'static,
{
    Arc::new(move |ctx: &mut Context<'_>| {
        let value = schema.generate_in(ctx);
        render(ctx, &value)
    })
}

struct ObjectField {
    name: String,
    render: Arc<RenderFn>,
    condition: Option<Arc<ConditionFn>>,
}

/// Builder for object-shaped schemas; see [`object`]
#[derive(Default)]
pub struct ObjectSchema {
    fields: Vec<ObjectField>,
}

impl fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|field| &field.name))
            .finish()
    }
}

/// Start building an object schema
pub fn object() -> ObjectSchema {
    ObjectSchema::default()
}

impl ObjectSchema {
    /// Append a field. Fields are generated in the order they are added.
    pub fn field<T, O>(mut self, name: impl Into<String>, schema: Schema<T, O>) -> Self
    where
        T: Serialize + 'static,
        O: Clone + Send + Sync + 'static,
    {
        self.fields.push(ObjectField {
            name: name.into(),
            render: renderer(schema),
            condition: None,
        });
        self
    }

    /// Append a field that is only generated when `condition` holds for the
    /// fields generated so far.
    ///
    /// A failing condition leaves the field out and records a diagnostic.
    pub fn field_when<T, O, C>(
        mut self,
        name: impl Into<String>,
        schema: Schema<T, O>,
        condition: C,
    ) -> Self
    where
        T: Serialize + 'static,
        O: Clone + Send + Sync + 'static,
        C: Fn(&Map<String, Value>) -> CallbackResult<bool> + Send + Sync + 'static,
    {
        self.fields.push(ObjectField {
            name: name.into(),
            render: renderer(schema),
            condition: Some(Arc::new(condition)),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finish the builder
    pub fn build(self) -> Schema<Value> {
        let fields = self.fields;
        Schema::new(move |ctx| {
            let mut partial = Map::new();
            for field in &fields {
                if let Some(condition) = &field.condition {
                    match condition(&partial) {
                        Ok(true) => {}
                        Ok(false) => continue,
                        Err(err) => {
                            ctx.derive(Segment::Field(&field.name), None).report(
                                DiagnosticKind::CallbackFailed,
                                format!("field condition failed, leaving the field out: {err}"),
                            );
                            continue;
                        }
                    }
                }
                let value = {
                    let mut child = ctx.field(&field.name, &partial);
                    (field.render)(&mut child)
                };
                partial.insert(field.name.clone(), value);
            }
            Value::Object(partial)
        })
    }
}

/// Length and uniqueness settings for [`array`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayOptions {
    pub min_len: usize,
    pub max_len: usize,
    /// Reject elements whose JSON rendering was already produced
    pub unique: bool,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        Self {
            min_len: 0,
            max_len: 10,
            unique: false,
        }
    }
}

/// Array of values produced by `item`
pub fn array<T, O>(item: Schema<T, O>) -> Schema<Vec<T>, ArrayOptions>
where
    T: Serialize + 'static,
    O: Clone + Send + Sync + 'static,
{
    Schema::with_options(ArrayOptions::default(), move |ctx, options: &ArrayOptions| {
        let len: usize = ctx.int_in(options.min_len, options.max_len);
        let mut values = Vec::with_capacity(len);
        let mut rendered: Vec<Value> = Vec::with_capacity(len);

        if !options.unique {
            for i in 0..len {
                let (value, json) = {
                    let mut child = ctx.element(i, &rendered);
                    let value = item.generate_in(&mut child);
                    let json = render(&mut child, &value);
                    (value, json)
                };
                values.push(value);
                rendered.push(json);
            }
            return values;
        }

        let max_attempts = len.saturating_mul(ctx.config().unique_attempt_factor);
        let mut attempts = 0;
        while values.len() < len && attempts < max_attempts {
            attempts += 1;
            let i = values.len();
            let (value, json) = {
                let mut child = ctx.element(i, &rendered);
                let value = item.generate_in(&mut child);
                let json = render(&mut child, &value);
                (value, json)
            };
            if rendered.contains(&json) {
                continue;
            }
            values.push(value);
            rendered.push(json);
        }
        if values.len() < len {
            ctx.report(
                DiagnosticKind::UniquenessExhausted,
                format!(
                    "only {} of {len} distinct elements after {attempts} attempts",
                    values.len()
                ),
            );
        }
        values
    })
}

impl<T: 'static> Schema<Vec<T>, ArrayOptions> {
    /// Exact number of elements
    pub fn length(&self, len: usize) -> Self {
        self.map_options(|o| {
            o.min_len = len;
            o.max_len = len;
        })
    }

    pub fn min_length(&self, len: usize) -> Self {
        self.map_options(|o| o.min_len = len)
    }

    pub fn max_length(&self, len: usize) -> Self {
        self.map_options(|o| o.max_len = len)
    }

    pub fn unique(&self, unique: bool) -> Self {
        self.map_options(|o| o.unique = unique)
    }
}

/// Pair generated left to right; the second element sees the first
pub fn tuple2<A, OA, B, OB>(first: Schema<A, OA>, second: Schema<B, OB>) -> Schema<(A, B)>
where
    A: Serialize + 'static,
    OA: Clone + Send + Sync + 'static,
    B: Serialize + 'static,
    OB: Clone + Send + Sync + 'static,
{
    Schema::new(move |ctx| {
        let mut rendered: Vec<Value> = Vec::with_capacity(2);
        let a = {
            let mut child = ctx.element(0, &rendered);
            let a = first.generate_in(&mut child);
            let json = render(&mut child, &a);
            (a, json)
        };
        rendered.push(a.1);
        let b = {
            let mut child = ctx.element(1, &rendered);
            second.generate_in(&mut child)
        };
        (a.0, b)
    })
}

/// Triple generated left to right
pub fn tuple3<A, OA, B, OB, C, OC>(
    first: Schema<A, OA>,
    second: Schema<B, OB>,
    third: Schema<C, OC>,
) -> Schema<(A, B, C)>
where
    A: Serialize + 'static,
    OA: Clone + Send + Sync + 'static,
    B: Serialize + 'static,
    OB: Clone + Send + Sync + 'static,
    C: Serialize + 'static,
    OC: Clone + Send + Sync + 'static,
{
    Schema::new(move |ctx| {
        let mut rendered: Vec<Value> = Vec::with_capacity(3);
        let a = {
            let mut child = ctx.element(0, &rendered);
            let a = first.generate_in(&mut child);
            let json = render(&mut child, &a);
            (a, json)
        };
        rendered.push(a.1);
        let b = {
            let mut child = ctx.element(1, &rendered);
            let b = second.generate_in(&mut child);
            let json = render(&mut child, &b);
            (b, json)
        };
        rendered.push(b.1);
        let c = {
            let mut child = ctx.element(2, &rendered);
            third.generate_in(&mut child)
        };
        (a.0, b.0, c)
    })
}

/// Entry count settings for [`record`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOptions {
    pub min_entries: usize,
    pub max_entries: usize,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            min_entries: 1,
            max_entries: 5,
        }
    }
}

/// Map with generated keys and values.
///
/// Keys are drawn until they are distinct, up to
/// `entries * unique_attempt_factor` draws. Each value is generated at
/// `path.key` and sees the entries generated before it.
pub fn record<KO, V, VO>(keys: Schema<String, KO>, values: Schema<V, VO>) -> Schema<Value, RecordOptions>
where
    KO: Clone + Send + Sync + 'static,
    V: Serialize + 'static,
    VO: Clone + Send + Sync + 'static,
{
    Schema::with_options(RecordOptions::default(), move |ctx, options: &RecordOptions| {
        let entries: usize = ctx.int_in(options.min_entries, options.max_entries);
        let max_attempts = entries.saturating_mul(ctx.config().unique_attempt_factor);
        let mut map = Map::new();
        let mut attempts = 0;

        while map.len() < entries && attempts < max_attempts {
            attempts += 1;
            let key = {
                let mut child = ctx.derive(Segment::Index(map.len()), Some(Parent::Object(&map)));
                keys.generate_in(&mut child)
            };
            if map.contains_key(&key) {
                continue;
            }
            let value = {
                let mut child = ctx.field(&key, &map);
                let value = values.generate_in(&mut child);
                render(&mut child, &value)
            };
            map.insert(key, value);
        }
        if map.len() < entries {
            ctx.report(
                DiagnosticKind::UniquenessExhausted,
                format!("only {} of {entries} distinct keys after {attempts} attempts", map.len()),
            );
        }
        Value::Object(map)
    })
}

impl Schema<Value, RecordOptions> {
    /// Exact number of entries
    pub fn entries(&self, count: usize) -> Self {
        self.map_options(|o| {
            o.min_entries = count;
            o.max_entries = count;
        })
    }

    pub fn min_entries(&self, count: usize) -> Self {
        self.map_options(|o| o.min_entries = count)
    }

    pub fn max_entries(&self, count: usize) -> Self {
        self.map_options(|o| o.max_entries = count)
    }
}

/// Pick one variant per invocation and generate it in the same context
pub fn union<T, O>(variants: Vec<Schema<T, O>>) -> Result<Schema<T>, SchemaError>
where
    T: 'static,
    O: Clone + Send + Sync + 'static,
{
    if variants.is_empty() {
        return Err(SchemaError::empty_choices("union"));
    }
    Ok(Schema::new(move |ctx| {
        let index = ctx.next_int(0, variants.len() as i64 - 1);
        let variant = usize::try_from(index)
            .ok()
            .and_then(|i| variants.get(i))
            .unwrap_or(&variants[0]);
        variant.generate_in(ctx)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerateOptions;
    use crate::factory::{constant, one_of};

    fn digit() -> Schema<i64> {
        Schema::new(|ctx| ctx.next_int(0, 9))
    }

    #[test]
    fn test_object_preserves_declaration_order() {
        let schema = object()
            .field("zeta", constant(1))
            .field("alpha", constant(2))
            .field("mid", constant(3))
            .build();
        let value = schema.generate(GenerateOptions::seeded(0));
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_object_siblings_visible_only_after_generation() {
        let probe = |name: &'static str| {
            Schema::new(move |ctx| {
                ctx.parent()
                    .and_then(|p| p.get(name))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
        };
        let schema = object()
            .field("sees_later", probe("base"))
            .field("base", constant(5))
            .field("sees_earlier", probe("base"))
            .build();
        let value = schema.generate(GenerateOptions::seeded(0));
        assert_eq!(value["sees_later"], Value::Null);
        assert_eq!(value["sees_earlier"], Value::from(5));
    }

    #[test]
    fn test_object_child_paths() {
        let path = Schema::new(|ctx| ctx.path().to_string());
        let schema = object()
            .field("a", object().field("b", path.clone()).build())
            .field("list", array(path).length(2))
            .build();
        let value = schema.generate(GenerateOptions::seeded(0).with_key("root"));
        assert_eq!(value["a"]["b"], "root.a.b");
        assert_eq!(value["list"][1], "root.list[1]");
    }

    #[test]
    fn test_field_when() {
        let schema = object()
            .field("kind", constant("business"))
            .field_when("vat", constant("DE123"), |fields| {
                Ok(fields.get("kind") == Some(&Value::from("business")))
            })
            .field_when("spouse", constant("x"), |_| Ok(false))
            .build();
        let value = schema.generate(GenerateOptions::seeded(0));
        assert_eq!(value["vat"], "DE123");
        assert!(value.get("spouse").is_none());
    }

    #[test]
    fn test_failing_field_condition_leaves_field_out() {
        let schema = object()
            .field("a", constant(1))
            .field_when("b", constant(2), |_| Err("lookup failed".into()))
            .field("c", constant(3))
            .build();
        let generated = schema.run(GenerateOptions::seeded(0));
        let map = generated.value.as_object().unwrap();
        assert!(map.get("b").is_none());
        assert_eq!(map.len(), 2);
        assert_eq!(generated.diagnostics.len(), 1);
        assert_eq!(generated.diagnostics[0].kind, DiagnosticKind::CallbackFailed);
        assert_eq!(generated.diagnostics[0].path, "b");
    }

    #[test]
    fn test_array_length_bounds() {
        let schema = array(digit()).min_length(2).max_length(4);
        for seed in 0..30 {
            let len = schema.generate(GenerateOptions::seeded(seed)).len();
            assert!((2..=4).contains(&len));
        }
        assert_eq!(array(digit()).length(7).generate(GenerateOptions::seeded(1)).len(), 7);
    }

    #[test]
    fn test_array_elements_see_previous_elements() {
        let running = Schema::new(|ctx| {
            let parent = ctx.parent();
            let previous = match (parent, ctx.index()) {
                (Some(p), Some(i)) if i > 0 => p.at(i - 1).and_then(Value::as_i64).unwrap_or(0),
                _ => 0,
            };
            previous + 1
        });
        let values = array(running).length(4).generate(GenerateOptions::seeded(0));
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unique_array() {
        let schema = array(digit()).length(10).unique(true);
        let mut values = schema.generate(GenerateOptions::seeded(12));
        let generated_len = values.len();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), generated_len);
    }

    #[test]
    fn test_unique_array_exhaustion_returns_shorter_array() {
        let schema = array(constant(1)).length(3).unique(true);
        let generated = schema.run(GenerateOptions::seeded(0));
        assert_eq!(generated.value, vec![1]);
        assert!(generated.has(DiagnosticKind::UniquenessExhausted));
    }

    #[test]
    fn test_array_swapped_lengths_are_reported() {
        let generated = array(digit())
            .min_length(5)
            .max_length(2)
            .run(GenerateOptions::seeded(0));
        assert!((2..=5).contains(&generated.value.len()));
        assert!(generated.has(DiagnosticKind::SwappedBounds));
    }

    #[test]
    fn test_tuples() {
        let echo = Schema::new(|ctx| {
            ctx.parent()
                .and_then(|p| p.at(0))
                .and_then(Value::as_i64)
                .unwrap_or(-1)
        });
        let (a, b) = tuple2(digit(), echo.clone()).generate(GenerateOptions::seeded(3));
        assert_eq!(a, b);

        let (x, y, z) = tuple3(constant("x"), digit(), echo).generate(GenerateOptions::seeded(3));
        assert_eq!(x, "x");
        assert!((0..=9).contains(&y));
        assert_eq!(z, -1);
    }

    #[test]
    fn test_record_distinct_keys() {
        let keys = one_of(vec!["a", "b", "c", "d"])
            .unwrap()
            .transform(|k, _| k.to_string());
        let schema = record(keys, digit()).entries(3);
        let generated = schema.run(GenerateOptions::seeded(5));
        assert_eq!(generated.value.as_object().unwrap().len(), 3);
        assert!(generated.diagnostics.is_empty());

        let exhausted = record(constant("same".to_string()), digit())
            .entries(2)
            .run(GenerateOptions::seeded(5));
        assert_eq!(exhausted.value.as_object().unwrap().len(), 1);
        assert!(exhausted.has(DiagnosticKind::UniquenessExhausted));
    }

    #[test]
    fn test_record_value_paths() {
        let schema = record(
            constant("host".to_string()),
            Schema::new(|ctx| ctx.path().to_string()),
        )
        .entries(1);
        let value = schema.generate(GenerateOptions::seeded(0).with_path("env"));
        assert_eq!(value["host"], "env.host");
    }

    #[test]
    fn test_union() {
        assert!(matches!(
            union(Vec::<Schema<i64>>::new()),
            Err(SchemaError::EmptyChoices { .. })
        ));
        let schema = union(vec![constant(1), constant(2)]).unwrap();
        let values = schema.generate_many(100, Some(1));
        assert!(values.contains(&1) && values.contains(&2));
    }

    #[test]
    fn test_union_mixes_option_kinds_via_erased() {
        let short = array(digit()).length(1).erased();
        let long = array(digit()).length(3).erased();
        let schema = union(vec![short, long]).unwrap();
        for len in schema.generate_many(20, Some(2)).iter().map(Vec::len) {
            assert!(len == 1 || len == 3);
        }
    }

    #[test]
    fn test_composites_are_deterministic() {
        let schema = object()
            .field("tags", array(digit()).max_length(5))
            .field("pair", tuple2(digit(), digit()))
            .field("maybe", digit().optional(0.5))
            .build();
        assert_eq!(
            schema.generate(GenerateOptions::seeded(99)),
            schema.generate(GenerateOptions::seeded(99))
        );
    }
}
