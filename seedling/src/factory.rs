//! Value-level factories that need no option record.

use crate::error::SchemaError;
use crate::schema::Schema;

/// Always produce a clone of `value`; consumes no draws
pub fn constant<T>(value: T) -> Schema<T>
where
    T: Clone + Send + Sync + 'static,
{
    Schema::new(move |_| value.clone())
}

/// Uniformly pick one of `choices`
pub fn one_of<T>(choices: Vec<T>) -> Result<Schema<T>, SchemaError>
where
    T: Clone + Send + Sync + 'static,
{
    if choices.is_empty() {
        return Err(SchemaError::empty_choices("one_of"));
    }
    Ok(Schema::new(move |ctx| match ctx.pick(&choices) {
        Some(choice) => choice.clone(),
        None => choices[0].clone(),
    }))
}

/// Pick one of `choices` with probability proportional to its weight.
///
/// Weights must be finite and non-negative with a positive sum. One float
/// is drawn per invocation.
pub fn weighted<T>(choices: Vec<(T, f64)>) -> Result<Schema<T>, SchemaError>
where
    T: Clone + Send + Sync + 'static,
{
    if choices.is_empty() {
        return Err(SchemaError::empty_choices("weighted"));
    }
    if let Some((_, w)) = choices.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
        return Err(SchemaError::invalid_weights(
            "weighted",
            format!("weight {w} is negative or not finite"),
        ));
    }
    let total: f64 = choices.iter().map(|(_, w)| w).sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(SchemaError::invalid_weights(
            "weighted",
            "weights must sum to a positive finite value",
        ));
    }

    let mut cumulative = Vec::with_capacity(choices.len());
    let mut running = 0.0;
    for (value, weight) in choices {
        running += weight;
        cumulative.push((value, running));
    }

    Ok(Schema::new(move |ctx| {
        let target = ctx.next_float() * total;
        cumulative
            .iter()
            .find(|(_, bound)| target < *bound)
            .or_else(|| cumulative.last())
            .map(|(value, _)| value.clone())
            .unwrap_or_else(|| cumulative[0].0.clone())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerateOptions;

    #[test]
    fn test_constant_draws_nothing() {
        let schema = constant("fixed".to_string());
        let generated = schema.run(GenerateOptions::seeded(1));
        assert_eq!(generated.value, "fixed");
        assert!(generated.diagnostics.is_empty());
    }

    #[test]
    fn test_one_of_empty_is_an_error() {
        let err = one_of(Vec::<u8>::new()).unwrap_err();
        assert_eq!(err, SchemaError::empty_choices("one_of"));
    }

    #[test]
    fn test_one_of_covers_all_choices() {
        let schema = one_of(vec!['a', 'b', 'c']).unwrap();
        let values = schema.generate_many(300, Some(8));
        for c in ['a', 'b', 'c'] {
            assert!(values.contains(&c));
        }
    }

    #[test]
    fn test_weighted_validation() {
        assert!(matches!(
            weighted(Vec::<(u8, f64)>::new()),
            Err(SchemaError::EmptyChoices { .. })
        ));
        assert!(matches!(
            weighted(vec![(1, 0.0), (2, 0.0)]),
            Err(SchemaError::InvalidWeights { .. })
        ));
        assert!(matches!(
            weighted(vec![(1, -1.0), (2, 3.0)]),
            Err(SchemaError::InvalidWeights { .. })
        ));
        assert!(matches!(
            weighted(vec![(1, f64::NAN)]),
            Err(SchemaError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_weighted_respects_zero_weights() {
        let schema = weighted(vec![("never", 0.0), ("always", 1.0)]).unwrap();
        assert!(schema.generate_many(200, Some(3)).iter().all(|v| *v == "always"));
    }

    #[test]
    fn test_weighted_proportions() {
        let schema = weighted(vec![(0u8, 1.0), (1u8, 3.0)]).unwrap();
        let values = schema.generate_many(4000, Some(11));
        let ones = values.iter().filter(|v| **v == 1).count();
        assert!((2800..3200).contains(&ones), "got {ones} ones");
    }
}
