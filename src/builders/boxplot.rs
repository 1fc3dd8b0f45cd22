//! Box figure builder.

use serde_json::Value;
use tracing::debug;

use crate::figure::{merge_layout, ChartSpec, Figure, Trace};
use crate::series::DEFAULT_SERIES;
use crate::value::{coerce_number, display_key, resolve, resolve_or_null, values_equal};
use crate::EncodingMap;

use super::standard_layout;

/// Build a box figure.
///
/// Only the value field is required. Buckets split by the series field if
/// mapped, else by the category/x value (missing or null falls back to
/// the literal `"Series"`). Non-finite values are dropped per bucket, not
/// emitted as gaps.
#[must_use]
pub fn build_box_figure(
    rows: &[Value],
    encodings: &EncodingMap,
    spec: &ChartSpec,
) -> Option<Figure> {
    let value_field = encodings.value_field()?;
    let series_field = encodings.series_field();
    let category_field = encodings.category_field();
    debug!(rows = rows.len(), value_field, "building box figure");

    let mut buckets: Vec<(Value, Vec<f64>)> = Vec::new();
    for row in rows {
        let key = bucket_key(row, series_field, category_field);
        let index = match buckets
            .iter()
            .position(|(existing, _)| values_equal(existing, &key))
        {
            Some(index) => index,
            None => {
                buckets.push((key, Vec::new()));
                buckets.len() - 1
            }
        };
        if let Some(value) = resolve(row, value_field).and_then(coerce_number) {
            buckets[index].1.push(value);
        }
    }

    let boxpoints = spec
        .boxpoints
        .clone()
        .unwrap_or_else(|| "outliers".to_string());

    let data = buckets
        .into_iter()
        .map(|(key, values)| Trace::box_plot(display_key(&key), values, boxpoints.clone()))
        .collect();

    let layout = merge_layout(
        standard_layout(),
        spec.layout.as_ref().unwrap_or(&Value::Null),
    );

    Some(Figure {
        data,
        layout,
        config: spec.config_object(),
    })
}

fn bucket_key(row: &Value, series_field: Option<&str>, category_field: Option<&str>) -> Value {
    if let Some(field) = series_field {
        return resolve_or_null(row, field).clone();
    }
    let category = category_field
        .map(|field| resolve_or_null(row, field))
        .unwrap_or(&Value::Null);
    if category.is_null() {
        Value::String(DEFAULT_SERIES.to_string())
    } else {
        category.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encodings(doc: Value) -> EncodingMap {
        EncodingMap::from_value(&doc).unwrap()
    }

    #[test]
    fn test_missing_value_field_returns_none() {
        let enc = encodings(json!({"x": {"field": "dept"}}));
        let rows = vec![json!({"dept": "a"})];
        assert!(build_box_figure(&rows, &enc, &ChartSpec::default()).is_none());
    }

    #[test]
    fn test_value_only_single_bucket() {
        let enc = encodings(json!({"value": {"field": "score"}}));
        let rows = vec![json!({"score": 1}), json!({"score": 2})];
        let figure = build_box_figure(&rows, &enc, &ChartSpec::default()).unwrap();
        assert_eq!(figure.data.len(), 1);
        assert_eq!(figure.data[0].name, "Series");
        assert_eq!(figure.data[0].y, vec![Some(1.0), Some(2.0)]);
        assert_eq!(figure.data[0].boxpoints.as_deref(), Some("outliers"));
    }

    #[test]
    fn test_drops_non_finite_values() {
        let enc = encodings(json!({"value": {"field": "score"}}));
        let rows = vec![
            json!({"score": 1}),
            json!({"score": null}),
            json!({"score": "NaN"}),
            json!({"score": "Infinity"}),
            json!({"score": 5}),
        ];
        let figure = build_box_figure(&rows, &enc, &ChartSpec::default()).unwrap();
        assert_eq!(figure.data[0].y, vec![Some(1.0), Some(5.0)]);
    }

    #[test]
    fn test_buckets_by_category_then_series() {
        let rows = vec![
            json!({"dept": "a", "score": 1, "team": "x"}),
            json!({"dept": "b", "score": 2, "team": "y"}),
            json!({"dept": "a", "score": 3, "team": "y"}),
        ];
        let by_category = encodings(json!({
            "value": {"field": "score"},
            "category": {"field": "dept"}
        }));
        let figure = build_box_figure(&rows, &by_category, &ChartSpec::default()).unwrap();
        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0].name, "a");
        assert_eq!(figure.data[0].y, vec![Some(1.0), Some(3.0)]);

        let by_series = encodings(json!({
            "value": {"field": "score"},
            "category": {"field": "dept"},
            "series": {"field": "team"}
        }));
        let figure = build_box_figure(&rows, &by_series, &ChartSpec::default()).unwrap();
        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0].name, "x");
        assert_eq!(figure.data[1].y, vec![Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_y_alias_for_value() {
        let enc = encodings(json!({"y": {"field": "score"}}));
        let rows = vec![json!({"score": 4})];
        let figure = build_box_figure(&rows, &enc, &ChartSpec::default()).unwrap();
        assert_eq!(figure.data[0].y, vec![Some(4.0)]);
    }

    #[test]
    fn test_null_category_falls_back_to_series_bucket() {
        let enc = encodings(json!({
            "value": {"field": "score"},
            "category": {"field": "dept"}
        }));
        let rows = vec![json!({"score": 1}), json!({"dept": "a", "score": 2})];
        let figure = build_box_figure(&rows, &enc, &ChartSpec::default()).unwrap();
        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0].name, "Series");
        assert_eq!(figure.data[1].name, "a");
    }

    #[test]
    fn test_boxpoints_override() {
        let enc = encodings(json!({"value": {"field": "score"}}));
        let rows = vec![json!({"score": 1})];
        let spec = ChartSpec {
            boxpoints: Some("all".into()),
            ..ChartSpec::default()
        };
        let figure = build_box_figure(&rows, &enc, &spec).unwrap();
        assert_eq!(figure.data[0].boxpoints.as_deref(), Some("all"));
    }

    #[test]
    fn test_empty_bucket_still_emits_trace() {
        let enc = encodings(json!({
            "value": {"field": "score"},
            "category": {"field": "dept"}
        }));
        let rows = vec![json!({"dept": "a", "score": "junk"})];
        let figure = build_box_figure(&rows, &enc, &ChartSpec::default()).unwrap();
        assert_eq!(figure.data.len(), 1);
        assert!(figure.data[0].y.is_empty());
    }
}
