//! Point aggregation: collapse points sharing an x key.

use serde_json::Value;

use crate::series::Point;
use crate::value::values_equal;

/// Reduction applied to y values grouped by x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// No grouping; points pass through untouched.
    Identity,
    /// Sum of y values.
    Sum,
    /// Arithmetic mean.
    Mean,
    /// Maximum.
    Max,
    /// Minimum.
    Min,
    /// Number of non-null y values (not total rows).
    Count,
    /// Midpoint of the sorted values; even counts average the middle two.
    Median,
    /// Last value in arrival order. Also the fallback for any
    /// unrecognized aggregation name.
    Last,
}

impl Aggregation {
    /// Parse an aggregation name, case-insensitively.
    ///
    /// Blank, `identity`, and `none` are [`Aggregation::Identity`];
    /// anything unrecognized falls back to [`Aggregation::Last`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "" | "identity" | "none" => Aggregation::Identity,
            "sum" => Aggregation::Sum,
            "avg" | "average" | "mean" => Aggregation::Mean,
            "max" => Aggregation::Max,
            "min" => Aggregation::Min,
            "count" => Aggregation::Count,
            "median" => Aggregation::Median,
            _ => Aggregation::Last,
        }
    }

    fn reduce(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let reduced = match self {
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Count => values.len() as f64,
            Aggregation::Median => median(values),
            Aggregation::Identity | Aggregation::Last => values[values.len() - 1],
        };
        Some(reduced)
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Group points by x and reduce each group's y values.
///
/// Group order is first-seen x order. Null y values are dropped from the
/// group before reducing (never zero-filled); a group left with no values
/// keeps its x key and reduces to `y = None`.
#[must_use]
pub fn aggregate_points(points: Vec<Point>, agg: Aggregation) -> Vec<Point> {
    if agg == Aggregation::Identity {
        return points;
    }

    let mut groups: Vec<(Value, Vec<f64>)> = Vec::new();
    for point in points {
        let position = groups
            .iter()
            .position(|(key, _)| values_equal(key, &point.x));
        let index = match position {
            Some(index) => index,
            None => {
                groups.push((point.x, Vec::new()));
                groups.len() - 1
            }
        };
        if let Some(y) = point.y {
            groups[index].1.push(y);
        }
    }

    groups
        .into_iter()
        .map(|(x, values)| Point {
            x,
            y: agg.reduce(&values),
        })
        .collect()
}
