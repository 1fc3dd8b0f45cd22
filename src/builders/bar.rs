//! Bar figure builder.

use serde_json::Value;
use tracing::debug;

use crate::aggregate::{aggregate_points, Aggregation};
use crate::figure::{merge_layout, ChartSpec, Figure, Marker, Trace};
use crate::series::split_series;
use crate::value::display_key;
use crate::EncodingMap;

use super::standard_layout;

/// Build a bar figure.
///
/// Requires both an x and a y field (through their aliases); aggregation
/// defaults to [`Aggregation::Sum`]. Returns `None` when a required
/// encoding is missing.
#[must_use]
pub fn build_bar_figure(
    rows: &[Value],
    encodings: &EncodingMap,
    spec: &ChartSpec,
) -> Option<Figure> {
    let x_field = encodings.x_field()?;
    let y_field = encodings.y_field()?;
    let aggregation = encodings.y_aggregation().unwrap_or(Aggregation::Sum);
    debug!(rows = rows.len(), x_field, y_field, "building bar figure");

    let series = split_series(rows, Some(x_field), Some(y_field), encodings.series_field());

    let data = series
        .into_entries()
        .into_iter()
        .map(|(key, points)| {
            let aggregated = aggregate_points(points, aggregation);
            let mut trace = Trace::bar(
                display_key(&key),
                aggregated.iter().map(|point| point.x.clone()).collect(),
                aggregated.iter().map(|point| point.y).collect(),
            );
            if let Some(palette) = &spec.palette {
                trace.marker = Some(Marker {
                    color: palette.clone(),
                });
            }
            trace
        })
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
