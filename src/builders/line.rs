//! Line and scatter figure builders.
//!
//! The two share one pipeline; scatter forces marker mode and runs the
//! reference-line calculator over the finished traces.

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::aggregate::{aggregate_points, Aggregation};
use crate::figure::{merge_layout, ChartSpec, Figure, Trace, TraceMode};
use crate::refline::{self, parse_reference_lines};
use crate::series::split_series;
use crate::value::display_key;
use crate::EncodingMap;

use super::standard_layout;

/// Build a line figure (`lines+markers` unless the spec overrides).
#[must_use]
pub fn build_line_figure(
    rows: &[Value],
    encodings: &EncodingMap,
    spec: &ChartSpec,
) -> Option<Figure> {
    build(rows, encodings, spec, false)
}

/// Build a scatter figure: marker mode plus reference-line overlays.
#[must_use]
pub fn build_scatter_figure(
    rows: &[Value],
    encodings: &EncodingMap,
    spec: &ChartSpec,
) -> Option<Figure> {
    build(rows, encodings, spec, true)
}

fn build(rows: &[Value], encodings: &EncodingMap, spec: &ChartSpec, scatter: bool) -> Option<Figure> {
    let (Some(x_field), Some(y_field)) = (encodings.x_field(), encodings.y_field()) else {
        warn!(scatter, "line figure skipped: missing x or y encoding");
        return None;
    };
    debug!(rows = rows.len(), x_field, y_field, scatter, "building line figure");

    let aggregation = encodings.y_aggregation().unwrap_or(Aggregation::Identity);
    let series = split_series(rows, Some(x_field), Some(y_field), encodings.series_field());
    debug!(series = series.len(), "series split");

    let mode = if scatter {
        TraceMode::Markers
    } else {
        spec.mode.unwrap_or(TraceMode::LinesMarkers)
    };

    let mut traces: Vec<Trace> = series
        .into_entries()
        .into_iter()
        .map(|(key, points)| {
            let aggregated = aggregate_points(points, aggregation);
            Trace::scatter(
                display_key(&key),
                aggregated.iter().map(|point| point.x.clone()).collect(),
                aggregated.iter().map(|point| point.y).collect(),
                mode,
            )
        })
        .collect();

    if scatter {
        let lines = parse_reference_lines(spec.reference_lines.as_ref());
        refline::apply(&mut traces, &lines);
    }

    let mut layout = standard_layout();
    layout["yaxis"]["griddash"] = json!("dot");
    let layout = merge_layout(layout, spec.layout.as_ref().unwrap_or(&Value::Null));

    Some(Figure {
        data: traces,
        layout,
        config: spec.config_object(),
    })
}
