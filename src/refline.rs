//! Statistical reference lines for scatter figures.
//!
//! Overlays are computed from the already-built traces, appended one at a
//! time (a later line sees earlier overlays' values in its pools). Every
//! uncomputable line is skipped on its own; it never disturbs the base
//! traces or the other lines.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::figure::{LineStyle, Trace, TraceKind, TraceMode};
use crate::value::{coerce_number, values_equal};

/// Denominator magnitude below which a regression is considered degenerate.
const REGRESSION_TOLERANCE: f64 = 1e-10;

/// Kind of reference line to overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceLineKind {
    /// Horizontal line at the pooled mean of all y values.
    #[serde(alias = "average")]
    Mean,
    /// Horizontal line at a fixed caller-supplied value.
    Horizontal,
    /// Ordinary least-squares regression line.
    #[serde(alias = "linear")]
    Regression,
}

/// One requested reference line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceLine {
    /// Line kind. Unknown kinds fail entry parsing and are skipped.
    #[serde(rename = "type")]
    pub kind: ReferenceLineKind,
    /// Legend name override.
    #[serde(default)]
    pub name: Option<String>,
    /// Line color override.
    #[serde(default)]
    pub color: Option<String>,
    /// Line width override.
    #[serde(default)]
    pub width: Option<f64>,
    /// Dash pattern override.
    #[serde(default)]
    pub dash: Option<String>,
    /// Fixed y value; required (as a plain number) for horizontal lines.
    #[serde(default)]
    pub value: Option<Value>,
}

impl ReferenceLine {
    /// The regression line synthesized when a scatter spec requests
    /// nothing ("회귀선" = regression line).
    #[must_use]
    pub fn default_regression() -> Self {
        Self {
            kind: ReferenceLineKind::Regression,
            name: Some("회귀선".to_string()),
            color: Some("blue".to_string()),
            width: Some(2.0),
            dash: Some("solid".to_string()),
            value: None,
        }
    }
}

/// Interpret the `reference_lines` value of a chart spec.
///
/// Absent, null, blank-string, and empty-array inputs all synthesize the
/// default regression line. A non-empty array is parsed per entry,
/// skipping entries that do not describe a known line. Any other shape
/// falls back to the default.
#[must_use]
pub fn parse_reference_lines(raw: Option<&Value>) -> Vec<ReferenceLine> {
    match raw {
        None | Some(Value::Null) => vec![ReferenceLine::default_regression()],
        Some(Value::String(s)) if s.trim().is_empty() => {
            vec![ReferenceLine::default_regression()]
        }
        Some(Value::Array(entries)) if entries.is_empty() => {
            vec![ReferenceLine::default_regression()]
        }
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                Ok(line) => Some(line),
                Err(err) => {
                    warn!(%err, "skipping malformed reference line");
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!(?other, "unexpected reference_lines shape, using default");
            vec![ReferenceLine::default_regression()]
        }
    }
}

/// Append overlay traces for each computable reference line.
pub fn apply(traces: &mut Vec<Trace>, lines: &[ReferenceLine]) {
    for line in lines {
        let overlay = match line.kind {
            ReferenceLineKind::Mean => mean_trace(traces, line),
            ReferenceLineKind::Horizontal => horizontal_trace(traces, line),
            ReferenceLineKind::Regression => regression_trace(traces, line),
        };
        if let Some(trace) = overlay {
            traces.push(trace);
        }
    }
}

/// Min/max over the finite numeric x values pooled across all traces.
fn numeric_x_range(traces: &[Trace]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;
    for trace in traces {
        let Some(xs) = &trace.x else { continue };
        for x in xs {
            if let Value::Number(n) = x {
                if let Some(v) = n.as_f64().filter(|f| f.is_finite()) {
                    seen = true;
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }
    }
    seen.then_some((min, max))
}

fn horizontal_segment(
    line: &ReferenceLine,
    fallback_name: &str,
    x_range: (f64, f64),
    y: f64,
) -> Trace {
    overlay_trace(
        line,
        fallback_name,
        "red",
        "dash",
        vec![json!(x_range.0), json!(x_range.1)],
        vec![Some(y), Some(y)],
        false,
    )
}

fn mean_trace(traces: &[Trace], line: &ReferenceLine) -> Option<Trace> {
    let values: Vec<f64> = traces
        .iter()
        .flat_map(|trace| trace.y.iter().copied().flatten())
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        debug!("mean line skipped: no numeric y values");
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let Some(range) = numeric_x_range(traces) else {
        debug!("mean line skipped: no numeric x values");
        return None;
    };
    Some(horizontal_segment(line, "Mean", range, mean))
}

fn horizontal_trace(traces: &[Trace], line: &ReferenceLine) -> Option<Trace> {
    let value = line
        .value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite());
    let Some(value) = value else {
        warn!("horizontal line skipped: missing or non-numeric value");
        return None;
    };
    let range = numeric_x_range(traces)?;
    Some(horizontal_segment(line, "Reference", range, value))
}

fn regression_trace(traces: &[Trace], line: &ReferenceLine) -> Option<Trace> {
    // Distinct x values across all traces, first-appearance order.
    let mut distinct: Vec<Value> = Vec::new();
    for trace in traces {
        let Some(xs) = &trace.x else { continue };
        for x in xs {
            if !distinct.iter().any(|seen| values_equal(seen, x)) {
                distinct.push(x.clone());
            }
        }
    }

    // All-numeric x maps to its numeric value; otherwise every x maps to
    // its positional index (categorical encoding).
    let numeric: Option<Vec<f64>> = distinct.iter().map(coerce_number).collect();
    let is_numeric = numeric.is_some();
    let mapped: Vec<f64> =
        numeric.unwrap_or_else(|| (0..distinct.len()).map(|i| i as f64).collect());

    // Every (x, y) pair with a finite y, under the shared x mapping.
    let mut points: Vec<(f64, f64, &Value)> = Vec::new();
    for trace in traces {
        let Some(xs) = &trace.x else { continue };
        for (x, y) in xs.iter().zip(&trace.y) {
            let Some(y) = (*y).filter(|v| v.is_finite()) else {
                continue;
            };
            if let Some(index) = distinct.iter().position(|seen| values_equal(seen, x)) {
                points.push((mapped[index], y, x));
            }
        }
    }

    if points.len() < 2 {
        warn!(points = points.len(), "regression skipped: not enough valid points");
        return None;
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p.0).sum();
    let sum_y: f64 = points.iter().map(|p| p.1).sum();
    let sum_xy: f64 = points.iter().map(|p| p.0 * p.1).sum();
    let sum_x2: f64 = points.iter().map(|p| p.0 * p.0).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator.abs() < REGRESSION_TOLERANCE {
        warn!(denominator, "regression skipped: denominator near zero");
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    if !slope.is_finite() || !intercept.is_finite() {
        warn!(slope, intercept, "regression skipped: non-finite fit");
        return None;
    }
    debug!(slope, intercept, n, "regression fit");

    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_min = slope * x_min + intercept;
    let y_max = slope * x_max + intercept;

    // Categorical endpoints surface the original labels at the min/max
    // mapped positions so the overlay aligns with the categorical axis.
    let endpoints = if is_numeric {
        vec![json!(x_min), json!(x_max)]
    } else {
        let label_at = |target: f64| {
            points
                .iter()
                .find(|p| p.0 == target)
                .map_or_else(|| json!(target), |p| p.2.clone())
        };
        vec![label_at(x_min), label_at(x_max)]
    };

    Some(overlay_trace(
        line,
        "Regression",
        "blue",
        "solid",
        endpoints,
        vec![Some(y_min), Some(y_max)],
        true,
    ))
}

fn overlay_trace(
    line: &ReferenceLine,
    fallback_name: &str,
    fallback_color: &str,
    fallback_dash: &str,
    x: Vec<Value>,
    y: Vec<Option<f64>>,
    skip_hover: bool,
) -> Trace {
    Trace {
        kind: TraceKind::Scatter,
        name: line
            .name
            .clone()
            .unwrap_or_else(|| fallback_name.to_string()),
        x: Some(x),
        y,
        mode: Some(TraceMode::Lines),
        line: Some(LineStyle {
            color: line
                .color
                .clone()
                .unwrap_or_else(|| fallback_color.to_string()),
            width: line.width.unwrap_or(2.0),
            dash: line
                .dash
                .clone()
                .unwrap_or_else(|| fallback_dash.to_string()),
        }),
        marker: None,
        boxpoints: None,
        showlegend: Some(true),
        hoverinfo: skip_hover.then(|| "skip".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scatter(x: Vec<Value>, y: Vec<Option<f64>>) -> Trace {
        Trace::scatter("base".into(), x, y, TraceMode::Markers)
    }

    fn bare(kind: ReferenceLineKind) -> ReferenceLine {
        ReferenceLine {
            kind,
            name: None,
            color: None,
            width: None,
            dash: None,
            value: None,
        }
    }

    #[test]
    fn test_default_synthesis_shapes() {
        for raw in [
            None,
            Some(Value::Null),
            Some(json!("")),
            Some(json!("   ")),
            Some(json!([])),
            Some(json!({"type": "regression"})),
        ] {
            let lines = parse_reference_lines(raw.as_ref());
            assert_eq!(lines.len(), 1, "shape {raw:?}");
            assert_eq!(lines[0], ReferenceLine::default_regression());
        }
    }

    #[test]
    fn test_parse_user_lines_and_aliases() {
        let raw = json!([
            {"type": "average", "name": "m"},
            {"type": "linear"},
            {"type": "vertical"},
            {"type": "horizontal", "value": 3}
        ]);
        let lines = parse_reference_lines(Some(&raw));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, ReferenceLineKind::Mean);
        assert_eq!(lines[1].kind, ReferenceLineKind::Regression);
        assert_eq!(lines[2].kind, ReferenceLineKind::Horizontal);
    }

    #[test]
    fn test_regression_collinear_exact() {
        let mut traces = vec![scatter(
            vec![json!(1), json!(2), json!(3)],
            vec![Some(2.0), Some(4.0), Some(6.0)],
        )];
        apply(&mut traces, &[bare(ReferenceLineKind::Regression)]);
        assert_eq!(traces.len(), 2);
        let overlay = &traces[1];
        assert_eq!(overlay.x.as_ref().unwrap(), &vec![json!(1.0), json!(3.0)]);
        assert_relative_eq!(overlay.y[0].unwrap(), 2.0);
        assert_relative_eq!(overlay.y[1].unwrap(), 6.0);
        assert_eq!(overlay.hoverinfo.as_deref(), Some("skip"));
        assert_eq!(overlay.showlegend, Some(true));
        assert_eq!(overlay.mode, Some(TraceMode::Lines));
        assert_eq!(overlay.kind, TraceKind::Scatter);
    }

    #[test]
    fn test_regression_categorical_endpoints_use_labels() {
        let mut traces = vec![scatter(
            vec![json!("a"), json!("b"), json!("c")],
            vec![Some(1.0), Some(3.0), Some(5.0)],
        )];
        apply(&mut traces, &[bare(ReferenceLineKind::Regression)]);
        assert_eq!(traces.len(), 2);
        let overlay = &traces[1];
        assert_eq!(overlay.x.as_ref().unwrap(), &vec![json!("a"), json!("c")]);
        assert_relative_eq!(overlay.y[0].unwrap(), 1.0);
        assert_relative_eq!(overlay.y[1].unwrap(), 5.0);
    }

    #[test]
    fn test_regression_numeric_strings_count_as_numeric() {
        let mut traces = vec![scatter(
            vec![json!("1"), json!("2")],
            vec![Some(1.0), Some(2.0)],
        )];
        apply(&mut traces, &[bare(ReferenceLineKind::Regression)]);
        assert_eq!(traces[1].x.as_ref().unwrap(), &vec![json!(1.0), json!(2.0)]);
    }

    #[test]
    fn test_regression_skips_single_point() {
        let mut traces = vec![scatter(vec![json!(1)], vec![Some(2.0)])];
        apply(&mut traces, &[bare(ReferenceLineKind::Regression)]);
        assert_eq!(traces.len(), 1);
    }

    #[test]
    fn test_regression_skips_degenerate_x() {
        // All points share one x: denominator is exactly zero.
        let mut traces = vec![scatter(
            vec![json!(4), json!(4), json!(4)],
            vec![Some(1.0), Some(2.0), Some(3.0)],
        )];
        apply(&mut traces, &[bare(ReferenceLineKind::Regression)]);
        assert_eq!(traces.len(), 1);
    }

    #[test]
    fn test_regression_ignores_null_y() {
        let mut traces = vec![scatter(
            vec![json!(1), json!(2), json!(3)],
            vec![Some(2.0), None, Some(6.0)],
        )];
        apply(&mut traces, &[bare(ReferenceLineKind::Regression)]);
        assert_eq!(traces.len(), 2);
        // Fit over (1,2) and (3,6): slope 2, intercept 0.
        assert_relative_eq!(traces[1].y[0].unwrap(), 2.0);
        assert_relative_eq!(traces[1].y[1].unwrap(), 6.0);
    }

    #[test]
    fn test_mean_pools_across_traces() {
        let mut traces = vec![
            scatter(vec![json!(1), json!(2)], vec![Some(1.0), Some(3.0)]),
            scatter(vec![json!(5)], vec![Some(8.0)]),
        ];
        apply(&mut traces, &[bare(ReferenceLineKind::Mean)]);
        assert_eq!(traces.len(), 3);
        let overlay = &traces[2];
        assert_eq!(overlay.name, "Mean");
        assert_eq!(overlay.x.as_ref().unwrap(), &vec![json!(1.0), json!(5.0)]);
        assert_relative_eq!(overlay.y[0].unwrap(), 4.0);
        let style = overlay.line.as_ref().unwrap();
        assert_eq!(style.color, "red");
        assert_eq!(style.dash, "dash");
        assert_relative_eq!(style.width, 2.0);
    }

    #[test]
    fn test_mean_skipped_without_numeric_x() {
        let mut traces = vec![scatter(
            vec![json!("a"), json!("b")],
            vec![Some(1.0), Some(2.0)],
        )];
        apply(&mut traces, &[bare(ReferenceLineKind::Mean)]);
        assert_eq!(traces.len(), 1);
    }

    #[test]
    fn test_horizontal_requires_plain_number() {
        let mut traces = vec![scatter(vec![json!(1), json!(2)], vec![Some(1.0), Some(2.0)])];
        let mut line = bare(ReferenceLineKind::Horizontal);
        apply(&mut traces, std::slice::from_ref(&line));
        assert_eq!(traces.len(), 1);

        line.value = Some(json!("7"));
        apply(&mut traces, std::slice::from_ref(&line));
        assert_eq!(traces.len(), 1);

        line.value = Some(json!(7));
        apply(&mut traces, std::slice::from_ref(&line));
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[1].name, "Reference");
        assert_eq!(traces[1].y, vec![Some(7.0), Some(7.0)]);
    }

    #[test]
    fn test_overlay_styling_overrides() {
        let mut traces = vec![scatter(vec![json!(1), json!(2)], vec![Some(1.0), Some(2.0)])];
        let line = ReferenceLine {
            kind: ReferenceLineKind::Horizontal,
            name: Some("limit".into()),
            color: Some("#222".into()),
            width: Some(4.0),
            dash: Some("dot".into()),
            value: Some(json!(1.5)),
        };
        apply(&mut traces, &[line]);
        let overlay = &traces[1];
        assert_eq!(overlay.name, "limit");
        let style = overlay.line.as_ref().unwrap();
        assert_eq!(style.color, "#222");
        assert_relative_eq!(style.width, 4.0);
        assert_eq!(style.dash, "dot");
    }

    #[test]
    fn test_later_lines_observe_earlier_overlays() {
        let mut traces = vec![scatter(
            vec![json!(1), json!(3)],
            vec![Some(1.0), Some(3.0)],
        )];
        apply(
            &mut traces,
            &[bare(ReferenceLineKind::Mean), bare(ReferenceLineKind::Regression)],
        );
        assert_eq!(traces.len(), 3);
        // The mean overlay's flat segment joins the regression pool; the
        // combined fit still passes through (2, 2).
        let regression = &traces[2];
        let xs = regression.x.as_ref().unwrap();
        let x0 = xs[0].as_f64().unwrap();
        let x1 = xs[1].as_f64().unwrap();
        let y0 = regression.y[0].unwrap();
        let y1 = regression.y[1].unwrap();
        let slope = (y1 - y0) / (x1 - x0);
        let at_two = y0 + slope * (2.0 - x0);
        assert_relative_eq!(at_two, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_one_bad_line_leaves_others_intact() {
        let mut traces = vec![scatter(
            vec![json!(1), json!(2)],
            vec![Some(1.0), Some(2.0)],
        )];
        let lines = vec![
            bare(ReferenceLineKind::Horizontal), // no value: skipped
            bare(ReferenceLineKind::Regression),
        ];
        apply(&mut traces, &lines);
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[1].name, "Regression");
    }
}
