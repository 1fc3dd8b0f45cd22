//! Renderer-agnostic figure model and layout merging.
//!
//! A [`Figure`] serializes directly into the shape a Plotly-style surface
//! consumes: an ordered trace list plus layout and config objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Chart family of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    /// Vertical bars.
    Bar,
    /// Line/scatter points.
    Scatter,
    /// Box-and-whisker distribution.
    Box,
}

/// Draw mode for scatter traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceMode {
    /// Connected line segments only.
    #[serde(rename = "lines")]
    Lines,
    /// Markers only.
    #[serde(rename = "markers")]
    Markers,
    /// Both lines and markers.
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Line styling for scatter and overlay traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// CSS-style color name or hex string.
    pub color: String,
    /// Stroke width in pixels.
    pub width: f64,
    /// Dash pattern name (`solid`, `dash`, `dot`, ...).
    pub dash: String,
}

/// Marker styling; carries a palette through untouched (a single color
/// or a per-point color array).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Color value or array, passed through verbatim.
    pub color: Value,
}

/// One drawable series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Chart family.
    #[serde(rename = "type")]
    pub kind: TraceKind,
    /// Legend name.
    pub name: String,
    /// X values in group order; absent for box traces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<Value>>,
    /// Y values; `None` serializes as a null gap.
    pub y: Vec<Option<f64>>,
    /// Scatter draw mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,
    /// Line styling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    /// Marker styling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    /// Box-plot point display policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxpoints: Option<String>,
    /// Legend visibility override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    /// Hover behavior override (`skip` disables tooltips).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
}

impl Trace {
    /// A bar trace.
    #[must_use]
    pub fn bar(name: String, x: Vec<Value>, y: Vec<Option<f64>>) -> Self {
        Self {
            kind: TraceKind::Bar,
            name,
            x: Some(x),
            y,
            mode: None,
            line: None,
            marker: None,
            boxpoints: None,
            showlegend: None,
            hoverinfo: None,
        }
    }

    /// A scatter trace.
    #[must_use]
    pub fn scatter(name: String, x: Vec<Value>, y: Vec<Option<f64>>, mode: TraceMode) -> Self {
        Self {
            kind: TraceKind::Scatter,
            name,
            x: Some(x),
            y,
            mode: Some(mode),
            line: None,
            marker: None,
            boxpoints: None,
            showlegend: None,
            hoverinfo: None,
        }
    }

    /// A box trace over finite values only.
    #[must_use]
    pub fn box_plot(name: String, values: Vec<f64>, boxpoints: String) -> Self {
        Self {
            kind: TraceKind::Box,
            name,
            x: None,
            y: values.into_iter().map(Some).collect(),
            mode: None,
            line: None,
            marker: None,
            boxpoints: Some(boxpoints),
            showlegend: None,
            hoverinfo: None,
        }
    }
}

/// Complete renderer-ready output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Ordered drawable traces.
    pub data: Vec<Trace>,
    /// Layout object after default/override merging.
    pub layout: Value,
    /// Renderer configuration, passed through from the caller.
    pub config: Value,
}

/// Caller-supplied figure options.
///
/// Parsed leniently: unknown keys are ignored, every field is optional.
/// `reference_lines` stays raw so the reference-line module can apply its
/// own tolerant interpretation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    /// Layout overrides, deep-merged over the builder default.
    pub layout: Option<Value>,
    /// Renderer config object, copied into the figure.
    pub config: Option<Value>,
    /// Scatter draw mode override for line charts.
    pub mode: Option<TraceMode>,
    /// Box-plot point display policy.
    pub boxpoints: Option<String>,
    /// Reference-line requests for scatter charts.
    pub reference_lines: Option<Value>,
    /// Bar marker palette, passed through verbatim.
    pub palette: Option<Value>,
}

impl ChartSpec {
    /// Deserialize a spec document.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::Spec)
    }

    /// The config object for the figure: the caller's object or `{}`.
    #[must_use]
    pub fn config_object(&self) -> Value {
        match &self.config {
            Some(config @ Value::Object(_)) => config.clone(),
            _ => Value::Object(Map::new()),
        }
    }
}

/// Deep-merge layout overrides into a default layout.
///
/// Object values merge key-wise, recursively. Arrays and primitives
/// replace wholesale. A null override leaves the default untouched. The
/// asymmetry is load-bearing: callers override one nested field without
/// losing the rest of the defaults.
#[must_use]
pub fn merge_layout(default: Value, overrides: &Value) -> Value {
    match overrides {
        Value::Null => default,
        _ => merge_value(Some(default), overrides),
    }
}

fn merge_value(base: Option<Value>, overrides: &Value) -> Value {
    if let Value::Object(override_map) = overrides {
        let mut merged = match base {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for (key, value) in override_map {
            let existing = merged.remove(key);
            merged.insert(key.clone(), merge_value(existing, value));
        }
        Value::Object(merged)
    } else {
        overrides.clone()
    }
}
