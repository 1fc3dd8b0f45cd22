//! Figure builders: compose the pipeline stages into renderer-ready
//! figures.
//!
//! Each builder resolves its required encodings (returning `None` when
//! one is missing), splits rows into series, aggregates, and emits one
//! trace per series over a default layout deep-merged with the caller's
//! overrides.

mod bar;
mod boxplot;
mod line;

pub use bar::build_bar_figure;
pub use boxplot::build_box_figure;
pub use line::{build_line_figure, build_scatter_figure};

use std::str::FromStr;

use serde_json::{json, Value};

use crate::error::Error;
use crate::figure::{ChartSpec, Figure};
use crate::transform::{self, Transform};
use crate::EncodingMap;

/// Supported chart families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical bar chart.
    Bar,
    /// Line chart.
    Line,
    /// Scatter chart (markers, plus reference lines).
    Scatter,
    /// Box plot.
    Box,
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "scatter" => Ok(ChartKind::Scatter),
            "box" => Ok(ChartKind::Box),
            other => Err(Error::UnknownChartKind(other.to_string())),
        }
    }
}

/// Compile rows into a figure: transforms, then the kind's builder.
///
/// `None` means "nothing to render" (a required encoding was missing),
/// never a failure the caller must handle as exceptional.
#[must_use]
pub fn compile(
    kind: ChartKind,
    rows: &[Value],
    encodings: &EncodingMap,
    transforms: &[Transform],
    spec: &ChartSpec,
) -> Option<Figure> {
    let rows = transform::apply_all(rows, transforms);
    match kind {
        ChartKind::Bar => build_bar_figure(&rows, encodings, spec),
        ChartKind::Line => build_line_figure(&rows, encodings, spec),
        ChartKind::Scatter => build_scatter_figure(&rows, encodings, spec),
        ChartKind::Box => build_box_figure(&rows, encodings, spec),
    }
}

/// Default layout shared by the bar and box builders.
pub(crate) fn standard_layout() -> Value {
    json!({
        "height": 500,
        "margin": {"l": 80, "r": 80, "t": 100, "b": 150, "pad": 4},
        "xaxis": {
            "tickangle": -45,
            "tickfont": {"size": 10, "color": "#666"},
            "showgrid": true,
            "gridcolor": "#e5e5e5",
            "gridwidth": 1
        },
        "yaxis": {
            "showgrid": true,
            "gridcolor": "#d3d3d3",
            "gridwidth": 1,
            "zeroline": true,
            "zerolinecolor": "#999",
            "zerolinewidth": 2
        }
    })
}
