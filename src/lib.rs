//! # Trazado
//!
//! Declarative chart-compilation engine: tabular rows in, renderer-agnostic
//! figure descriptors out.
//!
//! Given heterogeneous JSON rows, a set of field encodings, and a list of
//! declarative transforms, trazado produces a Plotly-style figure (ordered
//! traces plus layout/config). It is a pure function of its inputs: no
//! rendering, no persistence, no I/O, no shared state.
//!
//! ## Pipeline
//!
//! rows → transforms → series split → aggregation → figure builder
//! (scatter builders additionally derive statistical reference lines:
//! pooled mean, fixed horizontal, least-squares regression).
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use trazado::prelude::*;
//!
//! let rows = vec![
//!     json!({"month": "Jan", "sales": 10, "region": "east"}),
//!     json!({"month": "Feb", "sales": 25, "region": "east"}),
//!     json!({"month": "Jan", "sales": 5,  "region": "west"}),
//! ];
//! let encodings = EncodingMap::from_value(&json!({
//!     "x": {"field": "month"},
//!     "y": {"field": "sales", "agg": "sum"},
//!     "series": {"field": "region"},
//! }))?;
//!
//! let figure = compile(ChartKind::Bar, &rows, &encodings, &[], &ChartSpec::default())
//!     .expect("x and y are mapped");
//! assert_eq!(figure.data.len(), 2);
//! # Ok::<(), trazado::Error>(())
//! ```
//!
//! ## Degradation, not failure
//!
//! A missing required encoding yields `None` ("nothing to render").
//! Malformed transforms and uncomputable reference lines are skipped.
//! Uncoercible values become null gaps. Only the typed input boundary
//! ([`EncodingMap::from_value`], [`ChartSpec::from_value`],
//! `ChartKind::from_str`) returns an [`Error`].

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_precision_loss)]

// ============================================================================
// Pipeline Stages
// ============================================================================

/// Dotted-path resolution and numeric coercion.
pub mod value;

/// Declarative filter/sort transforms.
pub mod transform;

/// Series splitting into (x, y) points.
pub mod series;

/// Per-x-group aggregation.
pub mod aggregate;

/// Statistical reference lines for scatter charts.
pub mod refline;

// ============================================================================
// Figure Assembly
// ============================================================================

/// Encoding slots and alias resolution.
pub mod encoding;

/// Trace/figure model, layout merging, chart spec.
pub mod figure;

/// Bar, line/scatter, and box figure builders.
pub mod builders;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trazado operations.
pub mod error;

pub use builders::{compile, ChartKind};
pub use encoding::{Encoding, EncodingMap};
pub use error::{Error, Result};
pub use figure::{ChartSpec, Figure, Trace};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient imports.
///
/// ```rust,ignore
/// use trazado::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aggregate::Aggregation;
    pub use crate::builders::{
        build_bar_figure, build_box_figure, build_line_figure, build_scatter_figure, compile,
        ChartKind,
    };
    pub use crate::encoding::{Encoding, EncodingMap};
    pub use crate::error::{Error, Result};
    pub use crate::figure::{ChartSpec, Figure, Trace, TraceKind, TraceMode};
    pub use crate::refline::{ReferenceLine, ReferenceLineKind};
    pub use crate::series::Point;
    pub use crate::transform::{FilterOp, SortDirection, Transform};
}
