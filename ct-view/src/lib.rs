//! View models for the list and chart collaborators.
//!
//! All structs derive `Serialize` so a renderer can take them as JSON.
//!
//! - `chart`: the label/value/color series for the band average chart
//! - `view`: `derive_view`, recomputed after every state transition

pub mod chart;
pub mod view;

pub use chart::{build_chart, ChartSeries};
pub use view::{derive_view, DerivedView};
