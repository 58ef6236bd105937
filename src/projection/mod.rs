/// Chart series for the active view.
pub mod chart;
pub mod engine;
/// Calculator inputs and field-level edits.
pub mod params;
pub mod summary;
pub mod types;

pub use engine::project;
pub use params::{Edit, Field, ParameterSet, ViewMode};
pub use summary::Summary;
pub use types::{Projection, ProjectionRow};
