pub mod loader;
pub mod render;
pub mod selection;

pub use loader::{fetch_results, LoadState, ResultsScreen, SearchOutcome};
pub use render::render;
pub use selection::{ReportAction, Selection};
