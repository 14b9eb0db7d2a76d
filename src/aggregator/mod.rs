pub mod batch;
pub mod controller;
pub mod formatter;
pub mod state;
pub mod view;

pub use batch::{enrich_in_windows, BatchOutcome, ENRICHMENT_WINDOW};
pub use controller::ScanController;
pub use state::{Phase, QueryTag, ScanEvent, ScanState};
pub use view::{build_view, ViewModel, ViewOptions};
