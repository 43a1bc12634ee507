// Statement Analyzer - Core Library
// Transaction analytics over CSV/JSON bank statements with a persistent
// single-slot session, so one load serves many analysis invocations.

pub mod analytics;
pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use analytics::{
    frequency, net_flow, summary, top_by_amount, top_by_frequency, trend, NetFlow, Period, Summary,
};
pub use error::{AnalyzerError, Result};
pub use loader::{detect_format, load_file, SourceFormat};
pub use model::{Ledger, Transaction};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
