pub mod error;
pub mod generator;
pub mod prompts;
pub mod providers;
pub mod snapshot;
pub mod stats;
pub mod template;
pub mod traits;

pub use error::{ReportError, Result};
pub use generator::{ProviderStatus, Report, ReportGenerator, ReportSource};
pub use snapshot::{ReportSnapshot, SnapshotStudent};
pub use traits::TextProvider;
