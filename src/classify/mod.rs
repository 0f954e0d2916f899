pub mod interpret;
pub mod pipeline;
pub mod report;
pub mod types;

pub use interpret::interpret;
pub use pipeline::ClassifyPipeline;
pub use report::ReportFormatter;
pub use types::{Classification, ClassifyOptions, ConfidenceTier, RankedLabel, DEFAULT_TOP_K};
