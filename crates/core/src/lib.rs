pub mod config;
pub mod cover;
pub mod error;
pub mod fingerprint;
pub mod hints;
pub mod http;
pub mod isbn;
pub mod lookup;
pub mod opf;
pub mod pipeline;
pub mod progress;
pub mod walk;

#[cfg(test)]
mod test_support;

pub mod prelude {
    pub use crate::cover::{CoverChain, CoverImage, CoverProvider};
    pub use crate::error::*;
    pub use crate::hints::{ArchiveHints, PathHints, SegmentConvention};
    pub use crate::lookup::{IsbnResolver, TitleQuery};
    pub use crate::pipeline::{ArchiveOutcome, CoverPipeline, RunSummary};
}
