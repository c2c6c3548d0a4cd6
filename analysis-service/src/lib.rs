pub mod pagination;
pub mod service;

#[cfg(test)]
pub(crate) mod testutil;

pub use pagination::{CommentSource, DateWindow};
pub use service::AnalysisService;
