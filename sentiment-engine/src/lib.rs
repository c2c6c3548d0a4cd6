pub mod analyzer;
pub mod cache;
pub mod model;

pub use analyzer::SentimentAnalyzer;
pub use cache::ScoreCache;
pub use model::{LexiconModel, PolarityModel};
