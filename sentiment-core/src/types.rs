use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single comment as served by the Feddit API. Never mutated after
/// construction; `created_at` is Unix seconds, the upstream representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub username: String,
    pub text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Polarity >= 0 classifies as positive; this includes exactly 0.0 and
    /// the analyzer's failure fallback.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity >= 0.0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

/// Sentiment analysis result for one piece of text.
/// Invariant: -1.0 <= polarity <= 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub polarity: f64,
    pub classification: SentimentLabel,
}

impl SentimentScore {
    pub fn new(polarity: f64) -> Self {
        let polarity = polarity.clamp(-1.0, 1.0);
        Self {
            polarity,
            classification: SentimentLabel::from_polarity(polarity),
        }
    }

    /// The fixed score returned when the polarity model fails.
    pub fn fallback() -> Self {
        Self {
            polarity: 0.0,
            classification: SentimentLabel::Positive,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub sentiment: SentimentScore,
}

/// Passive lookup record for a subfeddit, populated from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubfedditInfo {
    pub id: String,
    pub username: String,
    pub title: String,
    pub description: String,
}

/// Raw request inputs as handed over by the hosting layer. All validation
/// happens inside the analysis service.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub subfeddit: String,
    pub limit: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub subfeddit: String,
    pub total_comments: usize,
    pub comments: Vec<ScoredComment>,
    pub subfeddit_info: Option<SubfedditInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "sentiment-analysis".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most negative polarity first.
    Asc,
    /// Most positive polarity first.
    Desc,
}

impl FromStr for SortOrder {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ServiceError::validation(format!(
                "sort_order must be 'asc' or 'desc', got: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_boundary_at_zero() {
        assert_eq!(SentimentLabel::from_polarity(0.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(0.3), SentimentLabel::Positive);
        assert_eq!(
            SentimentLabel::from_polarity(-0.001),
            SentimentLabel::Negative
        );
        assert_eq!(
            SentimentLabel::from_polarity(-1.0),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn test_score_clamps_polarity() {
        let score = SentimentScore::new(1.7);
        assert_eq!(score.polarity, 1.0);
        let score = SentimentScore::new(-2.0);
        assert_eq!(score.polarity, -1.0);
        assert_eq!(score.classification, SentimentLabel::Negative);
    }

    #[test]
    fn test_fallback_is_positive_zero() {
        let score = SentimentScore::fallback();
        assert_eq!(score.polarity, 0.0);
        assert_eq!(score.classification, SentimentLabel::Positive);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("invalid".parse::<SortOrder>().is_err());
        assert!("ASC".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_scored_comment_serializes_flat() {
        let scored = ScoredComment {
            comment: Comment {
                id: "42".to_string(),
                username: "alice".to_string(),
                text: "great stuff".to_string(),
                created_at: 1640995200,
            },
            sentiment: SentimentScore::new(0.8),
        };

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["sentiment"]["classification"], "positive");
    }
}
