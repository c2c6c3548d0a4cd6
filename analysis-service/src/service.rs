use crate::pagination::{fetch_window, CommentSource, DateWindow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use sentiment_core::{
    AnalysisRequest, AnalysisResponse, AppConfig, HealthStatus, ScoredComment, ServiceError,
    SortOrder,
};
use sentiment_engine::SentimentAnalyzer;
use std::sync::Arc;
use tracing::{info, warn};

/// Orchestrates one analysis request: validation, date parsing, the
/// windowed fetch, scoring, optional polarity sort, and best-effort
/// metadata. Constructed once at startup with its dependencies; holds no
/// global state.
pub struct AnalysisService {
    source: Arc<dyn CommentSource>,
    analyzer: Arc<SentimentAnalyzer>,
    default_limit: u32,
    max_limit: u32,
}

impl AnalysisService {
    pub fn new(
        source: Arc<dyn CommentSource>,
        analyzer: Arc<SentimentAnalyzer>,
        config: &AppConfig,
    ) -> Self {
        Self {
            source,
            analyzer,
            default_limit: config.default_comment_limit,
            max_limit: config.max_comment_limit,
        }
    }

    /// Static liveness probe.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, ServiceError> {
        let limit = self.validate_limit(request.limit)?;
        let sort_order = parse_sort_order(request.sort_order.as_deref())?;
        let window = parse_window(request.start_date.as_deref(), request.end_date.as_deref())?;

        info!(
            "Analyzing sentiment for subfeddit: {} (limit: {})",
            request.subfeddit, limit
        );

        let comments = fetch_window(self.source.as_ref(), &request.subfeddit, limit, window).await?;

        if comments.is_empty() {
            warn!("No comments found for subfeddit: {}", request.subfeddit);
            return Ok(AnalysisResponse {
                subfeddit: request.subfeddit,
                total_comments: 0,
                comments: Vec::new(),
                subfeddit_info: None,
            });
        }

        // Scoring happens only on the comments that survived the window
        // and the limit; nothing discarded is ever scored.
        let mut scored: Vec<ScoredComment> = comments
            .into_iter()
            .map(|comment| {
                let sentiment = self.analyzer.analyze(&comment.text);
                ScoredComment { comment, sentiment }
            })
            .collect();

        if let Some(order) = sort_order {
            sort_by_polarity(&mut scored, order);
        }

        let subfeddit_info = self.source.get_subfeddit_info(&request.subfeddit).await;

        info!(
            "Successfully analyzed {} comments for {}",
            scored.len(),
            request.subfeddit
        );

        Ok(AnalysisResponse {
            subfeddit: request.subfeddit,
            total_comments: scored.len(),
            comments: scored,
            subfeddit_info,
        })
    }

    /// Absent limits take the default; limits above the maximum clamp down
    /// silently; zero fails validation.
    fn validate_limit(&self, limit: Option<u32>) -> Result<usize, ServiceError> {
        match limit {
            None => Ok(self.default_limit as usize),
            Some(0) => Err(ServiceError::validation("limit must be greater than 0")),
            Some(l) if l > self.max_limit => Ok(self.max_limit as usize),
            Some(l) => Ok(l as usize),
        }
    }
}

fn parse_sort_order(sort_order: Option<&str>) -> Result<Option<SortOrder>, ServiceError> {
    sort_order.map(str::parse).transpose()
}

fn parse_window(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<DateWindow, ServiceError> {
    Ok(DateWindow {
        start: start_date.map(parse_date).transpose()?,
        end: end_date.map(parse_date).transpose()?,
    })
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (with `T` or space), and bare
/// `YYYY-MM-DD`. Zone-less inputs are interpreted as UTC.
fn parse_date(raw: &str) -> Result<DateTime<Utc>, ServiceError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    Err(ServiceError::validation(format!(
        "Invalid date format: {}",
        raw
    )))
}

fn sort_by_polarity(comments: &mut [ScoredComment], order: SortOrder) {
    // sort_by is stable: ties keep their prior relative order
    match order {
        SortOrder::Asc => {
            comments.sort_by(|a, b| a.sentiment.polarity.total_cmp(&b.sentiment.polarity))
        }
        SortOrder::Desc => {
            comments.sort_by(|a, b| b.sentiment.polarity.total_cmp(&a.sentiment.polarity))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{comments_at, ScriptedSource};
    use chrono::TimeZone;
    use sentiment_core::{Comment, SubfedditInfo};
    use sentiment_engine::PolarityModel;
    use std::time::Duration;

    /// Test model: the comment text is its own polarity.
    struct TextAsPolarity;

    impl PolarityModel for TextAsPolarity {
        fn polarity(&self, text: &str) -> Result<f64, ServiceError> {
            Ok(text.parse().unwrap_or(0.0))
        }
    }

    fn service_over(source: Arc<ScriptedSource>) -> AnalysisService {
        let analyzer = Arc::new(SentimentAnalyzer::new(
            Arc::new(TextAsPolarity),
            Duration::from_secs(60),
        ));
        AnalysisService::new(source, analyzer, &AppConfig::default())
    }

    fn polarity_comments(values: &[&str]) -> Vec<Comment> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| Comment {
                id: i.to_string(),
                username: format!("user_{}", i),
                text: value.to_string(),
                created_at: 1_650_000_000 + i as i64,
            })
            .collect()
    }

    fn request(subfeddit: &str) -> AnalysisRequest {
        AnalysisRequest {
            subfeddit: subfeddit.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_limit_zero_fails_validation() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let service = service_over(source);

        let result = service
            .analyze(AnalysisRequest {
                limit: Some(0),
                ..request("news")
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_limit_above_max_is_clamped() {
        let first = chrono::Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let source = Arc::new(ScriptedSource::new(vec![Ok(comments_at(first, 100))]));
        let service = service_over(source.clone());

        let response = service
            .analyze(AnalysisRequest {
                limit: Some(150),
                ..request("news")
            })
            .await
            .unwrap();

        // Clamped to the configured maximum of 100, not rejected
        assert_eq!(source.comment_calls(), vec![(0, 100)]);
        assert_eq!(response.total_comments, 100);
    }

    #[tokio::test]
    async fn test_absent_limit_takes_default() {
        let first = chrono::Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let source = Arc::new(ScriptedSource::new(vec![Ok(comments_at(first, 25))]));
        let service = service_over(source.clone());

        service.analyze(request("news")).await.unwrap();
        assert_eq!(source.comment_calls(), vec![(0, 25)]);
    }

    #[tokio::test]
    async fn test_invalid_sort_order_fails_validation() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let service = service_over(source);

        let result = service
            .analyze(AnalysisRequest {
                sort_order: Some("invalid".to_string()),
                ..request("news")
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_unparseable_date_fails_validation() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let service = service_over(source);

        let result = service
            .analyze(AnalysisRequest {
                start_date: Some("not-a-date".to_string()),
                ..request("news")
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_sort_desc_most_positive_first() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(polarity_comments(&[
            "0.2", "0.8", "-0.5",
        ]))]));
        let service = service_over(source);

        let response = service
            .analyze(AnalysisRequest {
                sort_order: Some("desc".to_string()),
                ..request("news")
            })
            .await
            .unwrap();

        let polarities: Vec<f64> = response
            .comments
            .iter()
            .map(|c| c.sentiment.polarity)
            .collect();
        assert_eq!(polarities, vec![0.8, 0.2, -0.5]);
    }

    #[tokio::test]
    async fn test_sort_asc_most_negative_first() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(polarity_comments(&[
            "0.2", "0.8", "-0.5",
        ]))]));
        let service = service_over(source);

        let response = service
            .analyze(AnalysisRequest {
                sort_order: Some("asc".to_string()),
                ..request("news")
            })
            .await
            .unwrap();

        let polarities: Vec<f64> = response
            .comments
            .iter()
            .map(|c| c.sentiment.polarity)
            .collect();
        assert_eq!(polarities, vec![-0.5, 0.2, 0.8]);
    }

    #[tokio::test]
    async fn test_absent_sort_order_preserves_input_order() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(polarity_comments(&[
            "0.2", "0.8", "-0.5",
        ]))]));
        let service = service_over(source);

        let response = service.analyze(request("news")).await.unwrap();

        let polarities: Vec<f64> = response
            .comments
            .iter()
            .map(|c| c.sentiment.polarity)
            .collect();
        assert_eq!(polarities, vec![0.2, 0.8, -0.5]);
    }

    #[tokio::test]
    async fn test_sort_is_stable_on_ties() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(polarity_comments(&[
            "0.5", "0.5", "0.1",
        ]))]));
        let service = service_over(source);

        let response = service
            .analyze(AnalysisRequest {
                sort_order: Some("desc".to_string()),
                ..request("news")
            })
            .await
            .unwrap();

        let ids: Vec<&str> = response
            .comments
            .iter()
            .map(|c| c.comment.id.as_str())
            .collect();
        assert_eq!(ids, ["0", "1", "2"]);
    }

    #[tokio::test]
    async fn test_empty_result_skips_metadata_lookup() {
        let info = SubfedditInfo {
            id: "1".to_string(),
            username: "admin_1".to_string(),
            title: "news".to_string(),
            description: "all the news".to_string(),
        };
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![])]).with_info(info));
        let service = service_over(source.clone());

        let response = service.analyze(request("news")).await.unwrap();

        assert_eq!(response.total_comments, 0);
        assert!(response.comments.is_empty());
        assert!(response.subfeddit_info.is_none());
        assert_eq!(source.info_calls(), 0);
    }

    #[tokio::test]
    async fn test_metadata_attached_when_available() {
        let info = SubfedditInfo {
            id: "1".to_string(),
            username: "admin_1".to_string(),
            title: "news".to_string(),
            description: "all the news".to_string(),
        };
        let source = Arc::new(
            ScriptedSource::new(vec![Ok(polarity_comments(&["0.2"]))]).with_info(info),
        );
        let service = service_over(source.clone());

        let response = service.analyze(request("news")).await.unwrap();

        assert_eq!(response.total_comments, 1);
        assert_eq!(response.total_comments, response.comments.len());
        assert_eq!(response.subfeddit_info.unwrap().id, "1");
        assert_eq!(source.info_calls(), 1);
    }

    #[tokio::test]
    async fn test_metadata_lookup_failure_is_not_fatal() {
        // Source has no info to serve: the lookup degrades to absent
        let source = Arc::new(ScriptedSource::new(vec![Ok(polarity_comments(&["0.2"]))]));
        let service = service_over(source);

        let response = service.analyze(request("news")).await.unwrap();
        assert_eq!(response.total_comments, 1);
        assert!(response.subfeddit_info.is_none());
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2022-01-01").is_ok());
        assert!(parse_date("2022-01-01T12:30:00").is_ok());
        assert!(parse_date("2022-01-01 12:30:00").is_ok());
        assert!(parse_date("2022-01-01T12:30:00Z").is_ok());
        assert!(parse_date("2022-01-01T12:30:00+02:00").is_ok());
        assert!(parse_date("January 1st").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_date_day_starts_at_midnight_utc() {
        let parsed = parse_date("2022-01-01").unwrap();
        let expected = chrono::Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_health_probe() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let service = service_over(source);

        let health = service.health();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "sentiment-analysis");
    }
}
