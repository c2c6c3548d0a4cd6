//! Scripted fakes for exercising the pagination engine and the service
//! without a live upstream.

use crate::pagination::CommentSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentiment_core::{Comment, ServiceError, SubfedditInfo};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn comment(id: &str, created_at: i64) -> Comment {
    Comment {
        id: id.to_string(),
        username: format!("user_{}", id),
        text: format!("comment {}", id),
        created_at,
    }
}

/// `count` comments starting at `first`, one minute apart, ids "0".."n".
pub fn comments_at(first: DateTime<Utc>, count: usize) -> Vec<Comment> {
    (0..count)
        .map(|i| comment(&i.to_string(), first.timestamp() + (i as i64) * 60))
        .collect()
}

/// A `CommentSource` that replays a script of batch results, then serves
/// the default batch (or nothing) forever. Records every call it sees.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<Comment>, ServiceError>>>,
    default_batch: Option<Vec<Comment>>,
    calls: Mutex<Vec<(u32, u32)>>,
    info_calls: AtomicUsize,
    info: Option<SubfedditInfo>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Vec<Comment>, ServiceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            default_batch: None,
            calls: Mutex::new(Vec::new()),
            info_calls: AtomicUsize::new(0),
            info: None,
        }
    }

    pub fn with_default_batch(mut self, batch: Vec<Comment>) -> Self {
        self.default_batch = Some(batch);
        self
    }

    pub fn with_info(mut self, info: SubfedditInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// The (skip, limit) pairs of every comment fetch so far.
    pub fn comment_calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommentSource for ScriptedSource {
    async fn get_comments(
        &self,
        _name: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Comment>, ServiceError> {
        self.calls.lock().unwrap().push((skip, limit));

        if let Some(result) = self.script.lock().unwrap().pop_front() {
            return result;
        }
        Ok(self.default_batch.clone().unwrap_or_default())
    }

    async fn get_subfeddit_info(&self, _name: &str) -> Option<SubfedditInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.info.clone()
    }
}
