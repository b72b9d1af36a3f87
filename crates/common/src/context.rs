//! 请求上下文
//!
//! 每个入站请求在传输层创建一个 `RequestContext`，携带截止时间和取消信号，
//! 一路传到存储层。存储调用通过 [`RequestContext::run`] 执行：超时返回
//! `Unavailable`，取消返回 `Cancelled`，进行中的查询 future 会被直接丢弃。

use std::future::Future;
use std::time::Duration;

use ecom_errors::{AppError, AppResult};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}

impl RequestContext {
    /// 无截止时间的上下文（启动任务、测试）
    pub fn background() -> Self {
        Self {
            request_id: Uuid::now_v7().to_string(),
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        // 只能收紧，不能放宽
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// 在上下文约束下执行一个存储操作
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.is_cancelled() {
            return Err(AppError::cancelled(format!("{operation} cancelled before start")));
        }
        if self.is_expired() {
            return Err(AppError::unavailable(format!(
                "{operation} skipped: request deadline exceeded"
            )));
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    Err(AppError::cancelled(format!("{operation} cancelled")))
                }
                result = fut => result,
            }
        };

        match self.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, guarded).await {
                Ok(result) => result,
                Err(_) => Err(AppError::unavailable(format!(
                    "{operation} exceeded request deadline"
                ))),
            },
            None => guarded.await,
        }
    }
}
