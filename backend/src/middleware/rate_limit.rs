//! Per-IP rate limiting for the authentication endpoints

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

use crate::error::{ErrorDetail, ErrorResponse};

/// Sliding-window request counter keyed by client IP
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<RwLock<HashMap<IpAddr, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_seconds: u64) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_seconds),
        }
    }

    /// Record a request from `ip`, or reject it if the window is full
    pub async fn check(&self, ip: IpAddr) -> Result<(), Response> {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        let timestamps = requests.entry(ip).or_default();
        timestamps.retain(|&t| now.duration_since(t) < self.window);

        if timestamps.len() >= self.max_requests {
            let error = ErrorResponse {
                error: ErrorDetail {
                    code: "RATE_LIMITED".to_string(),
                    message_en: "Too many requests, please try again later".to_string(),
                    message_th: "คำขอมากเกินไป กรุณาลองใหม่ภายหลัง".to_string(),
                    field: None,
                },
            };
            return Err((StatusCode::TOO_MANY_REQUESTS, Json(error)).into_response());
        }

        timestamps.push(now);
        Ok(())
    }
}

/// Middleware applying a [`RateLimiter`] to the wrapped routes
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(response) = limiter.check(addr.ip()).await {
        return response;
    }
    next.run(request).await
}
