//! Storefront cache revalidation over HTTP.
//!
//! The storefront renders skill and review pages statically; after every
//! transition it is told which paths to rebuild with
//! `POST {endpoint} {"paths": [...]}` and an `x-revalidate-secret` header.

use std::time::Duration;

use robotskills_core::hook::{TransitionEvent, TransitionHook};
use robotskills_types::config::RevalidationConfig;
use robotskills_types::error::HookError;
use serde::Serialize;

pub const SECRET_HEADER: &str = "x-revalidate-secret";

#[derive(Serialize)]
struct RevalidateBody<'a> {
    paths: &'a [String],
}

pub struct HttpRevalidationHook {
    endpoint: String,
    secret: Option<String>,
    http: reqwest::Client,
}

impl HttpRevalidationHook {
    /// Fails when the HTTP client cannot be built, rather than falling back to
    /// a client without the timeout.
    pub fn new(
        endpoint: impl Into<String>,
        secret: Option<String>,
        timeout: Duration,
    ) -> Result<Self, HookError> {
        let http = reqwest::Client::builder()
            .user_agent("robotskills-revalidate/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| HookError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            secret,
            http,
        })
    }

    /// Build from config. `Ok(None)` when no endpoint is configured.
    ///
    /// The secret is read from the environment variable named in the config;
    /// a missing secret is logged and requests go out without the header.
    pub fn from_config(config: &RevalidationConfig) -> Result<Option<Self>, HookError> {
        let Some(endpoint) = config.endpoint.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if endpoint.is_empty() {
            return Ok(None);
        }
        let secret = std::env::var(&config.secret_env).ok().filter(|s| !s.is_empty());
        if secret.is_none() {
            tracing::warn!(
                env = %config.secret_env,
                "revalidation secret not set, requests will be unauthenticated"
            );
        }
        Self::new(endpoint, secret, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TransitionHook for HttpRevalidationHook {
    fn name(&self) -> &str {
        "revalidate"
    }

    async fn on_transition(&self, event: &TransitionEvent) -> Result<(), HookError> {
        let mut request = self.http.post(&self.endpoint).json(&RevalidateBody {
            paths: &event.revalidate_paths,
        });
        if let Some(secret) = &self.secret {
            request = request.header(SECRET_HEADER, secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HookError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(HookError::Status(status.as_u16()));
        }

        tracing::debug!(
            submission_id = %event.submission_id,
            paths = event.revalidate_paths.len(),
            "storefront revalidated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use robotskills_types::submission::{SkillId, Submission, SubmissionStatus};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Accept one connection, capture the raw request, answer with `status_line`.
    async fn one_shot_server(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if n == 0 || text.ends_with("]}") {
                    break;
                }
            }
            let reply = format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            socket.write_all(reply.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });
        (format!("http://{addr}/api/revalidate"), handle)
    }

    fn published_event() -> TransitionEvent {
        let mut submission = Submission::new_draft(SkillId::new(), "dev-1");
        submission.status = SubmissionStatus::Published;
        TransitionEvent::new(&submission, SubmissionStatus::PendingOemReview, "qa")
    }

    #[tokio::test]
    async fn test_posts_paths_with_secret() {
        let (url, server) = one_shot_server("HTTP/1.1 200 OK").await;
        let hook = HttpRevalidationHook::new(url, Some("s3cret".to_string()), Duration::from_secs(5)).unwrap();
        let event = published_event();

        hook.on_transition(&event).await.unwrap();
        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/revalidate"));
        assert!(raw.to_lowercase().contains("x-revalidate-secret: s3cret"));
        assert!(raw.contains("/admin/reviews"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (url, server) = one_shot_server("HTTP/1.1 401 Unauthorized").await;
        let hook = HttpRevalidationHook::new(url, None, Duration::from_secs(5)).unwrap();
        let err = hook.on_transition(&published_event()).await.unwrap_err();
        assert!(matches!(err, HookError::Status(401)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let hook = HttpRevalidationHook::new(
            format!("http://{addr}/api/revalidate"),
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let err = hook.on_transition(&published_event()).await.unwrap_err();
        assert!(matches!(err, HookError::Request(_)));
    }

    #[tokio::test]
    async fn test_silent_endpoint_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering.
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let hook = HttpRevalidationHook::new(
            format!("http://{addr}/api/revalidate"),
            None,
            Duration::from_millis(300),
        )
        .unwrap();
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            hook.on_transition(&published_event()),
        )
        .await
        .expect("configured timeout applies");
        assert!(matches!(result, Err(HookError::Request(_))));
        server.abort();
    }

    #[test]
    fn test_from_config_disabled_without_endpoint() {
        assert!(
            HttpRevalidationHook::from_config(&RevalidationConfig::default())
                .unwrap()
                .is_none()
        );

        let config = RevalidationConfig {
            endpoint: Some("https://www.robotskills.test/api/revalidate".to_string()),
            secret_env: "ROBOTSKILLS_TEST_SECRET_THAT_IS_UNSET".to_string(),
            timeout_secs: 3,
        };
        let hook = HttpRevalidationHook::from_config(&config).unwrap().unwrap();
        assert_eq!(hook.endpoint(), "https://www.robotskills.test/api/revalidate");
        assert!(hook.secret.is_none());
    }
}
