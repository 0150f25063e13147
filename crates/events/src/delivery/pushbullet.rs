//! Pushbullet push notifications.
//!
//! [`PushbulletNotifier`] posts a `note` push addressed to the subscriber's
//! identity (an email address known to Pushbullet) through the v2 REST
//! API. A single attempt is made per alert.

use std::time::Duration;

use async_trait::async_trait;

use super::{Notifier, NotifyError};

/// Pushbullet v2 push endpoint.
pub const PUSHBULLET_ENDPOINT: &str = "https://api.pushbullet.com/v2/pushes";

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PushbulletNotifier {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PushbulletNotifier {
    /// Create a notifier authenticating with `token`.
    pub fn new(token: impl Into<String>) -> Result<Self, NotifyError> {
        Self::with_endpoint(token, PUSHBULLET_ENDPOINT)
    }

    /// Create a notifier posting to a custom endpoint.
    pub fn with_endpoint(
        token: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }
}

fn push_payload(subscriber: &str, title: &str, body: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "note",
        "title": title,
        "body": body,
        "email": subscriber,
    })
}

#[async_trait]
impl Notifier for PushbulletNotifier {
    fn name(&self) -> &'static str {
        "pushbullet"
    }

    async fn send(&self, subscriber: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&push_payload(subscriber, title, body))
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(NotifyError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(subscriber, "Pushbullet alert sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::extract::State;
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// The `Authorization` header and JSON body of one received push.
    type Received = (Option<String>, serde_json::Value);

    /// Serve `/v2/pushes` on an ephemeral port, answering every push with
    /// `status` and forwarding what arrived.
    async fn push_server(status: StatusCode) -> (String, mpsc::UnboundedReceiver<Received>) {
        let (tx, rx) = mpsc::unbounded_channel::<Received>();
        let app = Router::new()
            .route(
                "/v2/pushes",
                post(
                    move |State(tx): State<mpsc::UnboundedSender<Received>>,
                          headers: HeaderMap,
                          Json(body): Json<serde_json::Value>| async move {
                        let auth = headers
                            .get(AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_owned);
                        tx.send((auth, body)).unwrap();
                        status
                    },
                ),
            )
            .with_state(tx);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v2/pushes", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (url, rx)
    }

    #[test]
    fn payload_is_a_note_addressed_to_subscriber() {
        let payload = push_payload("ann@example.com", "Title", "Body");
        assert_eq!(payload["type"], "note");
        assert_eq!(payload["email"], "ann@example.com");
        assert_eq!(payload["title"], "Title");
        assert_eq!(payload["body"], "Body");
    }

    #[tokio::test]
    async fn posts_note_with_bearer_token() {
        let (url, mut received) = push_server(StatusCode::OK).await;
        let notifier = PushbulletNotifier::with_endpoint("secret", url).unwrap();

        notifier
            .send("ann@example.com", "Automatic Euribor alert", "exceeded")
            .await
            .unwrap();

        let (auth, body) = received.recv().await.unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer secret"));
        assert_eq!(body["type"], "note");
        assert_eq!(body["email"], "ann@example.com");
        assert_eq!(body["title"], "Automatic Euribor alert");
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let (url, mut received) = push_server(StatusCode::UNAUTHORIZED).await;
        let notifier = PushbulletNotifier::with_endpoint("bad", url).unwrap();

        let result = notifier.send("ann@example.com", "t", "b").await;
        assert_matches!(result, Err(NotifyError::HttpStatus(401)));
        assert!(received.recv().await.is_some());
    }

    #[tokio::test]
    async fn only_200_counts_as_delivered() {
        for status in [StatusCode::CREATED, StatusCode::ACCEPTED, StatusCode::NO_CONTENT] {
            let (url, _received) = push_server(status).await;
            let notifier = PushbulletNotifier::with_endpoint("secret", url).unwrap();

            let result = notifier.send("ann@example.com", "t", "b").await;
            assert_matches!(result, Err(NotifyError::HttpStatus(code)) if code == status.as_u16());
        }
    }

    #[test]
    fn error_display_http_status() {
        let err = NotifyError::HttpStatus(502);
        assert_eq!(err.to_string(), "Notification service returned HTTP 502");
    }
}
