//! Payment processor client
//!
//! Wraps the processor's authorization capture/void protocol: a
//! client-credentials exchange against the token endpoint before each
//! call, then the capture or void itself. Remote calls are
//! at-least-once: a timeout or transport failure means "outcome
//! unknown", so callers re-drive through the idempotent short-circuit
//! here, which is keyed on the locally persisted order status and
//! never re-issues a capture/void the ledger already recorded.

use reqwest::Client;
use serde_json::{json, Value};
use types::errors::PaymentError;
use types::order::{Order, OrderStatus};

const LIVE_BASE_URL: &str = "https://api-m.paypal.com";
const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

/// Processor credentials and endpoint selection
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    pub base_url: String,
    pub client_id: String,
    pub secret: String,
}

impl PayPalConfig {
    /// Resolve the API base URL for an environment name
    /// (`"sandbox"` or anything else = live)
    pub fn base_url_for_env(env: &str) -> &'static str {
        if env.eq_ignore_ascii_case("sandbox") {
            SANDBOX_BASE_URL
        } else {
            LIVE_BASE_URL
        }
    }
}

/// Result of a capture request
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Remote capture performed; payload is the processor's representation
    Captured(Value),
    /// Order already captured locally; remote call skipped
    AlreadyCaptured,
}

/// Result of a void request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidOutcome {
    /// Remote void performed
    Voided,
    /// Order already voided locally; remote call skipped
    AlreadyVoided,
}

pub struct PaymentOrchestrator {
    http: Client,
    config: PayPalConfig,
}

impl PaymentOrchestrator {
    pub fn new(http: Client, config: PayPalConfig) -> Self {
        Self { http, config }
    }

    /// Capture the order's authorization.
    ///
    /// Skips the remote call when the ledger already records the order
    /// as captured: the remote side guarantees no idempotency, so a
    /// second capture must never be issued.
    pub async fn capture(&self, order: &Order) -> Result<CaptureOutcome, PaymentError> {
        if order.status == OrderStatus::Captured {
            tracing::info!(id = %order.id, "capture short-circuit: already captured locally");
            return Ok(CaptureOutcome::AlreadyCaptured);
        }
        let token = self.access_token().await?;
        let url = format!(
            "{}/v2/payments/authorizations/{}/capture",
            self.config.base_url, order.paypal_auth_id
        );
        let res = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .header("Prefer", "return=representation")
            .json(&json!({}))
            .send()
            .await
            .map_err(unreachable_error)?;
        let status = res.status();
        let body: Value = res.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(PaymentError::RemoteOperationFailed(remote_message(
                &body,
                "capture failed",
            )));
        }
        tracing::info!(id = %order.id, auth = %order.paypal_auth_id, "authorization captured");
        Ok(CaptureOutcome::Captured(body))
    }

    /// Void the order's authorization, releasing the hold.
    ///
    /// Same short-circuit as `capture`, keyed on the local `voided`
    /// status.
    pub async fn void(&self, order: &Order) -> Result<VoidOutcome, PaymentError> {
        if order.status == OrderStatus::Voided {
            tracing::info!(id = %order.id, "void short-circuit: already voided locally");
            return Ok(VoidOutcome::AlreadyVoided);
        }
        let token = self.access_token().await?;
        let url = format!(
            "{}/v2/payments/authorizations/{}/void",
            self.config.base_url, order.paypal_auth_id
        );
        let res = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(unreachable_error)?;
        if !res.status().is_success() {
            let body: Value = res.json().await.unwrap_or(Value::Null);
            return Err(PaymentError::RemoteOperationFailed(remote_message(
                &body,
                "void failed",
            )));
        }
        tracing::info!(id = %order.id, auth = %order.paypal_auth_id, "authorization voided");
        Ok(VoidOutcome::Voided)
    }

    /// Client-credentials exchange, fetched per call (no caching)
    async fn access_token(&self) -> Result<String, PaymentError> {
        let url = format!("{}/v1/oauth2/token", self.config.base_url);
        let res = self
            .http
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.secret))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(unreachable_error)?;
        let status = res.status();
        let body: Value = res.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let message = body["error_description"]
                .as_str()
                .unwrap_or("token error")
                .to_string();
            return Err(PaymentError::AuthRejected(message));
        }
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| PaymentError::AuthRejected("missing access_token".to_string()))
    }
}

fn unreachable_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::Unreachable("request timed out".to_string())
    } else {
        PaymentError::Unreachable(e.to_string())
    }
}

fn remote_message(body: &Value, fallback: &str) -> String {
    body["message"].as_str().unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rust_decimal::Decimal;
    use types::ids::AuthorizationId;
    use types::order::OrderDraft;
    use types::slot::SlotIndex;

    fn orchestrator(server: &MockServer) -> PaymentOrchestrator {
        PaymentOrchestrator::new(
            Client::new(),
            PayPalConfig {
                base_url: server.base_url(),
                client_id: "client".to_string(),
                secret: "secret".to_string(),
            },
        )
    }

    fn order(status: OrderStatus) -> Order {
        let mut order = Order::new(
            OrderDraft {
                slot_index: SlotIndex::new(0).unwrap(),
                email: String::new(),
                description: String::new(),
                package: String::new(),
                price_label: String::new(),
                extras: Decimal::ZERO,
                total_eur: Decimal::new(100, 0),
                paypal_order_id: String::new(),
                paypal_auth_id: AuthorizationId::new("AUTH1"),
                payer_email: String::new(),
            },
            0,
        );
        order.status = status;
        order
    }

    fn token_mock(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(POST).path("/v1/oauth2/token");
            then.status(200)
                .json_body(serde_json::json!({"access_token": "tok_123"}));
        })
    }

    #[tokio::test]
    async fn test_capture_success() {
        let server = MockServer::start();
        let token = token_mock(&server);
        let capture = server.mock(|when, then| {
            when.method(POST)
                .path("/v2/payments/authorizations/AUTH1/capture")
                .header("authorization", "Bearer tok_123");
            then.status(201)
                .json_body(serde_json::json!({"id": "CAP1", "status": "COMPLETED"}));
        });

        let outcome = orchestrator(&server)
            .capture(&order(OrderStatus::Authorized))
            .await
            .unwrap();
        match outcome {
            CaptureOutcome::Captured(body) => assert_eq!(body["id"], "CAP1"),
            other => panic!("expected Captured, got {other:?}"),
        }
        token.assert();
        capture.assert();
    }

    #[tokio::test]
    async fn test_capture_already_captured_skips_remote_call() {
        let server = MockServer::start();
        let token = token_mock(&server);

        let outcome = orchestrator(&server)
            .capture(&order(OrderStatus::Captured))
            .await
            .unwrap();
        assert_eq!(outcome, CaptureOutcome::AlreadyCaptured);
        token.assert_hits(0);
    }

    #[tokio::test]
    async fn test_capture_remote_refusal_surfaces_message() {
        let server = MockServer::start();
        token_mock(&server);
        server.mock(|when, then| {
            when.method(POST)
                .path("/v2/payments/authorizations/AUTH1/capture");
            then.status(422)
                .json_body(serde_json::json!({"message": "AUTHORIZATION_VOIDED"}));
        });

        let err = orchestrator(&server)
            .capture(&order(OrderStatus::Authorized))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PaymentError::RemoteOperationFailed("AUTHORIZATION_VOIDED".to_string())
        );
    }

    #[tokio::test]
    async fn test_void_success() {
        let server = MockServer::start();
        token_mock(&server);
        let void = server.mock(|when, then| {
            when.method(POST)
                .path("/v2/payments/authorizations/AUTH1/void");
            then.status(204);
        });

        let outcome = orchestrator(&server)
            .void(&order(OrderStatus::Authorized))
            .await
            .unwrap();
        assert_eq!(outcome, VoidOutcome::Voided);
        void.assert();
    }

    #[tokio::test]
    async fn test_void_already_voided_skips_remote_call() {
        let server = MockServer::start();
        let token = token_mock(&server);

        let outcome = orchestrator(&server)
            .void(&order(OrderStatus::Voided))
            .await
            .unwrap();
        assert_eq!(outcome, VoidOutcome::AlreadyVoided);
        token.assert_hits(0);
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/oauth2/token");
            then.status(401)
                .json_body(serde_json::json!({"error_description": "Client Authentication failed"}));
        });

        let err = orchestrator(&server)
            .capture(&order(OrderStatus::Authorized))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PaymentError::AuthRejected("Client Authentication failed".to_string())
        );
    }
}
