//! Host command channel and router.
//!
//! [`HostCommandClient`] sends validated envelopes to a [`HostCommandServer`]
//! over an mpsc channel and awaits the response on a oneshot. The server
//! runs each command on its own task, so a slow lookup batch does not hold
//! up pings or option validation.

use crate::error::{IntegrationError, Result};
use crate::host::contract::{
    CONTRACT_VERSION, CommandEnvelope, CommandName, LookupPayload, ResponseEnvelope,
    ValidateOptionsPayload,
};
use crate::host::tasks::InFlight;
use crate::integration::Integration;
use cse_search::SearchTransport;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

struct HostCommandRequest {
    envelope: CommandEnvelope,
    response_tx: oneshot::Sender<ResponseEnvelope>,
}

#[derive(Clone)]
pub struct HostCommandClient {
    request_tx: mpsc::Sender<HostCommandRequest>,
}

impl HostCommandClient {
    pub async fn send(&self, envelope: CommandEnvelope) -> Result<ResponseEnvelope> {
        envelope.validate().map_err(|e| {
            IntegrationError::Protocol(format!(
                "invalid host command envelope {}: {}",
                envelope.request_id, e
            ))
        })?;

        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(HostCommandRequest {
                envelope,
                response_tx,
            })
            .await
            .map_err(|e| {
                IntegrationError::Channel(format!("failed to send host command request: {e}"))
            })?;

        response_rx
            .await
            .map_err(|e| IntegrationError::Channel(format!("host command response dropped: {e}")))
    }
}

pub struct HostCommandServer<T> {
    request_rx: mpsc::Receiver<HostCommandRequest>,
    integration: Arc<Integration<T>>,
}

#[must_use]
pub fn command_channel<T: SearchTransport + 'static>(
    request_capacity: usize,
    integration: Integration<T>,
) -> (HostCommandClient, HostCommandServer<T>) {
    let (request_tx, request_rx) = mpsc::channel(request_capacity.max(1));
    (
        HostCommandClient { request_tx },
        HostCommandServer {
            request_rx,
            integration: Arc::new(integration),
        },
    )
}

impl<T: SearchTransport + 'static> HostCommandServer<T> {
    /// Serve requests until every client is dropped, then wait for
    /// in-flight commands to finish.
    pub async fn run(mut self) {
        let mut in_flight = InFlight::new();
        while let Some(request) = self.request_rx.recv().await {
            let integration = Arc::clone(&self.integration);
            in_flight.spawn(async move {
                let response = route(&integration, &request.envelope).await;
                request.response_tx.send(response).map_err(|_| {
                    IntegrationError::Channel("host command client went away".into())
                })
            });
        }
        in_flight.drain().await;
    }
}

/// Route a command envelope to the integration.
///
/// Routing failures (malformed payloads, invalid options) become error
/// responses addressed to the same request.
pub async fn route<T: SearchTransport>(
    integration: &Integration<T>,
    envelope: &CommandEnvelope,
) -> ResponseEnvelope {
    let request_id = envelope.request_id.clone();
    match dispatch(integration, envelope).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                command = envelope.command.as_str(),
                error = %e,
                "host command rejected"
            );
            ResponseEnvelope::error(request_id, e.to_string())
        }
    }
}

async fn dispatch<T: SearchTransport>(
    integration: &Integration<T>,
    envelope: &CommandEnvelope,
) -> Result<ResponseEnvelope> {
    let request_id = envelope.request_id.clone();
    match envelope.command {
        CommandName::HostPing => Ok(ResponseEnvelope::ok(
            request_id,
            serde_json::json!({"pong": true}),
        )),
        CommandName::HostVersion => Ok(ResponseEnvelope::ok(
            request_id,
            serde_json::json!({
                "contract_version": CONTRACT_VERSION,
                "channel": "cse_host_v1",
                "version": env!("CARGO_PKG_VERSION"),
            }),
        )),
        CommandName::IntegrationDescribe => {
            Ok(ResponseEnvelope::ok(request_id, integration.describe()))
        }
        CommandName::IntegrationLookup => handle_lookup(integration, envelope).await,
        CommandName::IntegrationValidateOptions => {
            let payload: ValidateOptionsPayload = parse_payload(envelope)?;
            let errors = integration.validate_options(&payload.options);
            Ok(ResponseEnvelope::ok(
                request_id,
                serde_json::json!({"errors": errors}),
            ))
        }
        CommandName::RuntimeStop => Ok(ResponseEnvelope::ok(
            request_id,
            serde_json::json!({"stopping": true}),
        )),
    }
}

async fn handle_lookup<T: SearchTransport>(
    integration: &Integration<T>,
    envelope: &CommandEnvelope,
) -> Result<ResponseEnvelope> {
    let payload: LookupPayload = parse_payload(envelope)?;
    let params = payload.options.to_search_params()?;

    match integration.do_lookup(payload.entities, &params).await {
        Ok(results) => Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            serde_json::json!({"results": results}),
        )),
        Err(err) => {
            let detail = err.detail.clone();
            let payload = serde_json::to_value(&err).map_err(|e| {
                IntegrationError::Protocol(format!("failed to serialize lookup error: {e}"))
            })?;
            Ok(ResponseEnvelope::failure(
                envelope.request_id.clone(),
                detail,
                payload,
            ))
        }
    }
}

fn parse_payload<P: serde::de::DeserializeOwned>(envelope: &CommandEnvelope) -> Result<P> {
    serde_json::from_value(envelope.payload.clone()).map_err(|e| {
        IntegrationError::Protocol(format!(
            "invalid payload for {}: {e}",
            envelope.command.as_str()
        ))
    })
}
