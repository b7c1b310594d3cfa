//! Stdin/stdout JSON bridge for the host command channel.
//!
//! Reads newline-delimited JSON `CommandEnvelope` messages from stdin,
//! dispatches them through the `HostCommandServer` router, and writes
//! `ResponseEnvelope` messages as newline-delimited JSON to stdout.
//! Responses are written as commands complete, so they may arrive out of
//! order; the host correlates them by `request_id`.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use crate::error::{IntegrationError, Result};
use crate::host::channel::{HostCommandClient, command_channel};
use crate::host::contract::{CommandEnvelope, CommandName, ResponseEnvelope};
use crate::host::tasks::InFlight;
use crate::integration::Integration;
use cse_search::SearchTransport;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;

/// Default request channel capacity for the stdio bridge.
const REQUEST_CAPACITY: usize = 64;

type SharedWriter<W> = Arc<Mutex<BufWriter<W>>>;

/// Run the JSON bridge over the process's stdin and stdout.
pub async fn run_stdio_bridge<T: SearchTransport + 'static>(
    integration: Integration<T>,
) -> Result<()> {
    run_bridge(
        integration,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Run the bridge until the reader closes or a `runtime.stop` command is
/// received.
///
/// On `runtime.stop`, every in-flight command is allowed to finish and
/// write its response before the stop acknowledgement is written.
pub async fn run_bridge<T, R, W>(
    integration: Integration<T>,
    reader: R,
    writer: W,
) -> Result<()>
where
    T: SearchTransport + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (client, server) = command_channel(REQUEST_CAPACITY, integration);
    let writer = Arc::new(Mutex::new(BufWriter::new(writer)));

    let server_handle = tokio::spawn(async move {
        server.run().await;
    });

    let reader_result = run_reader(client, reader, writer).await;

    // The client was dropped by `run_reader`, closing the request channel.
    if let Err(e) = server_handle.await {
        tracing::error!(error = %e, "host command server task failed");
    }

    reader_result
}

async fn run_reader<R, W>(
    client: HostCommandClient,
    mut reader: R,
    writer: SharedWriter<W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut in_flight = InFlight::new();
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| IntegrationError::Channel(format!("failed to read from stdin: {e}")))?;

        if bytes_read == 0 {
            tracing::info!("stdin closed (EOF); shutting down stdio bridge");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let envelope: CommandEnvelope = match serde_json::from_str(trimmed) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    raw_line = %trimmed,
                    "failed to parse command envelope from stdin"
                );
                let response = ResponseEnvelope::error(
                    "parse-error",
                    format!("failed to parse command envelope: {e}"),
                );
                write_response(&writer, &response).await?;
                continue;
            }
        };

        if let Err(e) = envelope.validate() {
            tracing::warn!(
                request_id = %envelope.request_id,
                error = %e,
                "rejected command envelope"
            );
            let response = ResponseEnvelope::error(envelope.request_id.clone(), e.to_string());
            write_response(&writer, &response).await?;
            continue;
        }

        if envelope.command == CommandName::RuntimeStop {
            tracing::info!(
                in_flight = in_flight.len(),
                "runtime.stop received; draining in-flight commands"
            );
            in_flight.drain().await;
            let response = dispatch(&client, envelope).await;
            write_response(&writer, &response).await?;
            break;
        }

        let client = client.clone();
        let writer = Arc::clone(&writer);
        in_flight.spawn(async move {
            let response = dispatch(&client, envelope).await;
            write_response(&writer, &response).await
        });
    }

    in_flight.drain().await;
    Ok(())
}

async fn dispatch(client: &HostCommandClient, envelope: CommandEnvelope) -> ResponseEnvelope {
    let request_id = envelope.request_id.clone();
    match client.send(envelope).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "host command dispatch failed");
            ResponseEnvelope::error(request_id, format!("dispatch failed: {e}"))
        }
    }
}

async fn write_response<W>(writer: &SharedWriter<W>, response: &ResponseEnvelope) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(response).map_err(|e| {
        IntegrationError::Protocol(format!("failed to serialize response envelope: {e}"))
    })?;
    let mut w = writer.lock().await;
    write_line(&mut w, &json).await
}

/// Write a single JSON line to the buffered writer and flush.
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut BufWriter<W>, json: &str) -> Result<()> {
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| IntegrationError::Channel(format!("failed to write to stdout: {e}")))?;
    writer.write_all(b"\n").await.map_err(|e| {
        IntegrationError::Channel(format!("failed to write newline to stdout: {e}"))
    })?;
    writer
        .flush()
        .await
        .map_err(|e| IntegrationError::Channel(format!("failed to flush stdout: {e}")))?;
    Ok(())
}
