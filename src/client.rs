// SPDX-License-Identifier: Apache-2.0

//! The bounded-concurrency unary export client.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry_proto::tonic::trace::v1::Span;
use tokio_util::sync::CancellationToken;
use tonic_types::StatusExt;
use tracing::{error, info};

use crate::config::ExportClientConfig;
use crate::error::Result;
use crate::observer::{ExportObserver, SendFailureKind};
use crate::proto::{EncodedRecord, ExportRequest, ShardDefinition, ShardingConfig};
use crate::transport::{ExportTransport, GrpcTransport};

/// One queued batch: the ready-to-send record with its destination shard,
/// together with the original spans the record was encoded from. The two
/// describe the same logical batch and travel together so a failure can be
/// reported on the uncoded items.
struct PendingRequest {
    record: EncodedRecord,
    shard: ShardDefinition,
    original_items: Vec<Span>,
}

/// Client that exports encoded records with multiple concurrent unary calls.
///
/// [`connect`](UnaryExportClient::connect) establishes the channel and
/// starts the worker pool; [`send`](UnaryExportClient::send) queues one
/// batch and suspends only for backpressure; outcomes arrive through the
/// [`ExportObserver`] passed at connect time, concurrently and in no
/// particular order.
pub struct UnaryExportClient {
    transport: Arc<dyn ExportTransport>,
    queue_tx: flume::Sender<PendingRequest>,
    shutdown: CancellationToken,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl UnaryExportClient {
    /// Connect to the collector and start the worker pool.
    ///
    /// Resolves once the channel is ready or failed. Triggering `cancel`
    /// while the connection is still being established resolves with
    /// [`Error::ConnectCancelled`](crate::Error::ConnectCancelled). On
    /// success, `config.send_concurrency` workers are running and the send
    /// queue holds [`effective_queue_capacity`] requests before `send`
    /// begins to suspend.
    ///
    /// [`effective_queue_capacity`]: ExportClientConfig::effective_queue_capacity
    pub async fn connect(
        config: ExportClientConfig,
        observer: Arc<dyn ExportObserver>,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        config.validate()?;
        let transport = GrpcTransport::connect(&config.endpoint, cancel).await?;
        info!(
            endpoint = %config.endpoint,
            send_concurrency = config.send_concurrency,
            "connected shard export client"
        );
        Ok(Self::with_transport(config, observer, Arc::new(transport)))
    }

    /// Start the worker pool over an already-established transport.
    ///
    /// This is the seam for substituting a custom [`ExportTransport`];
    /// `connect` is `GrpcTransport::connect` followed by this.
    pub fn with_transport(
        config: ExportClientConfig,
        observer: Arc<dyn ExportObserver>,
        transport: Arc<dyn ExportTransport>,
    ) -> Self {
        let (queue_tx, queue_rx) = flume::bounded(config.effective_queue_capacity());
        let shutdown = CancellationToken::new();

        let workers = (0..config.send_concurrency)
            .map(|_| {
                let transport = Arc::clone(&transport);
                let observer = Arc::clone(&observer);
                let queue_rx = queue_rx.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(worker_loop(transport, observer, queue_rx, shutdown))
            })
            .collect();

        Self {
            transport,
            queue_tx,
            shutdown,
            workers,
        }
    }

    /// Queue one encoded record for delivery.
    ///
    /// `record` must be encoded for `shard` (its partition key must fall in
    /// the shard's hash-key range) and `original_items` must be the spans
    /// the record was encoded from; neither is checked here, but outcome
    /// callbacks report whatever was passed. A full queue suspends the
    /// caller until a worker frees a slot — that is backpressure, not an
    /// error. The delivery outcome is reported only through the observer.
    pub async fn send(
        &self,
        record: EncodedRecord,
        original_items: Vec<Span>,
        shard: ShardDefinition,
    ) {
        let pending = PendingRequest {
            record,
            shard,
            original_items,
        };

        // The queue only disconnects once every worker has exited, i.e.
        // after shutdown. Sends past that point are dropped silently, like
        // requests abandoned in the queue.
        let _ = self.queue_tx.send_async(pending).await;
    }

    /// Fetch the sharding configuration from the server.
    ///
    /// A single unary call outside the concurrent send path: no queueing,
    /// no classification, errors are returned directly.
    pub async fn sharding_config(&self) -> Result<ShardingConfig> {
        Ok(self.transport.sharding_config().await?)
    }

    /// Signal all workers to stop picking up queued work.
    ///
    /// Returns immediately. Requests already queued but not yet claimed by
    /// a worker are abandoned without a callback; calls already in flight
    /// run to completion and their callbacks still fire afterwards.
    /// Shutdown trades completeness for bounded latency.
    pub fn shutdown(&self) {
        info!("shutting down shard export client");
        self.shutdown.cancel();
    }

    /// Number of workers the pool was started with.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

/// One worker: repeatedly claim a pending request and run its unary call to
/// completion. At most one request is processed at a time, so the pool as a
/// whole bounds in-flight calls to the worker count.
async fn worker_loop(
    transport: Arc<dyn ExportTransport>,
    observer: Arc<dyn ExportObserver>,
    queue_rx: flume::Receiver<PendingRequest>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            // Shutdown is checked first: once it fires, no further request
            // is claimed even if the queue has items ready.
            biased;

            _ = shutdown.cancelled() => return,

            pending = queue_rx.recv_async() => match pending {
                Ok(pending) => dispatch(&*transport, &*observer, pending).await,
                // All senders dropped: the client itself is gone.
                Err(_) => return,
            },
        }
    }
}

/// Perform one unary export call and report the outcome.
///
/// Failures are classified here, at the edge, because only the gRPC status
/// carries the structured retry detail. A `RetryInfo` with a strictly
/// positive delay marks the batch retryable; anything else drops it. The
/// caller owns retry policy, so the delay is surfaced, never slept on.
async fn dispatch(
    transport: &dyn ExportTransport,
    observer: &dyn ExportObserver,
    pending: PendingRequest,
) {
    let request = ExportRequest {
        record: Some(pending.record.clone()),
        shard: Some(pending.shard),
    };

    match transport.export(request).await {
        Ok(response) => {
            observer.on_send_response(pending.record, pending.original_items, response);
        }
        Err(status) => match retry_delay(&status) {
            Some(retry_after) => {
                observer.on_send_fail(
                    pending.record,
                    pending.original_items,
                    SendFailureKind::Retryable { retry_after },
                );
            }
            None => {
                error!(error = %status, "cannot send record batch, dropping it");
                observer.on_send_fail(
                    pending.record,
                    pending.original_items,
                    SendFailureKind::NonRetryable,
                );
            }
        },
    }
}

/// Extract the server-suggested retry delay from a failed call, if the
/// status carries a `RetryInfo` detail with a strictly positive delay.
fn retry_delay(status: &tonic::Status) -> Option<Duration> {
    status
        .get_details_retry_info()
        .and_then(|info| info.retry_delay)
        .filter(|delay| *delay > Duration::ZERO)
}
