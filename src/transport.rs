// SPDX-License-Identifier: Apache-2.0

//! Transport seam between the worker pool and the wire.
//!
//! [`ExportTransport`] is the trait the dispatcher calls through;
//! [`GrpcTransport`] is the production implementation over a tonic channel.
//! Tests substitute their own implementations to drive the pool without a
//! running server.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tonic::transport::Endpoint;

use crate::error::{Error, Result};
use crate::proto::shard_export_client::ShardExportClient;
use crate::proto::{ConfigRequest, ExportRequest, ExportResponse, ShardingConfig};

/// Unary calls against the collector.
///
/// Implementations are shared by all workers and must tolerate concurrent
/// calls.
#[async_trait]
pub trait ExportTransport: Send + Sync + 'static {
    /// Deliver one encoded record. A `Status` error is classified by the
    /// dispatcher, not here.
    async fn export(
        &self,
        request: ExportRequest,
    ) -> std::result::Result<ExportResponse, tonic::Status>;

    /// Fetch the current sharding configuration.
    async fn sharding_config(&self) -> std::result::Result<ShardingConfig, tonic::Status>;
}

/// Production transport over an established tonic channel.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    client: ShardExportClient,
}

impl GrpcTransport {
    /// Open a channel to `endpoint`, waiting until it is ready.
    ///
    /// The wait reacts to `cancel`: triggering the token while the
    /// connection is still being established resolves this call with
    /// [`Error::ConnectCancelled`].
    pub async fn connect(endpoint: &str, cancel: &CancellationToken) -> Result<Self> {
        let endpoint = Endpoint::from_shared(endpoint.to_string())?;

        let channel = tokio::select! {
            // Cancellation wins over a connect attempt that resolves in the
            // same instant.
            biased;
            _ = cancel.cancelled() => return Err(Error::ConnectCancelled),
            channel = endpoint.connect() => channel?,
        };

        Ok(Self {
            client: ShardExportClient::new(channel),
        })
    }
}

#[async_trait]
impl ExportTransport for GrpcTransport {
    async fn export(
        &self,
        request: ExportRequest,
    ) -> std::result::Result<ExportResponse, tonic::Status> {
        // Stubs take &mut self for request plumbing; the underlying channel
        // multiplexes, so a per-call clone is the supported sharing model.
        let mut client = self.client.clone();
        client.export(request).await.map(|r| r.into_inner())
    }

    async fn sharding_config(&self) -> std::result::Result<ShardingConfig, tonic::Status> {
        let mut client = self.client.clone();
        client
            .get_sharding_config(ConfigRequest {})
            .await
            .map(|r| r.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_reacts_to_cancellation() {
        // A non-routable address keeps the connect attempt pending long
        // enough for the token to win.
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = GrpcTransport::connect("http://10.255.255.1:4317", &cancel).await;
        assert!(matches!(result, Err(Error::ConnectCancelled)));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_endpoint() {
        let cancel = CancellationToken::new();
        let result = GrpcTransport::connect("not a uri", &cancel).await;
        assert!(matches!(result, Err(Error::Transport { .. })));
    }
}
