// SPDX-License-Identifier: Apache-2.0

//! Errors for the shard export client.

/// Errors that can occur when configuring or connecting the client.
///
/// Per-request send failures never show up here. They are recovered inside
/// the worker pool and reported through the
/// [`ExportObserver`](crate::ExportObserver) instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The client configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// Establishing the gRPC channel failed.
    #[error("transport error: {source}")]
    Transport {
        /// Underlying transport error.
        #[from]
        source: tonic::transport::Error,
    },

    /// A blocked connect attempt was cancelled through its cancellation
    /// token before the channel became ready.
    #[error("connection establishment was cancelled")]
    ConnectCancelled,

    /// A unary call outside the concurrent send path failed.
    #[error("rpc error: {source}")]
    Rpc {
        /// Status returned by the server or synthesized by the transport.
        #[from]
        source: tonic::Status,
    },
}

impl Error {
    /// Create an invalid-configuration error.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
