// SPDX-License-Identifier: Apache-2.0

//! Bounded-concurrency unary export client for shard-routed telemetry.
//!
//! The client accepts pre-encoded telemetry batches and sends each one to a
//! remote collector with a unary `Export` call. A fixed-size pool of worker
//! tasks bounds the number of in-flight calls; a bounded FIFO queue between
//! producers and workers is the sole backpressure mechanism. Per-call
//! failures are classified as retryable or fatal from the `RetryInfo` status
//! detail and reported through a caller-supplied [`ExportObserver`] — the
//! client never resubmits a batch itself.

mod client;
mod config;
mod error;
mod observer;
pub mod proto;
mod transport;

pub use client::UnaryExportClient;
pub use config::ExportClientConfig;
pub use error::Error;
pub use observer::{ExportObserver, SendFailureKind};
pub use transport::{ExportTransport, GrpcTransport};
