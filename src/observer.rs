// SPDX-License-Identifier: Apache-2.0

//! Caller-supplied outcome handlers for the concurrent send path.

use std::time::Duration;

use opentelemetry_proto::tonic::trace::v1::Span;

use crate::proto::{EncodedRecord, ExportResponse};

/// Classification of a failed send, as reported to the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendFailureKind {
    /// The server signalled a transient condition: the batch may succeed if
    /// resubmitted after `retry_after`. The client does not resubmit;
    /// retry policy (backoff, re-encoding, max attempts) belongs to the
    /// caller.
    Retryable {
        /// Server-suggested delay before resubmitting.
        retry_after: Duration,
    },

    /// The failure carried no usable retry signal. The batch has been
    /// dropped by the client.
    NonRetryable,
}

impl SendFailureKind {
    /// Returns true if the failure is eligible for retry by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SendFailureKind::Retryable { .. })
    }
}

/// Receives the outcome of every dispatched send.
///
/// Workers invoke these methods concurrently and in no particular order
/// relative to the `send` calls that queued the requests; implementations
/// must be safe to call from multiple workers simultaneously. Each record
/// hand-off carries the original spans the record was encoded from, so the
/// caller can act on the uncoded items rather than the wire form.
pub trait ExportObserver: Send + Sync + 'static {
    /// The record was accepted by the server.
    fn on_send_response(
        &self,
        record: EncodedRecord,
        original_items: Vec<Span>,
        response: ExportResponse,
    );

    /// The record could not be delivered. `kind` tells the caller whether
    /// resubmitting is worthwhile.
    fn on_send_fail(
        &self,
        record: EncodedRecord,
        original_items: Vec<Span>,
        kind: SendFailureKind,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_classification() {
        let retryable = SendFailureKind::Retryable {
            retry_after: Duration::from_secs(5),
        };
        assert!(retryable.is_retryable());
        assert!(!SendFailureKind::NonRetryable.is_retryable());
    }
}
