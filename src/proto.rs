// SPDX-License-Identifier: Apache-2.0

//! Wire types and gRPC client stub for the `shardexport.v1.ShardExport`
//! service.
//!
//! The message types and the client are written by hand in the shape
//! `tonic-build` emits, so swapping in generated code later is a drop-in
//! change that needs no edits elsewhere in the crate.

/// A batch of telemetry encoded into a single wire record.
///
/// The record must be encoded for the shard whose hash-key range contains
/// `partition_key`; this crate passes both through without interpreting
/// them.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EncodedRecord {
    /// Partition key the record was encoded for.
    #[prost(string, tag = "1")]
    pub partition_key: ::prost::alloc::string::String,

    /// The encoded payload.
    #[prost(bytes = "vec", tag = "2")]
    pub data: ::prost::alloc::vec::Vec<u8>,

    /// Number of telemetry items summarized into the payload.
    #[prost(uint64, tag = "3")]
    pub item_count: u64,

    /// Size of the payload before compression, in bytes.
    #[prost(uint64, tag = "4")]
    pub uncompressed_size: u64,
}

/// Routing metadata for one partition of the destination.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShardDefinition {
    /// Opaque shard identifier assigned by the server.
    #[prost(string, tag = "1")]
    pub shard_id: ::prost::alloc::string::String,

    /// Inclusive start of the shard's hash-key range.
    #[prost(bytes = "vec", tag = "2")]
    pub hash_key_start: ::prost::alloc::vec::Vec<u8>,

    /// Inclusive end of the shard's hash-key range.
    #[prost(bytes = "vec", tag = "3")]
    pub hash_key_end: ::prost::alloc::vec::Vec<u8>,
}

/// The full set of shards records may be routed to.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShardingConfig {
    /// All shards currently accepting records.
    #[prost(message, repeated, tag = "1")]
    pub shards: ::prost::alloc::vec::Vec<ShardDefinition>,
}

/// Request for the unary `Export` call.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExportRequest {
    /// The encoded record to deliver.
    #[prost(message, optional, tag = "1")]
    pub record: ::core::option::Option<EncodedRecord>,

    /// The shard the record was encoded for.
    #[prost(message, optional, tag = "2")]
    pub shard: ::core::option::Option<ShardDefinition>,
}

/// Response of the unary `Export` call. Opaque to this crate beyond being
/// handed to the success callback.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExportResponse {
    /// Server-assigned identifier of the accepted record.
    #[prost(string, tag = "1")]
    pub record_id: ::prost::alloc::string::String,
}

/// Request for the unary `GetShardingConfig` call. Carries no fields.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ConfigRequest {}

/// Client stub for the `shardexport.v1.ShardExport` service.
pub mod shard_export_client {
    #![allow(unused_variables, dead_code, missing_docs)]

    use tonic::codegen::http;

    /// Unary client for the `shardexport.v1.ShardExport` service.
    #[derive(Debug, Clone)]
    pub struct ShardExportClient {
        inner: tonic::client::Grpc<tonic::transport::Channel>,
    }

    impl ShardExportClient {
        /// Create a client over an established channel.
        pub fn new(channel: tonic::transport::Channel) -> Self {
            Self {
                inner: tonic::client::Grpc::new(channel),
            }
        }

        /// Deliver one encoded record to the shard it was encoded for.
        pub async fn export(
            &mut self,
            request: impl tonic::IntoRequest<super::ExportRequest>,
        ) -> std::result::Result<tonic::Response<super::ExportResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {e}"))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path =
                http::uri::PathAndQuery::from_static("/shardexport.v1.ShardExport/Export");
            self.inner.unary(request.into_request(), path, codec).await
        }

        /// Fetch the current sharding configuration.
        pub async fn get_sharding_config(
            &mut self,
            request: impl tonic::IntoRequest<super::ConfigRequest>,
        ) -> std::result::Result<tonic::Response<super::ShardingConfig>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {e}"))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/shardexport.v1.ShardExport/GetShardingConfig",
            );
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_export_request_round_trip() {
        let request = ExportRequest {
            record: Some(EncodedRecord {
                partition_key: "pk-17".to_string(),
                data: vec![1, 2, 3],
                item_count: 3,
                uncompressed_size: 64,
            }),
            shard: Some(ShardDefinition {
                shard_id: "shard-1".to_string(),
                hash_key_start: vec![0x00],
                hash_key_end: vec![0xff],
            }),
        };

        let bytes = request.encode_to_vec();
        let decoded = ExportRequest::decode(bytes.as_slice()).expect("decode");
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_config_request_is_empty_on_the_wire() {
        assert!(ConfigRequest::default().encode_to_vec().is_empty());
    }
}
