//! Client for the CDM collector's `cdm_protobuf.Routes` gRPC service.

use crate::common::{DomainError, DomainResult};
use crate::domains::simulation::{Measurement, TelemetryCollector};
use async_trait::async_trait;
use std::time::Duration;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};

const REGISTER_ANTENNA_PATH: &str = "/cdm_protobuf.Routes/registerAntennaRoute";
const LOG_MEASUREMENT_PATH: &str = "/cdm_protobuf.Routes/logMeasurementRoute";

/// Upper bound for connecting plus one call. A hung collector turns into a
/// transport error, which the registration backoff then retries.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, PartialEq, prost::Message)]
pub struct RegisterAntennaRequest {
    #[prost(double, tag = "1")]
    pub x: f64,
    #[prost(double, tag = "2")]
    pub y: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RegisterAntennaReply {
    #[prost(int32, tag = "1")]
    pub aid: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LogMeasurementRequest {
    #[prost(string, tag = "1")]
    pub identifier: String,
    #[prost(int64, tag = "2")]
    pub timestamp: i64,
    #[prost(int32, tag = "3")]
    pub aid: i32,
    #[prost(double, tag = "4")]
    pub signal_strength: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LogMeasurementReply {}

impl TryFrom<&Measurement> for LogMeasurementRequest {
    type Error = DomainError;

    fn try_from(m: &Measurement) -> Result<Self, Self::Error> {
        let aid = i32::try_from(m.antenna_id).map_err(|_| {
            DomainError::invalid_argument(format!("antenna id {} does not fit the wire format", m.antenna_id))
        })?;
        Ok(Self {
            identifier: m.identifier.clone(),
            timestamp: m.timestamp_ms,
            aid,
            signal_strength: m.signal_strength,
        })
    }
}

pub struct GrpcCollector {
    channel: Channel,
    request_timeout: Duration,
}

impl GrpcCollector {
    /// Builds a lazily connecting client for `host:port`. Connection errors
    /// surface on the first call, so registration retries cover an
    /// unreachable collector.
    pub fn connect_lazy(host: &str, port: u16) -> DomainResult<Self> {
        Self::connect_lazy_with_timeout(host, port, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn connect_lazy_with_timeout(host: &str, port: u16, request_timeout: Duration) -> DomainResult<Self> {
        let url = format!("http://{}:{}", host, port);
        let endpoint = Endpoint::from_shared(url.clone())
            .map_err(|e| DomainError::invalid_config(format!("invalid collector address {}: {}", url, e)))?
            .connect_timeout(request_timeout)
            .timeout(request_timeout);
        Ok(Self {
            channel: endpoint.connect_lazy(),
            request_timeout,
        })
    }

    async fn unary<Req, Reply>(&self, path: &'static str, request: Req) -> DomainResult<Reply>
    where
        Req: prost::Message + Send + Sync + 'static,
        Reply: prost::Message + Default + Send + Sync + 'static,
    {
        tokio::time::timeout(self.request_timeout, self.call(path, request))
            .await
            .map_err(|_| {
                DomainError::Transport(format!("{}: no reply within {} ms", path, self.request_timeout.as_millis()))
            })?
    }

    async fn call<Req, Reply>(&self, path: &'static str, request: Req) -> DomainResult<Reply>
    where
        Req: prost::Message + Send + Sync + 'static,
        Reply: prost::Message + Default + Send + Sync + 'static,
    {
        let mut client = tonic::client::Grpc::new(self.channel.clone());
        client
            .ready()
            .await
            .map_err(|e| DomainError::Transport(format!("collector not ready: {}", e)))?;

        let codec: ProstCodec<Req, Reply> = ProstCodec::default();
        let response = client
            .unary(tonic::Request::new(request), PathAndQuery::from_static(path), codec)
            .await
            .map_err(|status| DomainError::Transport(format!("{}: {}", path, status)))?;
        Ok(response.into_inner())
    }
}

#[async_trait]
impl TelemetryCollector for GrpcCollector {
    async fn register_antenna(&self, x: f64, y: f64) -> DomainResult<i64> {
        let reply: RegisterAntennaReply = self
            .unary(REGISTER_ANTENNA_PATH, RegisterAntennaRequest { x, y })
            .await?;
        if reply.aid == 0 {
            return Err(DomainError::Transport("registration reply carried no antenna id".to_string()));
        }
        Ok(reply.aid as i64)
    }

    async fn log_measurement(&self, measurement: Measurement) -> DomainResult<()> {
        let request = LogMeasurementRequest::try_from(&measurement)?;
        let _: LogMeasurementReply = self.unary(LOG_MEASUREMENT_PATH, request).await?;
        Ok(())
    }
}
