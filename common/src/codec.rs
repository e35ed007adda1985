use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid json message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid protobuf message: {0}")]
    Proto(#[from] prost::DecodeError),
}

/// A message that travels over either codec.
pub trait WireMessage: prost::Message + Default + Serialize + DeserializeOwned {}

impl<M> WireMessage for M where M: prost::Message + Default + Serialize + DeserializeOwned {}

/// Message encoding negotiated through `Content-Type`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Codec {
    #[default]
    Json,
    Proto,
}

impl Codec {
    pub const JSON_CONTENT_TYPE: &'static str = "application/json";
    pub const PROTO_CONTENT_TYPE: &'static str = "application/proto";

    /// Parameters (`; charset=utf-8`) and case are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Codec> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(Self::JSON_CONTENT_TYPE) {
            Some(Codec::Json)
        } else if essence.eq_ignore_ascii_case(Self::PROTO_CONTENT_TYPE) {
            Some(Codec::Proto)
        } else {
            None
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Codec::Json => Self::JSON_CONTENT_TYPE,
            Codec::Proto => Self::PROTO_CONTENT_TYPE,
        }
    }

    pub fn encode<M: WireMessage>(self, message: &M) -> Result<Vec<u8>, CodecError> {
        match self {
            Codec::Json => Ok(serde_json::to_vec(message)?),
            Codec::Proto => Ok(message.encode_to_vec()),
        }
    }

    pub fn decode<M: WireMessage>(self, bytes: &[u8]) -> Result<M, CodecError> {
        match self {
            Codec::Json => Ok(serde_json::from_slice(bytes)?),
            Codec::Proto => Ok(M::decode(bytes)?),
        }
    }
}
