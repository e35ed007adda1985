//! Typed client for `memo.MemoService` speaking the Connect unary protocol.

use common::{
    Code, Codec, CodecError, CreateMemoRequest, CreateMemoResponse, ErrorBody, GetMemoRequest,
    GetMemoResponse, ListMemosRequest, ListMemosResponse, Memo, UpdateMemoRequest,
    UpdateMemoResponse, WireMessage,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{code}: {message}")]
    Rpc { code: Code, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("response carried no memo")]
    MissingMemo,
}

impl ClientError {
    pub fn code(&self) -> Option<Code> {
        match self {
            ClientError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Builds the error for a non-2xx reply. Bodies that are not Connect errors
/// fall back to the code implied by the HTTP status.
fn rpc_error(status: u16, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { code, message }) => ClientError::Rpc { code, message },
        Err(_) => ClientError::Rpc {
            code: Code::from_http_status(status),
            message: String::from_utf8_lossy(body).trim().to_owned(),
        },
    }
}

#[derive(Clone, Debug)]
pub struct MemoClient {
    http: reqwest::Client,
    base_url: String,
    codec: Codec,
}

impl MemoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            codec: Codec::default(),
        }
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Swap in a configured client, e.g. one built with
    /// `http2_prior_knowledge()` to talk h2c.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    async fn call<Req, Res>(&self, path: &str, request: &Req) -> Result<Res, ClientError>
    where
        Req: WireMessage,
        Res: WireMessage,
    {
        let body = self.codec.encode(request)?;
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, self.codec.content_type())
            .header(common::PROTOCOL_VERSION_HEADER, common::PROTOCOL_VERSION)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if status.is_success() {
            Ok(self.codec.decode(&bytes)?)
        } else {
            Err(rpc_error(status.as_u16(), &bytes))
        }
    }

    pub async fn list_memos(&self, owner_id: &str) -> Result<Vec<Memo>, ClientError> {
        let response: ListMemosResponse = self
            .call(
                common::LIST_MEMOS_PATH,
                &ListMemosRequest {
                    owner_id: owner_id.to_owned(),
                },
            )
            .await?;
        Ok(response.memos)
    }

    pub async fn get_memo(&self, owner_id: &str, memo_id: &str) -> Result<Memo, ClientError> {
        let response: GetMemoResponse = self
            .call(
                common::GET_MEMO_PATH,
                &GetMemoRequest {
                    owner_id: owner_id.to_owned(),
                    memo_id: memo_id.to_owned(),
                },
            )
            .await?;
        response.memo.ok_or(ClientError::MissingMemo)
    }

    pub async fn create_memo(&self, user_id: &str, content: &str) -> Result<Memo, ClientError> {
        let response: CreateMemoResponse = self
            .call(
                common::CREATE_MEMO_PATH,
                &CreateMemoRequest {
                    user_id: user_id.to_owned(),
                    content: content.to_owned(),
                },
            )
            .await?;
        response.memo.ok_or(ClientError::MissingMemo)
    }

    pub async fn update_memo(
        &self,
        id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<Memo, ClientError> {
        let response: UpdateMemoResponse = self
            .call(
                common::UPDATE_MEMO_PATH,
                &UpdateMemoRequest {
                    id: id.to_owned(),
                    user_id: user_id.to_owned(),
                    content: content.to_owned(),
                },
            )
            .await?;
        response.memo.ok_or(ClientError::MissingMemo)
    }
}
