use futures_util::StreamExt as _;

/// Largest request body a procedure accepts, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MessageLimit(pub(crate) usize);

impl Default for MessageLimit {
    fn default() -> Self {
        MessageLimit(4 * 1024 * 1024)
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum RpcError {
    #[error("unsupported content type")]
    UnsupportedMediaType,

    #[error("unsupported connect protocol version {0:?}")]
    ProtocolVersion(String),

    #[error("request message larger than {0} bytes")]
    TooLarge(usize),

    #[error("could not read request body: {0}")]
    Payload(#[from] actix_web::error::PayloadError),

    #[error(transparent)]
    Decode(#[from] common::CodecError),

    #[error("failed to encode response: {0}")]
    Encode(#[source] common::CodecError),

    #[error(transparent)]
    Service(#[from] crate::service::ServiceError),
}

impl RpcError {
    fn code(&self) -> common::Code {
        match self {
            RpcError::UnsupportedMediaType
            | RpcError::ProtocolVersion(_)
            | RpcError::Payload(_)
            | RpcError::Decode(_) => common::Code::InvalidArgument,
            RpcError::TooLarge(_) => common::Code::ResourceExhausted,
            RpcError::Encode(_) => common::Code::Internal,
            RpcError::Service(error) => error.code(),
        }
    }
}

impl actix_web::ResponseError for RpcError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            RpcError::UnsupportedMediaType => actix_web::http::StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => actix_web::http::StatusCode::from_u16(self.code().http_status())
                .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let mut response = actix_web::HttpResponse::build(self.status_code());
        match self {
            RpcError::UnsupportedMediaType => response
                .insert_header((
                    actix_web::http::header::ACCEPT,
                    format!(
                        "{}, {}",
                        common::Codec::JSON_CONTENT_TYPE,
                        common::Codec::PROTO_CONTENT_TYPE
                    ),
                ))
                .finish(),
            RpcError::Service(error) => {
                response.json(common::ErrorBody::new(error.code(), error.public_message()))
            }
            RpcError::Encode(_) => {
                log::error!("{self}");
                response.json(common::ErrorBody::new(
                    common::Code::Internal,
                    "failed to encode response",
                ))
            }
            _ => response.json(common::ErrorBody::new(self.code(), self.to_string())),
        }
    }
}

fn negotiate(request: &actix_web::HttpRequest) -> Result<common::Codec, RpcError> {
    if let Some(version) = request.headers().get(common::PROTOCOL_VERSION_HEADER) {
        if version.as_bytes() != common::PROTOCOL_VERSION.as_bytes() {
            return Err(RpcError::ProtocolVersion(
                String::from_utf8_lossy(version.as_bytes()).into_owned(),
            ));
        }
    }
    request
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(common::Codec::from_content_type)
        .ok_or(RpcError::UnsupportedMediaType)
}

/// Collects the body, stopping as soon as it outgrows the `MessageLimit`.
async fn read_body(
    request: &actix_web::HttpRequest,
    mut payload: actix_web::web::Payload,
) -> Result<actix_web::web::Bytes, RpcError> {
    let MessageLimit(limit) = request
        .app_data::<MessageLimit>()
        .copied()
        .unwrap_or_default();

    let mut body = actix_web::web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > limit {
            log::debug!("request to {} exceeds {limit} bytes", request.path());
            return Err(RpcError::TooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

async fn decode<M: common::WireMessage>(
    request: &actix_web::HttpRequest,
    payload: actix_web::web::Payload,
) -> Result<(common::Codec, M), RpcError> {
    let codec = negotiate(request)?;
    let body = read_body(request, payload).await?;
    let message = codec.decode(&body).map_err(|error| {
        log::debug!(
            "undecodable {} request to {}: {error}",
            codec.content_type(),
            request.path()
        );
        error
    })?;
    Ok((codec, message))
}

fn reply<M: common::WireMessage>(
    codec: common::Codec,
    message: &M,
) -> Result<actix_web::HttpResponse, RpcError> {
    let body = codec.encode(message).map_err(RpcError::Encode)?;
    Ok(actix_web::HttpResponse::Ok()
        .content_type(codec.content_type())
        .body(body))
}

async fn list_memos(
    service: actix_web::web::Data<crate::service::MemoService>,
    request: actix_web::HttpRequest,
    payload: actix_web::web::Payload,
) -> Result<actix_web::HttpResponse, RpcError> {
    let (codec, message) = decode(&request, payload).await?;
    reply(codec, &service.list_memos(message).await?)
}

async fn get_memo(
    service: actix_web::web::Data<crate::service::MemoService>,
    request: actix_web::HttpRequest,
    payload: actix_web::web::Payload,
) -> Result<actix_web::HttpResponse, RpcError> {
    let (codec, message) = decode(&request, payload).await?;
    reply(codec, &service.get_memo(message).await?)
}

async fn create_memo(
    service: actix_web::web::Data<crate::service::MemoService>,
    request: actix_web::HttpRequest,
    payload: actix_web::web::Payload,
) -> Result<actix_web::HttpResponse, RpcError> {
    let (codec, message) = decode(&request, payload).await?;
    reply(codec, &service.create_memo(message).await?)
}

async fn update_memo(
    service: actix_web::web::Data<crate::service::MemoService>,
    request: actix_web::HttpRequest,
    payload: actix_web::web::Payload,
) -> Result<actix_web::HttpResponse, RpcError> {
    let (codec, message) = decode(&request, payload).await?;
    reply(codec, &service.update_memo(message).await?)
}

/// Mounts every procedure at `/memo.MemoService/<Procedure>`. Other methods
/// on those paths get 405 from the resource.
pub(crate) fn configure(config: &mut actix_web::web::ServiceConfig) {
    config
        .service(
            actix_web::web::resource(common::LIST_MEMOS_PATH)
                .route(actix_web::web::post().to(list_memos)),
        )
        .service(
            actix_web::web::resource(common::GET_MEMO_PATH)
                .route(actix_web::web::post().to(get_memo)),
        )
        .service(
            actix_web::web::resource(common::CREATE_MEMO_PATH)
                .route(actix_web::web::post().to(create_memo)),
        )
        .service(
            actix_web::web::resource(common::UPDATE_MEMO_PATH)
                .route(actix_web::web::post().to(update_memo)),
        );
}
