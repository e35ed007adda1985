use chrono::SubsecRound as _;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ServiceError {
    #[error("invalid memo id {id:?}: {source}")]
    InvalidId {
        id: String,
        #[source]
        source: uuid::Error,
    },

    #[error(transparent)]
    Store(#[from] crate::store::StoreError),
}

impl ServiceError {
    pub(crate) fn code(&self) -> common::Code {
        match self {
            ServiceError::InvalidId { .. } => common::Code::InvalidArgument,
            ServiceError::Store(error) => match error.kind() {
                crate::store::StoreErrorKind::NotFound => common::Code::NotFound,
                crate::store::StoreErrorKind::Conflict => common::Code::AlreadyExists,
                crate::store::StoreErrorKind::Unavailable => common::Code::Unavailable,
                crate::store::StoreErrorKind::Internal => common::Code::Internal,
            },
        }
    }

    /// Text for the caller. Driver details stay in the log.
    pub(crate) fn public_message(&self) -> String {
        match self.code() {
            common::Code::InvalidArgument | common::Code::NotFound => self.to_string(),
            common::Code::AlreadyExists => "memo id already exists".to_owned(),
            common::Code::Unavailable => "memo store unavailable".to_owned(),
            _ => "internal memo store error".to_owned(),
        }
    }
}

fn report(operation: &str, error: impl Into<ServiceError>) -> ServiceError {
    let error = error.into();
    match error.code() {
        common::Code::InvalidArgument | common::Code::NotFound => {
            log::warn!("{operation} rejected: {error}");
        }
        _ => log::error!("{operation} failed: {error}"),
    }
    error
}

fn parse_id(operation: &str, id: &str) -> Result<uuid::Uuid, ServiceError> {
    uuid::Uuid::parse_str(id).map_err(|source| {
        report(
            operation,
            ServiceError::InvalidId {
                id: id.to_owned(),
                source,
            },
        )
    })
}

pub(crate) fn format_timestamp(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

impl From<crate::memo::MemoRecord> for common::Memo {
    fn from(record: crate::memo::MemoRecord) -> Self {
        common::Memo {
            id: record.id.to_string(),
            owner_id: record.owner_id,
            content: record.content,
            created_at: format_timestamp(&record.created_at),
        }
    }
}

/// The four `memo.MemoService` procedures.
pub(crate) struct MemoService {
    store: std::sync::Arc<dyn crate::store::MemoStore>,
}

impl MemoService {
    pub(crate) fn new(store: std::sync::Arc<dyn crate::store::MemoStore>) -> Self {
        Self { store }
    }

    pub(crate) async fn list_memos(
        &self,
        request: common::ListMemosRequest,
    ) -> Result<common::ListMemosResponse, ServiceError> {
        let records = self
            .store
            .list_by_owner(&request.owner_id)
            .await
            .map_err(|error| report("ListMemos", error))?;

        Ok(common::ListMemosResponse {
            memos: records.into_iter().map(common::Memo::from).collect(),
        })
    }

    pub(crate) async fn get_memo(
        &self,
        request: common::GetMemoRequest,
    ) -> Result<common::GetMemoResponse, ServiceError> {
        let id = parse_id("GetMemo", &request.memo_id)?;
        let record = self
            .store
            .get_by_id_and_owner(&request.owner_id, &id)
            .await
            .map_err(|error| report("GetMemo", error))?;

        Ok(common::GetMemoResponse {
            memo: Some(record.into()),
        })
    }

    /// Ids are random v4 uuids; a collision surfaces as `already_exists`.
    pub(crate) async fn create_memo(
        &self,
        request: common::CreateMemoRequest,
    ) -> Result<common::CreateMemoResponse, ServiceError> {
        // Postgres keeps microseconds; truncate so the reply matches later reads.
        let record = crate::memo::MemoRecord {
            id: uuid::Uuid::new_v4(),
            owner_id: request.user_id,
            content: request.content,
            created_at: chrono::Utc::now().trunc_subsecs(6),
        };
        self.store
            .insert(&record)
            .await
            .map_err(|error| report("CreateMemo", error))?;

        log::debug!("created memo {} for {}", record.id, record.owner_id);
        Ok(common::CreateMemoResponse {
            memo: Some(record.into()),
        })
    }

    /// The content update is keyed by id alone; ownership is only checked by
    /// the read that follows it, and the two statements share no transaction.
    pub(crate) async fn update_memo(
        &self,
        request: common::UpdateMemoRequest,
    ) -> Result<common::UpdateMemoResponse, ServiceError> {
        let id = parse_id("UpdateMemo", &request.id)?;
        self.store
            .update_content(&id, &request.content)
            .await
            .map_err(|error| report("UpdateMemo", error))?;

        let record = self
            .store
            .get_by_id_and_owner(&request.user_id, &id)
            .await
            .map_err(|error| report("UpdateMemo", error))?;

        Ok(common::UpdateMemoResponse {
            memo: Some(record.into()),
        })
    }
}
