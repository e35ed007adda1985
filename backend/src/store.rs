#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StoreErrorKind {
    NotFound,
    Conflict,
    Unavailable,
    Internal,
}

/// Sorts a driver error into the kinds the service reports.
pub(crate) fn classify(error: &sqlx::Error) -> StoreErrorKind {
    match error {
        sqlx::Error::RowNotFound => StoreErrorKind::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreErrorKind::Conflict,
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreErrorKind::Unavailable,
        _ => StoreErrorKind::Internal,
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("memo not found")]
    NotFound,

    #[error("memo id already exists: {0}")]
    Conflict(#[source] sqlx::Error),

    #[error("memo store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("memo store failure: {0}")]
    Internal(#[source] sqlx::Error),
}

impl StoreError {
    pub(crate) fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::NotFound => StoreErrorKind::NotFound,
            StoreError::Conflict(_) => StoreErrorKind::Conflict,
            StoreError::Unavailable(_) => StoreErrorKind::Unavailable,
            StoreError::Internal(_) => StoreErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match classify(&error) {
            StoreErrorKind::NotFound => StoreError::NotFound,
            StoreErrorKind::Conflict => StoreError::Conflict(error),
            StoreErrorKind::Unavailable => StoreError::Unavailable(error),
            StoreErrorKind::Internal => StoreError::Internal(error),
        }
    }
}

/// Persistence seen by the service; one statement per call.
#[async_trait::async_trait]
pub(crate) trait MemoStore: Send + Sync {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<crate::memo::MemoRecord>, StoreError>;

    async fn get_by_id_and_owner(
        &self,
        owner_id: &str,
        id: &uuid::Uuid,
    ) -> Result<crate::memo::MemoRecord, StoreError>;

    async fn insert(&self, memo: &crate::memo::MemoRecord) -> Result<(), StoreError>;

    /// Touches the row with `id` regardless of owner.
    async fn update_content(&self, id: &uuid::Uuid, content: &str) -> Result<(), StoreError>;
}

pub(crate) struct PgMemoStore {
    pool: sqlx::PgPool,
}

impl PgMemoStore {
    pub(crate) fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MemoStore for PgMemoStore {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<crate::memo::MemoRecord>, StoreError> {
        Ok(crate::memo::MemoManager::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn get_by_id_and_owner(
        &self,
        owner_id: &str,
        id: &uuid::Uuid,
    ) -> Result<crate::memo::MemoRecord, StoreError> {
        Ok(crate::memo::MemoManager::get_by_id_and_owner(&self.pool, owner_id, id).await?)
    }

    async fn insert(&self, memo: &crate::memo::MemoRecord) -> Result<(), StoreError> {
        Ok(crate::memo::MemoManager::insert(&self.pool, memo).await?)
    }

    async fn update_content(&self, id: &uuid::Uuid, content: &str) -> Result<(), StoreError> {
        if crate::memo::MemoManager::update_content(&self.pool, id, content).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;

    /// Vec-backed store with the same scoping rules as the SQL.
    #[derive(Default)]
    pub(crate) struct InMemoryStore {
        memos: std::sync::Mutex<Vec<crate::memo::MemoRecord>>,
        unavailable: bool,
    }

    impl InMemoryStore {
        pub(crate) fn with_memos(memos: Vec<crate::memo::MemoRecord>) -> Self {
            Self {
                memos: std::sync::Mutex::new(memos),
                unavailable: false,
            }
        }

        pub(crate) fn unavailable() -> Self {
            Self {
                memos: std::sync::Mutex::default(),
                unavailable: true,
            }
        }

        pub(crate) fn snapshot(&self) -> Vec<crate::memo::MemoRecord> {
            self.memos.lock().unwrap().clone()
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.unavailable {
                Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl MemoStore for InMemoryStore {
        async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<crate::memo::MemoRecord>, StoreError> {
            self.check()?;
            let mut memos: Vec<_> = self
                .memos
                .lock()
                .unwrap()
                .iter()
                .filter(|memo| memo.owner_id == owner_id)
                .cloned()
                .collect();
            memos.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            Ok(memos)
        }

        async fn get_by_id_and_owner(
            &self,
            owner_id: &str,
            id: &uuid::Uuid,
        ) -> Result<crate::memo::MemoRecord, StoreError> {
            self.check()?;
            self.memos
                .lock()
                .unwrap()
                .iter()
                .find(|memo| memo.id == *id && memo.owner_id == owner_id)
                .cloned()
                .ok_or(StoreError::NotFound)
        }

        async fn insert(&self, memo: &crate::memo::MemoRecord) -> Result<(), StoreError> {
            self.check()?;
            let mut memos = self.memos.lock().unwrap();
            if memos.iter().any(|existing| existing.id == memo.id) {
                return Err(StoreError::Conflict(sqlx::Error::Protocol(format!(
                    "duplicate key {}",
                    memo.id
                ))));
            }
            memos.push(memo.clone());
            Ok(())
        }

        async fn update_content(&self, id: &uuid::Uuid, content: &str) -> Result<(), StoreError> {
            self.check()?;
            let mut memos = self.memos.lock().unwrap();
            let memo = memos
                .iter_mut()
                .find(|memo| memo.id == *id)
                .ok_or(StoreError::NotFound)?;
            memo.content = content.to_owned();
            Ok(())
        }
    }
}
