#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub(crate) struct MemoRecord {
    pub(crate) id: uuid::Uuid,
    pub(crate) owner_id: String,
    pub(crate) content: String,
    pub(crate) created_at: chrono::DateTime<chrono::Utc>,
}

pub(crate) struct MemoManager;

impl MemoManager {
    pub(crate) async fn list_by_owner(
        executor: impl sqlx::PgExecutor<'_>,
        owner_id: &str,
    ) -> Result<Vec<MemoRecord>, sqlx::Error> {
        sqlx::query_as::<_, MemoRecord>(
            r#"
        SELECT
            id, owner_id, content, created_at
        FROM memos
        WHERE owner_id = $1
        ORDER BY created_at, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await
    }

    /// Fails with `RowNotFound` unless both id and owner match.
    pub(crate) async fn get_by_id_and_owner(
        executor: impl sqlx::PgExecutor<'_>,
        owner_id: &str,
        id: &uuid::Uuid,
    ) -> Result<MemoRecord, sqlx::Error> {
        sqlx::query_as::<_, MemoRecord>(
            r#"
        SELECT
            id, owner_id, content, created_at
        FROM memos
        WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(executor)
        .await
    }

    pub(crate) async fn insert(
        executor: impl sqlx::PgExecutor<'_>,
        memo: &MemoRecord,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
        INSERT INTO memos
            (id, owner_id, content, created_at)
        VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(memo.id)
        .bind(&memo.owner_id)
        .bind(&memo.content)
        .bind(memo.created_at)
        .execute(executor)
        .await
        .map(|_| ())
    }

    /// Not owner scoped; returns whether a row was touched.
    pub(crate) async fn update_content(
        executor: impl sqlx::PgExecutor<'_>,
        id: &uuid::Uuid,
        content: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query(
            r#"
        UPDATE memos
        SET content = $2
        WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(content)
        .execute(executor)
        .await
        .map(|result| result.rows_affected() > 0)
    }
}
