//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;

use contactdesk::{DomainError, Message, MessageRepository, MessageSearch, MessageSortType};

const SEARCH_FILTER: &str = r#"
    $1::text IS NULL
    OR first_name ILIKE $1
    OR last_name ILIKE $1
    OR company ILIKE $1
    OR email ILIKE $1
    OR telephone ILIKE $1
    OR country ILIKE $1
    OR message_content ILIKE $1
    OR CAST(id AS TEXT) LIKE $1
"#;

/// PostgreSQL implementation of MessageRepository
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i32,
    first_name: String,
    last_name: String,
    company: Option<String>,
    email: String,
    telephone: Option<String>,
    country: Option<String>,
    message_content: String,
    created_date: chrono::DateTime<chrono::Utc>,
    modified_date: chrono::DateTime<chrono::Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            company: row.company,
            email: row.email,
            telephone: row.telephone,
            country: row.country,
            message_content: row.message_content,
            created_date: row.created_date,
            modified_date: row.modified_date,
        }
    }
}

fn order_clause(sort: MessageSortType) -> &'static str {
    match sort {
        MessageSortType::MessageIdAscending => "id ASC",
        MessageSortType::MessageIdDescending => "id DESC",
        MessageSortType::MessageCreatedDateAscending => "created_date ASC, id ASC",
        MessageSortType::MessageCreatedDateDescending => "created_date DESC, id DESC",
    }
}

/// `%query%` with LIKE wildcards in the query escaped
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert(&self, message: &Message) -> Result<Message, DomainError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages
                (first_name, last_name, company, email, telephone, country,
                 message_content, created_date, modified_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&message.first_name)
        .bind(&message.last_name)
        .bind(&message.company)
        .bind(&message.email)
        .bind(&message.telephone)
        .bind(&message.country)
        .bind(&message.message_content)
        .bind(message.created_date)
        .bind(message.modified_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Message>, DomainError> {
        let row = sqlx::query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn search(&self, search: &MessageSearch) -> Result<(Vec<Message>, i64), DomainError> {
        let pattern = search
            .query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM messages WHERE {}",
            SEARCH_FILTER
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT * FROM messages WHERE {} ORDER BY {} OFFSET $2 LIMIT $3",
            SEARCH_FILTER,
            order_clause(search.sort)
        ))
        .bind(&pattern)
        .bind(search.skip.max(0))
        .bind(search.take.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, message: &Message) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET first_name = $2, last_name = $3, company = $4, email = $5, telephone = $6,
                country = $7, message_content = $8, modified_date = $9
            WHERE id = $1
            "#,
        )
        .bind(message.id)
        .bind(&message.first_name)
        .bind(&message.last_name)
        .bind(&message.company)
        .bind(&message.email)
        .bind(&message.telephone)
        .bind(&message.country)
        .bind(&message.message_content)
        .bind(message.modified_date)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;
        Ok(())
    }
}
