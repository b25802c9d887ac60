use sqlx::SqlitePool;

use crate::modules::conversation::model::{ConversationRecord, QaPair};

pub struct ConversationCrud {
    pool: SqlitePool,
}

/// Row image of the Conversation table; question_answer is the stored
/// JSON text form of the pair sequence.
#[derive(sqlx::FromRow)]
struct ConversationRow {
    uid: String,
    #[sqlx(rename = "createTime")]
    create_time: String,
    #[sqlx(rename = "pubTime")]
    pub_time: String,
    ip_address: String,
    host_name: String,
    #[sqlx(rename = "company_Name")]
    company_name: String,
    #[sqlx(rename = "freeText_summary")]
    free_text_summary: String,
    item_price: String,
    quantity: String,
    question_answer: String,
}

impl From<ConversationRow> for ConversationRecord {
    fn from(row: ConversationRow) -> Self {
        let question_answer: Vec<QaPair> =
            serde_json::from_str(&row.question_answer).unwrap_or_default();

        ConversationRecord {
            uid: row.uid,
            create_time: row.create_time,
            pub_time: row.pub_time,
            ip_address: row.ip_address,
            host_name: row.host_name,
            company_name: row.company_name,
            free_text_summary: row.free_text_summary,
            item_price: row.item_price,
            quantity: row.quantity,
            question_answer,
        }
    }
}

impl ConversationCrud {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Append one record. Duplicate uids are allowed; every ingestion
    /// stores a new row.
    pub async fn create(&self, record: &ConversationRecord) -> Result<(), sqlx::Error> {
        let question_answer = serde_json::to_string(&record.question_answer)
            .unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            INSERT INTO Conversation
                (uid, createTime, pubTime, ip_address, host_name,
                 company_Name, freeText_summary, item_price, quantity, question_answer)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.uid)
        .bind(&record.create_time)
        .bind(&record.pub_time)
        .bind(&record.ip_address)
        .bind(&record.host_name)
        .bind(&record.company_name)
        .bind(&record.free_text_summary)
        .bind(&record.item_price)
        .bind(&record.quantity)
        .bind(question_answer)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Full table scan in store order; no pagination or filtering.
    pub async fn find_all(&self) -> Result<Vec<ConversationRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ConversationRow>("SELECT * FROM Conversation")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ConversationRecord::from).collect())
    }
}
