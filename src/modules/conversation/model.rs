use serde::{Deserialize, Serialize};

/// Incoming transcript payload as posted by the capture side.
/// Only the fields the pipeline reads are modeled; everything else in the
/// payload is ignored by serde.
#[derive(Debug, Deserialize)]
pub struct RawTranscript {
    pub results: TranscriptResults,
    pub header: TranscriptHeader,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptResults {
    pub uid: String,
    #[serde(rename = "freeTextSummary")]
    pub free_text_summary: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptHeader {
    #[serde(rename = "createTime")]
    pub create_time: TimestampValue,
    #[serde(rename = "pubTime")]
    pub pub_time: TimestampValue,
    pub source: TranscriptSource,
}

/// Epoch milliseconds (number) or an RFC 3339 string.
#[derive(Debug, Deserialize)]
pub struct TimestampValue {
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptSource {
    pub ip: String,
    pub host: String,
}

/// Normalized conversation record, persisted as one row and used verbatim
/// as the response and broadcast payload. Field names match the stored
/// column names and the wire format consumed by existing clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub uid: String,
    #[serde(rename = "createTime")]
    pub create_time: String,
    #[serde(rename = "pubTime")]
    pub pub_time: String,
    pub ip_address: String,
    pub host_name: String,
    #[serde(rename = "company_Name")]
    pub company_name: String,
    #[serde(rename = "freeText_summary")]
    pub free_text_summary: String,
    pub item_price: String,
    pub quantity: String,
    pub question_answer: Vec<QaPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(rename = "Q")]
    pub q: String,
    #[serde(rename = "A")]
    pub a: String,
}
