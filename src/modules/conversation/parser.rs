use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::modules::conversation::model::{ConversationRecord, QaPair, RawTranscript};

pub const ENTITIES_MARKER: &str = "::Entities::";
pub const QA_MARKER: &str = "::Question Answering::";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Timestamp value is not date-parseable")]
    MalformedTimestamp,
    #[error("Question answering block is malformed: {0}")]
    MalformedQaBlock(String),
}

/// Normalize one raw transcript into a [`ConversationRecord`].
///
/// Identity fields are copied verbatim. The two derived sections
/// (entities, question answering) are only extracted when both section
/// markers appear in the free-text summary; otherwise the derived fields
/// keep their empty defaults and the record still succeeds.
pub fn process_transcript(data: &RawTranscript) -> Result<ConversationRecord, ParseError> {
    let mut record = ConversationRecord {
        uid: data.results.uid.clone(),
        create_time: format_timestamp(&data.header.create_time.value)?,
        pub_time: format_timestamp(&data.header.pub_time.value)?,
        ip_address: data.header.source.ip.clone(),
        host_name: data.header.source.host.clone(),
        company_name: String::new(),
        free_text_summary: data.results.free_text_summary.clone(),
        item_price: String::new(),
        quantity: String::new(),
        question_answer: Vec::new(),
    };

    let summary = record.free_text_summary.clone();
    let entities_start = summary.find(ENTITIES_MARKER);
    let qa_start = summary.find(QA_MARKER);

    if let (Some(entities_start), Some(qa_start)) = (entities_start, qa_start) {
        // Marker order is not validated; out-of-order markers still yield a
        // well-formed entities slice.
        let (lo, hi) = (
            entities_start.min(qa_start),
            entities_start.max(qa_start),
        );
        extract_entities(&mut record, summary[lo..hi].trim());
        record.question_answer = extract_qa(summary[qa_start..].trim())?;
    }

    Ok(record)
}

/// Format an epoch-milliseconds number or RFC 3339 string as
/// `YYYY-MM-DD HH:mm:ss`, pinned to UTC.
fn format_timestamp(value: &serde_json::Value) -> Result<String, ParseError> {
    let dt: DateTime<Utc> = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or(ParseError::MalformedTimestamp)?,
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|_| ParseError::MalformedTimestamp)?
            .with_timezone(&Utc),
        _ => return Err(ParseError::MalformedTimestamp),
    };

    Ok(dt.format(TIME_FORMAT).to_string())
}

/// Scan the entities segment line by line. Each line feeds at most one
/// field; a later matching line overwrites an earlier one.
fn extract_entities(record: &mut ConversationRecord, segment: &str) {
    for line in segment.split('\n') {
        if let Some(rest) = value_after(line, "Company Name:") {
            record.company_name = rest;
        } else if let Some(rest) = value_after(line, "Stock Price:") {
            record.item_price = rest;
        } else if let Some(rest) = value_after(line, "Quantity:") {
            record.quantity = rest;
        }
    }
}

fn value_after(line: &str, marker: &str) -> Option<String> {
    line.split(marker).nth(1).map(|rest| rest.trim().to_string())
}

#[derive(Deserialize)]
struct QaDocument {
    #[serde(rename = "QA")]
    qa: Vec<RawQaPair>,
}

#[derive(Deserialize)]
struct RawQaPair {
    question: String,
    answer: String,
}

/// Narrow the question-answering segment to the first top-level JSON
/// object (first `{` to last `}`) and read its `QA` array.
fn extract_qa(segment: &str) -> Result<Vec<QaPair>, ParseError> {
    let (start, end) = match (segment.find('{'), segment.rfind('}')) {
        (Some(start), Some(end)) if start <= end => (start, end),
        _ => {
            return Err(ParseError::MalformedQaBlock(
                "no JSON object in segment".to_string(),
            ))
        }
    };

    let document: QaDocument = serde_json::from_str(segment[start..=end].trim())
        .map_err(|e| ParseError::MalformedQaBlock(e.to_string()))?;

    Ok(document
        .qa
        .into_iter()
        .map(|pair| QaPair {
            q: pair.question,
            a: pair.answer,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript(summary: &str) -> RawTranscript {
        serde_json::from_value(json!({
            "results": { "uid": "abc", "freeTextSummary": summary },
            "header": {
                "createTime": { "value": 0 },
                "pubTime": { "value": 0 },
                "source": { "ip": "1.2.3.4", "host": "h1" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn epoch_zero_formats_as_utc_midnight() {
        let record = process_transcript(&transcript("nothing here")).unwrap();
        assert_eq!(record.create_time, "1970-01-01 00:00:00");
        assert_eq!(record.pub_time, "1970-01-01 00:00:00");
    }

    #[test]
    fn rfc3339_string_timestamp_is_accepted() {
        let raw: RawTranscript = serde_json::from_value(json!({
            "results": { "uid": "abc", "freeTextSummary": "" },
            "header": {
                "createTime": { "value": "2024-03-01T12:30:00Z" },
                "pubTime": { "value": 1_700_000_000_000i64 },
                "source": { "ip": "1.2.3.4", "host": "h1" }
            }
        }))
        .unwrap();

        let record = process_transcript(&raw).unwrap();
        assert_eq!(record.create_time, "2024-03-01 12:30:00");
        assert_eq!(record.pub_time, "2023-11-14 22:13:20");
    }

    #[test]
    fn unparseable_timestamp_is_rejected() {
        let raw: RawTranscript = serde_json::from_value(json!({
            "results": { "uid": "abc", "freeTextSummary": "" },
            "header": {
                "createTime": { "value": "not a date" },
                "pubTime": { "value": 0 },
                "source": { "ip": "1.2.3.4", "host": "h1" }
            }
        }))
        .unwrap();

        assert!(matches!(
            process_transcript(&raw),
            Err(ParseError::MalformedTimestamp)
        ));
    }

    #[test]
    fn missing_markers_keep_defaults() {
        let record = process_transcript(&transcript("Company Name: Acme")).unwrap();
        assert_eq!(record.company_name, "");
        assert_eq!(record.item_price, "");
        assert_eq!(record.quantity, "");
        assert!(record.question_answer.is_empty());
    }

    #[test]
    fn single_marker_keeps_defaults() {
        let summary = "::Entities::\nCompany Name: Acme\nStock Price: $10";
        let record = process_transcript(&transcript(summary)).unwrap();
        assert_eq!(record.company_name, "");
        assert_eq!(record.item_price, "");
    }

    #[test]
    fn entities_and_qa_are_extracted() {
        let summary = "preamble\n::Entities::\nCompany Name: Acme Corp\nStock Price: $12.50\nQuantity: 300\n::Question Answering::\nnotes {\"QA\":[{\"question\":\"Q1\",\"answer\":\"A1\"},{\"question\":\"Q2\",\"answer\":\"A2\"}]} trailer";
        let record = process_transcript(&transcript(summary)).unwrap();

        assert_eq!(record.company_name, "Acme Corp");
        assert_eq!(record.item_price, "$12.50");
        assert_eq!(record.quantity, "300");
        assert_eq!(
            record.question_answer,
            vec![
                QaPair { q: "Q1".to_string(), a: "A1".to_string() },
                QaPair { q: "Q2".to_string(), a: "A2".to_string() },
            ]
        );
        assert_eq!(record.free_text_summary, summary);
    }

    #[test]
    fn last_matching_entity_line_wins() {
        let summary = "::Entities::\nCompany Name: First\nCompany Name: Second\n::Question Answering::\n{\"QA\":[]}";
        let record = process_transcript(&transcript(summary)).unwrap();
        assert_eq!(record.company_name, "Second");
    }

    #[test]
    fn qa_segment_without_braces_fails() {
        let summary = "::Entities::\n::Question Answering::\nno json here";
        assert!(matches!(
            process_transcript(&transcript(summary)),
            Err(ParseError::MalformedQaBlock(_))
        ));
    }

    #[test]
    fn inverted_braces_fail() {
        let summary = "::Entities::\n::Question Answering::\n} backwards {";
        assert!(matches!(
            process_transcript(&transcript(summary)),
            Err(ParseError::MalformedQaBlock(_))
        ));
    }

    #[test]
    fn missing_qa_key_fails() {
        let summary = "::Entities::\n::Question Answering::\n{\"other\": []}";
        assert!(matches!(
            process_transcript(&transcript(summary)),
            Err(ParseError::MalformedQaBlock(_))
        ));
    }
}
