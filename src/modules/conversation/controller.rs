use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::{error, info, warn};

use crate::modules::conversation::{
    crud::ConversationCrud,
    model::{ConversationRecord, RawTranscript},
    parser,
    schema::ErrorResponse,
};
use crate::AppState;

const INVALID_INPUT: &str = "Invalid input";
const INTERNAL_ERROR: &str = "Internal server error";

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn internal_error() -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR)),
    )
}

/// Ingest one raw transcript: parse, persist, then notify subscribers.
pub async fn process_conversation(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ConversationRecord>, HandlerError> {
    if body.is_empty() {
        return Err(bad_request(INVALID_INPUT));
    }

    let data: RawTranscript =
        serde_json::from_slice(&body).map_err(|_| bad_request(INVALID_INPUT))?;

    let record = parser::process_transcript(&data).map_err(|e| {
        warn!("Rejected transcript {}: {}", data.results.uid, e);
        bad_request(e.to_string())
    })?;

    let crud = ConversationCrud::new(&state.db);
    if let Err(e) = crud.create(&record).await {
        error!("Error inserting conversation data: {}", e);
        return Err(internal_error());
    }

    info!("Conversation data inserted successfully: {}", record.uid);
    state.events.publish(record.clone());

    Ok(Json(record))
}

/// Return every stored conversation, unfiltered.
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConversationRecord>>, HandlerError> {
    let crud = ConversationCrud::new(&state.db);

    match crud.find_all().await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            error!("Error fetching conversation data: {}", e);
            Err(internal_error())
        }
    }
}
