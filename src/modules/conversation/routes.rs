use axum::{
    routing::{get, post},
    Router,
};

use crate::modules::conversation::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/process", post(controller::process_conversation))
        .route("/conversations", get(controller::list_conversations))
}
