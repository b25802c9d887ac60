use axum::{routing::get, Router};

use crate::modules::events::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/events", get(controller::subscribe))
}
