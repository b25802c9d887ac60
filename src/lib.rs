use sqlx::SqlitePool;

pub mod config;
pub mod modules;

use modules::events::broadcaster::EventBroadcaster;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub events: EventBroadcaster,
}
