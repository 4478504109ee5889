use crate::api::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Ready once the configured store answers.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store = state.config.store.as_str();
    match state.service.check_store().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"status": "ready", "store": store})),
        ),
        Err(e) => {
            warn!(store, error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable", "store": store, "error": e.to_string()})),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, StoreBackend};
    use crate::db::{init_db, InMemoryStore, MatchStore, Repository};
    use crate::operator::PromptDefaults;
    use crate::orchestration::MatchService;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn state(store: Arc<dyn MatchStore>, backend: StoreBackend) -> AppState {
        let service = MatchService::new(store, PromptDefaults::default(), Duration::from_millis(10));
        AppState::new(
            service,
            Config {
                store: backend,
                ..Config::default()
            },
        )
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_with_memory_store() {
        let app = state(Arc::new(InMemoryStore::new()), StoreBackend::Memory);
        let (status, Json(body)) = ready(State(app)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_not_ready_when_pool_closed() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("ready.db").to_string_lossy().to_string();
        let pool = init_db(&db_path).await.unwrap();
        let app = state(Arc::new(Repository::new(pool.clone())), StoreBackend::Sqlite);

        let (status, _) = ready(State(app.clone())).await;
        assert_eq!(status, StatusCode::OK);

        pool.close().await;
        let (status, Json(body)) = ready(State(app)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
        assert_eq!(body["store"], "sqlite");
    }
}
