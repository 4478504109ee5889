use kyorugi::config::{Config, StoreBackend};
use kyorugi::{api, db::init_db, InMemoryStore, MatchService, MatchStore, Repository};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Initialize the store
    let store: Arc<dyn MatchStore> = match (config.store, config.database_path.as_deref()) {
        (StoreBackend::Sqlite, Some(path)) => match init_db(path).await {
            Ok(pool) => Arc::new(Repository::new(pool)),
            Err(e) => {
                eprintln!("Failed to initialize database: {}", e);
                std::process::exit(1);
            }
        },
        (StoreBackend::Sqlite, None) => {
            eprintln!("Configuration error: DATABASE_PATH is required for the sqlite store");
            std::process::exit(1);
        }
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory store; fights are lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let service = MatchService::new(
        store,
        config.prompt_defaults(),
        config.store_retry_max_elapsed(),
    );

    // Create router
    let app = api::create_router(api::AppState::new(service, config));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
