//! Itembook Server
//!
//! HTML front end for creating, listing, editing, and deleting items.

pub mod config;
pub mod error;
pub mod flash;
pub mod form;
pub mod http;
pub mod views;

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use itembook_core::{ItemStore, SqliteItemStore};

pub use config::ServerConfig;
pub use error::ServerError;

/// Shared application state
///
/// Built once at startup and handed to every handler; the store handle is
/// the only state that outlives a request.
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Open (or create) the SQLite database at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let store = SqliteItemStore::open(db_path.as_ref())?;
        Ok(Self::new(Arc::new(store)))
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(http::index))
        .route("/create", get(http::create_form).post(http::create_item))
        .route("/edit/{id}", get(http::edit_form).post(http::edit_item))
        .route("/delete/{id}", get(http::delete_item))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Start the server and run until Ctrl-C
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), ServerError> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Itembook server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Itembook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
