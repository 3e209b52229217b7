pub mod activities;
pub mod error;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

use crate::store::ActivityStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<ActivityStore>,
}

pub(crate) fn router(store: Arc<ActivityStore>, static_dir: &Path) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/", get(activities::root_handler))
        .route("/activities", get(activities::list_handler))
        .route(
            "/activities/{activity_name}/signup",
            post(activities::signup_handler),
        )
        .route(
            "/activities/{activity_name}/unregister",
            delete(activities::unregister_handler),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

pub async fn serve(store: Arc<ActivityStore>, static_dir: &Path, addr: SocketAddr) -> Result<()> {
    let app = router(store, static_dir);

    let listener = TcpListener::bind(addr).await?;
    info!("Mergington High School API listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
