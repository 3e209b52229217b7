use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::AppError;
use super::AppState;
use crate::models::ActivityListing;

#[derive(Deserialize)]
pub(crate) struct EmailQuery {
    email: String,
}

#[derive(Serialize)]
pub(crate) struct Message {
    message: String,
}

fn email_from(query: Result<Query<EmailQuery>, QueryRejection>) -> Result<String, AppError> {
    query
        .map(|Query(q)| q.email)
        .map_err(|e| AppError::InvalidQuery(e.body_text()))
}

pub(crate) async fn root_handler() -> Redirect {
    Redirect::temporary("/static/index.html")
}

pub(crate) async fn list_handler(State(state): State<AppState>) -> Json<ActivityListing> {
    Json(ActivityListing(state.store.find_all().await))
}

pub(crate) async fn signup_handler(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<Message>, AppError> {
    let email = email_from(query)?;

    match state
        .store
        .update(&activity_name, |a| a.add_participant(&email))
        .await?
    {
        None => {
            debug!("Signup for unknown activity {:?}", activity_name);
            Err(AppError::ActivityNotFound)
        }
        Some(false) => {
            debug!("{} already signed up for {}", email, activity_name);
            Err(AppError::AlreadySignedUp)
        }
        Some(true) => {
            info!("Signed up {} for {}", email, activity_name);
            Ok(Json(Message {
                message: format!("Signed up {email} for {activity_name}"),
            }))
        }
    }
}

pub(crate) async fn unregister_handler(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<Message>, AppError> {
    let email = email_from(query)?;

    match state
        .store
        .update(&activity_name, |a| a.remove_participant(&email))
        .await?
    {
        None => {
            debug!("Unregister from unknown activity {:?}", activity_name);
            Err(AppError::ActivityNotFound)
        }
        Some(false) => {
            debug!("{} not signed up for {}", email, activity_name);
            Err(AppError::NotSignedUp)
        }
        Some(true) => {
            info!("Unregistered {} from {}", email, activity_name);
            Ok(Json(Message {
                message: format!("Unregistered {email} from {activity_name}"),
            }))
        }
    }
}
