use axum::{Json, extract::State};
use tracing::{debug, info};

use parlor_directory::DirectoryUser;
use parlor_types::api::{RegisterRequest, RegisterResponse};
use parlor_types::derive_user_id;

use crate::error::ApiError;
use crate::extract::{Payload, present};
use crate::state::{AppState, with_db};

/// POST /register-user
///
/// Lookup-then-create against the directory and then the database. Neither
/// step locks, so two identical requests can race; the database insert
/// ignores an id that already exists.
pub async fn register_user(
    State(state): State<AppState>,
    Payload(req): Payload<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let (Some(name), Some(email)) = (present(req.name), present(req.email)) else {
        return Err(ApiError::Validation("Name and email are required".into()));
    };

    let user_id = derive_user_id(&email);

    if state.directory.find_user(&user_id).await?.is_none() {
        state
            .directory
            .upsert_user(&DirectoryUser::new(&user_id, &name, &email))
            .await?;
        debug!("Directory user {} created", user_id);
    }

    let id = user_id.clone();
    let existing = with_db(&state, move |db| db.get_user(&id)).await?;

    if existing.is_none() {
        let (id, n, e) = (user_id.clone(), name.clone(), email.clone());
        with_db(&state, move |db| db.insert_user(&id, &n, &e)).await?;
        info!("Registered user {}", user_id);
    } else {
        debug!("User {} already registered", user_id);
    }

    Ok(Json(RegisterResponse {
        user_id,
        name,
        email,
    }))
}
