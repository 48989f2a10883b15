use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::{AuthUser, Role};
use crate::error::ApiError;
use crate::models::{AccountFields, CreateAccountRequest, UpdateAccountRequest};
use crate::routes::AppState;

/// Configure manager routes. Every route requires the manager role.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/managers")
            .route("", web::post().to(create_manager))
            .route("/{cognito_id}", web::get().to(get_manager))
            .route("/{cognito_id}", web::put().to(update_manager)),
    );
}

/// GET /managers/{cognitoId}
async fn get_manager(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Manager)?;
    let cognito_id = path.into_inner();

    let manager = state
        .store
        .get_manager(&cognito_id)
        .await
        .map_err(|e| ApiError::storage("Failed to get manager", e))?
        .ok_or_else(|| ApiError::NotFound("manager not found".to_string()))?;

    Ok(HttpResponse::Ok().json(manager))
}

/// POST /managers
async fn create_manager(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Manager)?;
    req.validate()?;
    let req = req.into_inner();

    let manager = state
        .store
        .create_manager(AccountFields {
            cognito_id: req.cognito_id,
            name: req.name,
            email: req.email,
            phone_number: req.phone_number,
        })
        .await
        .map_err(|e| ApiError::storage("Error creating manager", e))?;

    tracing::info!("Created manager {}", manager.cognito_id);

    Ok(HttpResponse::Created().json(manager))
}

/// PUT /managers/{cognitoId}
async fn update_manager(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Manager)?;
    req.validate()?;
    let req = req.into_inner();

    let manager = state
        .store
        .update_manager(AccountFields {
            cognito_id: path.into_inner(),
            name: req.name,
            email: req.email,
            phone_number: req.phone_number,
        })
        .await
        .map_err(|e| ApiError::storage("Failed to update manager", e))?
        .ok_or_else(|| ApiError::NotFound("manager not found".to_string()))?;

    Ok(HttpResponse::Ok().json(manager))
}
