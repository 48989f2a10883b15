use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::{AuthUser, Role};
use crate::error::ApiError;
use crate::models::{AccountFields, CreateAccountRequest};
use crate::routes::AppState;

/// Configure tenant routes. Every route requires the tenant role.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tenants")
            .route("", web::post().to(create_tenant))
            .route("/{cognito_id}", web::get().to(get_tenant)),
    );
}

/// GET /tenants/{cognitoId}
async fn get_tenant(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Tenant)?;
    let cognito_id = path.into_inner();

    let tenant = state
        .store
        .get_tenant(&cognito_id)
        .await
        .map_err(|e| ApiError::storage("Failed to get tenant", e))?
        .ok_or_else(|| ApiError::NotFound("tenant not found".to_string()))?;

    Ok(HttpResponse::Ok().json(tenant))
}

/// POST /tenants
async fn create_tenant(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Tenant)?;
    req.validate()?;
    let req = req.into_inner();

    let tenant = state
        .store
        .create_tenant(AccountFields {
            cognito_id: req.cognito_id,
            name: req.name,
            email: req.email,
            phone_number: req.phone_number,
        })
        .await
        .map_err(|e| ApiError::storage("Error creating tenant", e))?;

    tracing::info!("Created tenant {}", tenant.cognito_id);

    Ok(HttpResponse::Created().json(tenant))
}
