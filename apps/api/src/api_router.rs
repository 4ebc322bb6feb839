use axum::Router;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use steward_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

/// Builds every route. The caller adds the session layer for its store.
pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/api/users/capabilities",
            get(handlers::users::user_capabilities_handler),
        )
        .route(
            "/api/users/template",
            get(handlers::users::user_template_handler),
        )
        .route(
            "/api/users/directory",
            get(handlers::users::user_directory_handler),
        )
        .route(
            "/api/users/export",
            get(handlers::users::export_users_handler),
        )
        .route(
            "/api/users/import",
            post(handlers::users::import_users_handler),
        )
        .route(
            "/api/users/bulk-delete/preview",
            post(handlers::users::preview_bulk_delete_handler),
        )
        .route(
            "/api/users/bulk-delete",
            post(handlers::users::bulk_delete_users_handler),
        )
        .route(
            "/api/users/{user_id}",
            put(handlers::users::update_user_handler).delete(handlers::users::delete_user_handler),
        )
        .route(
            "/api/users/{user_id}/toggle-active",
            post(handlers::users::toggle_active_handler),
        )
        .route(
            "/api/users/{user_id}/reset-password",
            post(handlers::users::reset_password_handler),
        )
        .route(
            "/api/users/{user_id}/permissions",
            get(handlers::permissions::permission_panel_handler)
                .put(handlers::permissions::assign_permissions_handler),
        )
        .route(
            "/api/users/{user_id}/permissions/toggle",
            post(handlers::permissions::toggle_permission_handler),
        )
        .route("/api/roles", get(handlers::users::list_roles_handler))
        .route("/api/tenants", get(handlers::users::list_tenants_handler))
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

/// Credentialed CORS for the admin frontend. Downloads need the
/// `Content-Disposition` header to recover the file name.
fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(frontend_url)
        .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([CONTENT_DISPOSITION]))
}
