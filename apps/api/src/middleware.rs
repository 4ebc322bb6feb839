use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use steward_core::AppError;
use tower_sessions::Session;

use crate::auth::session_identity;
use crate::error::ApiResult;
use crate::state::AppState;

/// Makes the signed-in [`steward_core::UserIdentity`] available to `/api` handlers.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Rejects account mutations that were not issued by the admin front end.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let mutates = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    );

    if mutates && !issued_by_frontend(request.headers(), state.frontend_url.as_str()) {
        return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn issued_by_frontend(headers: &HeaderMap, frontend_url: &str) -> bool {
    let header_text = |name: HeaderName| headers.get(name).and_then(|value| value.to_str().ok());

    if header_text(HeaderName::from_static("sec-fetch-site")) == Some("cross-site") {
        return false;
    }

    header_text(header::ORIGIN) == Some(frontend_url)
        || header_text(header::REFERER).is_some_and(|referer| referer.starts_with(frontend_url))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::issued_by_frontend;

    const FRONTEND: &str = "http://localhost:3000";

    #[test]
    fn matching_origin_or_referer_is_accepted() {
        let mut by_origin = HeaderMap::new();
        by_origin.insert(header::ORIGIN, HeaderValue::from_static(FRONTEND));
        assert!(issued_by_frontend(&by_origin, FRONTEND));

        let mut by_referer = HeaderMap::new();
        by_referer.insert(
            header::REFERER,
            HeaderValue::from_static("http://localhost:3000/users"),
        );
        assert!(issued_by_frontend(&by_referer, FRONTEND));
    }

    #[test]
    fn cross_site_fetch_is_rejected_even_with_matching_origin() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static(FRONTEND));
        headers.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));
        assert!(!issued_by_frontend(&headers, FRONTEND));
        assert!(!issued_by_frontend(&HeaderMap::new(), FRONTEND));
    }
}
