//! Pipeline API Handlers
//!
//! HTTP endpoints for pipeline creation and lookup.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use gantry_core::domain::pipeline::Pipeline;
use gantry_core::dto::pipeline::CreatePipelineRequest;

use crate::api::AppState;
use crate::api::auth::Authenticated;
use crate::api::error::{ApiError, ApiResult};
use crate::service::pipeline_service;
use crate::service::pipeline_service::PipelineError;

/// POST /pipelines
/// Create a new pipeline from a checkout URL
pub async fn create_pipeline(
    State(state): State<AppState>,
    Authenticated(username): Authenticated,
    uri: Uri,
    headers: HeaderMap,
    Json(req): Json<CreatePipelineRequest>,
) -> ApiResult<Response> {
    tracing::info!("Creating pipeline for {}: {}", username, req.checkout_url);

    let pipeline =
        pipeline_service::create_pipeline(&state.services, &username, &req.checkout_url)
            .await
            .map_err(|e| match e {
                PipelineError::InvalidLocator(err) => ApiError::BadRequest(err.to_string()),
                PipelineError::UserNotFound { username } => {
                    ApiError::NotFound(format!("User {} not found", username))
                }
                PipelineError::Unauthorized { username, scm_uri } => ApiError::Forbidden(format!(
                    "User {} is not an admin of {}",
                    username, scm_uri
                )),
                PipelineError::Conflict { existing_id } => {
                    ApiError::Conflict(format!("Pipeline already exists: {}", existing_id))
                }
                other => ApiError::InternalError(other.to_string()),
            })?;

    let location = location_for(&state.public_scheme, &headers, uri.path(), pipeline.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(pipeline),
    )
        .into_response())
}

/// GET /pipelines/{id}
/// Get pipeline by ID
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Pipeline>> {
    tracing::debug!("Getting pipeline: {}", id);

    let pipeline = pipeline_service::get_pipeline(&state.services, id)
        .await
        .map_err(|e| match e {
            PipelineError::NotFound(id) => {
                ApiError::NotFound(format!("Pipeline {} not found", id))
            }
            other => ApiError::InternalError(other.to_string()),
        })?;

    Ok(Json(pipeline))
}

/// Location header assembled from the request's host and path.
fn location_for(scheme: &str, headers: &HeaderMap, path: &str, id: Uuid) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}{}/{}", scheme, host, path, id)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use gantry_core::domain::pipeline::PipelineConfig;
    use gantry_core::domain::scm::ScmUri;
    use gantry_core::ports::PipelineStore;

    use super::*;
    use crate::api::{auth, create_router};
    use crate::testing::{FakeScm, services_with_user};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_pipelines(checkout_url: &str, username: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/pipelines")
            .header("host", "api.gantry.dev")
            .header("content-type", "application/json");

        if let Some(username) = username {
            builder = builder.header(auth::USERNAME_HEADER, username);
        }

        builder
            .body(Body::from(format!(
                r#"{{"checkoutUrl":"{}"}}"#,
                checkout_url
            )))
            .unwrap()
    }

    async fn app(scm: FakeScm) -> (axum::Router, Arc<crate::repository::memory::MemoryPipelineStore>) {
        let (services, pipelines) = services_with_user("alice", Arc::new(scm)).await;
        let router = create_router(AppState {
            services,
            public_scheme: "http".to_string(),
        });
        (router, pipelines)
    }

    #[tokio::test]
    async fn test_create_pipeline_returns_201_with_location() {
        let (router, _) = app(FakeScm::admin()).await;

        let response = router
            .oneshot(post_pipelines("git@Example.com:org/Repo.git", Some("alice")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let json = body_json(response).await;
        assert_eq!(json["scmUri"], "git@example.com:org/repo.git#master");
        assert_eq!(json["admins"], serde_json::json!({ "alice": true }));

        let id = json["id"].as_str().unwrap();
        assert_eq!(location, format!("http://api.gantry.dev/pipelines/{}", id));
    }

    #[tokio::test]
    async fn test_create_pipeline_requires_identity() {
        let (router, _) = app(FakeScm::admin()).await;

        let response = router
            .oneshot(post_pipelines("git@example.com:org/repo.git", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_pipeline_rejects_invalid_locator() {
        let (router, _) = app(FakeScm::admin()).await;

        let response = router
            .oneshot(post_pipelines("not-a-checkout-url", Some("alice")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_pipeline_forbidden_for_non_admin() {
        let (router, _) = app(FakeScm::read_only()).await;

        let response = router
            .oneshot(post_pipelines("git@example.com:org/repo.git", Some("alice")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = body_json(response).await;
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("alice"));
        assert!(message.contains("not an admin"));
    }

    #[tokio::test]
    async fn test_create_pipeline_conflict_reports_existing_id() {
        let (router, pipelines) = app(FakeScm::admin()).await;

        let existing = pipelines
            .create(PipelineConfig::new(
                ScmUri::new("git@example.com:org/repo.git#master"),
                "bob",
            ))
            .await
            .unwrap();

        let response = router
            .oneshot(post_pipelines("git@example.com:org/repo.git", Some("alice")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        let message = json["error"].as_str().unwrap();
        assert!(message.contains(&existing.id.to_string()));
    }

    #[tokio::test]
    async fn test_get_pipeline_roundtrip() {
        let (router, pipelines) = app(FakeScm::admin()).await;

        let created = pipelines
            .create(PipelineConfig::new(
                ScmUri::new("git@example.com:org/repo.git#master"),
                "alice",
            ))
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/pipelines/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], created.id.to_string());
    }

    #[tokio::test]
    async fn test_get_pipeline_not_found() {
        let (router, _) = app(FakeScm::admin()).await;

        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/pipelines/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
