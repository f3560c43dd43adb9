//! OpenAPI description of the HTTP surface.

use axum::Router;
#[cfg(not(feature = "swagger-ui"))]
use axum::{Json, routing::get};
use utoipa::OpenApi;

use super::handlers::{entries, login, system};
use crate::app_state::AppState;

/// Generated OpenAPI document for every route.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        entries::show_entries,
        entries::add_entry,
        login::login_form,
        login::login,
        login::logout,
        system::health_handler,
    ),
    tags(
        (name = "Entries", description = "Reading and posting entries"),
        (name = "Auth", description = "Author login and logout"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// `GET /api-docs/openapi.json` — The OpenAPI document.
#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Documentation routes. With the `swagger-ui` feature the document is
/// served by Swagger UI at `/swagger-ui`.
pub fn routes() -> Router<AppState> {
    #[cfg(feature = "swagger-ui")]
    {
        Router::new().merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
    }
    #[cfg(not(feature = "swagger-ui"))]
    {
        Router::new().route("/api-docs/openapi.json", get(openapi_json))
    }
}
