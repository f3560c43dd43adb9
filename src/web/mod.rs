//! Web layer: route handlers, forms, templates, and router composition.
//!
//! Middleware is composed explicitly in [`build_router`], outermost first:
//!
//! 1. `TraceLayer`: one span per request.
//! 2. `SessionManagerLayer`: loads the signed session cookie, saves
//!    changes after the handler.
//! 3. [`middleware::connection_scope`]: opens the request's database
//!    connection before the handler and releases it afterwards.

pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod templates;

use axum::Router;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::app_state::AppState;
use crate::config::SessionSettings;

/// Builds the complete application router.
pub fn build_router(state: AppState, session: &SessionSettings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(session.secure)
        .with_same_site(SameSite::Lax)
        .with_signed(session.key.clone());

    handlers::routes()
        .merge(openapi::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::connection_scope,
        ))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::Credentials;
    use crate::persistence::{Database, EntryStore};

    struct TestApp {
        router: Router,
        database: Database,
        _dir: TempDir,
    }

    async fn test_app(initialize: bool) -> TestApp {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let database = Database::open(dir.path().join("blog.db"));
        if initialize && database.initialize().await.is_err() {
            panic!("schema init failed");
        }
        let state = AppState::new(database.clone(), Credentials::new("admin", "default"));
        let router = build_router(state, &SessionSettings::ephemeral(false));
        TestApp {
            router,
            database,
            _dir: dir,
        }
    }

    fn request(method: &str, uri: &str, body: Option<&str>, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        let Ok(req) = builder.body(body) else {
            panic!("invalid request");
        };
        req
    }

    async fn send(app: &TestApp, req: Request<Body>) -> Response {
        match app.router.clone().oneshot(req).await {
            Ok(resp) => resp,
            Err(never) => match never {},
        }
    }

    fn session_cookie(resp: &Response) -> Option<String> {
        resp.headers()
            .get(header::SET_COOKIE)?
            .to_str()
            .ok()?
            .split(';')
            .next()
            .map(str::to_string)
    }

    async fn body_text(resp: Response) -> String {
        match resp.into_body().collect().await {
            Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
            Err(_) => String::new(),
        }
    }

    async fn row_count(db: &Database) -> i64 {
        let Ok(mut lease) = db.acquire().await else {
            panic!("acquire failed");
        };
        let Ok(conn) = lease.get_mut() else {
            panic!("released");
        };
        let Ok(count) = EntryStore::new(conn).count().await else {
            panic!("count failed");
        };
        lease.release().await;
        count
    }

    async fn stored_entries(db: &Database) -> Vec<crate::persistence::Entry> {
        let Ok(mut lease) = db.acquire().await else {
            panic!("acquire failed");
        };
        let Ok(conn) = lease.get_mut() else {
            panic!("released");
        };
        let Ok(entries) = EntryStore::new(conn).list().await else {
            panic!("list failed");
        };
        lease.release().await;
        entries
    }

    async fn log_in(app: &TestApp) -> String {
        let resp = send(
            app,
            request("POST", "/login", Some("username=admin&password=default"), None),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        let Some(cookie) = session_cookie(&resp) else {
            panic!("login did not set a session cookie");
        };
        cookie
    }

    #[tokio::test]
    async fn add_without_login_is_unauthorized_and_stores_nothing() {
        let app = test_app(true).await;

        let resp = send(
            &app,
            request("POST", "/add", Some("title=Hello&text=World"), None),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(row_count(&app.database).await, 0);
    }

    #[tokio::test]
    async fn add_without_login_and_without_body_is_still_unauthorized() {
        let app = test_app(true).await;

        let resp = send(&app, request("POST", "/add", None, None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_redirects_to_entries() {
        let app = test_app(true).await;

        let resp = send(
            &app,
            request("POST", "/login", Some("username=admin&password=default"), None),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/")
        );
        assert!(session_cookie(&resp).is_some());
    }

    #[tokio::test]
    async fn wrong_username_shows_invalid_username() {
        let app = test_app(true).await;

        let resp = send(
            &app,
            request("POST", "/login", Some("username=root&password=default"), None),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("Invalid username"));
        assert!(!body.contains("Invalid password"));
    }

    #[tokio::test]
    async fn wrong_password_shows_invalid_password() {
        let app = test_app(true).await;

        let resp = send(
            &app,
            request("POST", "/login", Some("username=admin&password=nope"), None),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("Invalid password"));
    }

    #[tokio::test]
    async fn login_form_renders() {
        let app = test_app(true).await;

        let resp = send(&app, request("GET", "/login", None, None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("action=\"/login\""));
        assert!(!body.contains("class=\"error\""));
    }

    #[tokio::test]
    async fn entries_are_listed_newest_first() {
        let app = test_app(true).await;
        let cookie = log_in(&app).await;

        for title in ["first", "second", "third"] {
            let body = format!("title={title}&text=body");
            let resp = send(
                &app,
                request("POST", "/add", Some(body.as_str()), Some(cookie.as_str())),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::FOUND);
        }

        let resp = send(&app, request("GET", "/", None, Some(cookie.as_str()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        let positions: Vec<Option<usize>> = ["third", "second", "first"]
            .iter()
            .map(|t| body.find(&format!("<h2>{t}</h2>")))
            .collect();
        let Some(positions) = positions.into_iter().collect::<Option<Vec<_>>>() else {
            panic!("missing entry in list");
        };
        assert!(positions.windows(2).all(|w| matches!(w, [a, b] if a < b)));
        assert_eq!(row_count(&app.database).await, 3);
    }

    #[tokio::test]
    async fn add_with_missing_text_is_bad_request() {
        let app = test_app(true).await;
        let cookie = log_in(&app).await;

        let resp = send(
            &app,
            request("POST", "/add", Some("title=Hello"), Some(cookie.as_str())),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(row_count(&app.database).await, 0);
    }

    #[tokio::test]
    async fn add_accepts_text_beyond_default_body_limit() {
        let app = test_app(true).await;
        let cookie = log_in(&app).await;
        let text = "a".repeat(3 * 1024 * 1024);
        let body = format!("title=long&text={text}");

        let resp = send(
            &app,
            request("POST", "/add", Some(body.as_str()), Some(cookie.as_str())),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);

        let entries = stored_entries(&app.database).await;
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|e| e.title == "long" && e.text.len() == text.len()));
    }

    #[tokio::test]
    async fn invalid_utf8_escape_is_stored_as_replacement_char() {
        let app = test_app(true).await;
        let cookie = log_in(&app).await;

        let resp = send(
            &app,
            request("POST", "/add", Some("title=%FF&text=x"), Some(cookie.as_str())),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);

        let entries = stored_entries(&app.database).await;
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|e| e.title == "\u{FFFD}" && e.text == "x"));
    }

    #[tokio::test]
    async fn logout_clears_login_idempotently() {
        let app = test_app(true).await;
        let cookie = log_in(&app).await;

        for _ in 0..2 {
            let resp = send(&app, request("GET", "/logout", None, Some(cookie.as_str()))).await;
            assert_eq!(resp.status(), StatusCode::FOUND);
            assert_eq!(
                resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
                Some("/")
            );
        }

        let resp = send(
            &app,
            request("POST", "/add", Some("title=a&text=b"), Some(cookie.as_str())),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn flash_is_shown_once() {
        let app = test_app(true).await;
        let cookie = log_in(&app).await;

        let first = body_text(send(&app, request("GET", "/", None, Some(cookie.as_str()))).await).await;
        assert!(first.contains("You were logged in"));
        assert!(first.contains("action=\"/add\""));

        let second = body_text(send(&app, request("GET", "/", None, Some(cookie.as_str()))).await).await;
        assert!(!second.contains("You were logged in"));
    }

    #[tokio::test]
    async fn every_request_releases_its_connection() {
        let app = test_app(true).await;
        let stats = std::sync::Arc::clone(app.database.stats());
        let before = stats.acquired();

        let _ = send(&app, request("GET", "/", None, None)).await;
        let _ = send(&app, request("GET", "/login", None, None)).await;
        let _ = send(&app, request("POST", "/add", Some("title=a&text=b"), None)).await;
        let _ = send(&app, request("GET", "/health", None, None)).await;

        assert_eq!(stats.acquired() - before, 4);
        assert_eq!(stats.open(), 0);
    }

    #[tokio::test]
    async fn failing_handler_still_releases_its_connection() {
        let app = test_app(false).await;

        let resp = send(&app, request("GET", "/", None, None)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.database.stats().acquired(), 1);
        assert_eq!(app.database.stats().released(), 1);
    }

    #[tokio::test]
    async fn unreachable_store_aborts_before_handler() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let database = Database::open(dir.path().join("missing").join("blog.db"));
        let state = AppState::new(database.clone(), Credentials::new("admin", "default"));
        let router = build_router(state, &SessionSettings::ephemeral(false));

        let Ok(req) = Request::builder().uri("/").body(Body::empty()) else {
            panic!("invalid request");
        };
        let resp = match router.oneshot(req).await {
            Ok(resp) => resp,
            Err(never) => match never {},
        };
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(database.stats().acquired(), 0);
        assert_eq!(database.stats().released(), 0);
    }

    #[tokio::test]
    async fn unknown_route_opens_no_connection() {
        let app = test_app(true).await;
        let before = app.database.stats().acquired();

        let resp = send(&app, request("GET", "/nope", None, None)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.database.stats().acquired(), before);
    }

    #[tokio::test]
    async fn health_reports_entry_count() {
        let app = test_app(true).await;

        let resp = send(&app, request("GET", "/health", None, None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) else {
            panic!("health body is not json");
        };
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["entries"], 0);
        assert!(json["timestamp"].as_str().is_some_and(|ts| {
            chrono::DateTime::parse_from_rfc3339(ts).is_ok()
        }));
    }

    #[cfg(not(feature = "swagger-ui"))]
    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let app = test_app(true).await;

        let resp = send(&app, request("GET", "/api-docs/openapi.json", None, None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("\"/add\""));
        assert!(body.contains("\"/login\""));
    }
}
