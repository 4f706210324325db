pub mod render;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::upstream::UpstreamClient;
use crate::view::PredictionView;

/// Body of the proxy's 500 response. Upstream failures are not told apart.
pub const PROXY_ERROR_MESSAGE: &str = "Failed to fetch predictions";

#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub view: Arc<PredictionView>,
    pub logo_url_template: String,
}

/// Build the Axum router: the prediction proxy plus the page that renders the view.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/retry", post(retry_handler))
        .route("/placeholder.svg", get(placeholder_handler))
        .route("/api/predictions", get(predictions_handler))
        .route("/api/view", get(view_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// GET /api/predictions
///
/// Forwards to the prediction API with the server-side token and returns the
/// upstream body byte for byte.
async fn predictions_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.upstream.fetch_today_raw().await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!("Prediction proxy failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": PROXY_ERROR_MESSAGE })),
            )
                .into_response()
        }
    }
}

/// Render the current view state.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.view.snapshot().await;
    Html(render::render_page(
        &snapshot,
        Utc::now(),
        &state.logo_url_template,
    ))
}

/// POST /retry
async fn retry_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.view.retry().await;
    Redirect::to("/")
}

/// GET /api/view
async fn view_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.view.snapshot().await)
}

async fn placeholder_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render::PLACEHOLDER_SVG,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::state::testing::ScriptedSource;
    use crate::view::{PredictionSource, ProxyClient, ViewState};
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEMPLATE: &str = "https://icons.test/{slug}.png";

    fn upstream(server: &MockServer) -> UpstreamClient {
        UpstreamClient::new(&server.uri(), "secret".into(), Duration::from_secs(5)).unwrap()
    }

    fn app_state(upstream: UpstreamClient, source: Arc<dyn PredictionSource>) -> AppState {
        AppState {
            upstream,
            view: Arc::new(PredictionView::new(source)),
            logo_url_template: TEMPLATE.to_string(),
        }
    }

    async fn mount_upstream(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/v1/matches/today/"))
            .and(header_matcher("Authorization", "Token secret"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    /// Serve the router on an ephemeral port so a `ProxyClient` can reach it.
    async fn serve(state: AppState) -> url::Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        url::Url::parse(&format!("http://{}/api/predictions", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_proxy_returns_upstream_payload_verbatim() {
        let upstream_body = r#"[{"matchId":"9001","homeTeamName":"Aston Villa","awayTeamName":"Everton","dateTime":"2026-10-19T19:00:00+02:00","homePrediction":"1","awayPrediction":"1","probHomeWin":0.35,"probDraw":0.40,"probAwayWin":0.25,"expectedHomeGoals":1.3,"expectedAwayGoals":1.2,"league":"EPL"}]"#;
        let server = MockServer::start().await;
        mount_upstream(&server, ResponseTemplate::new(200).set_body_string(upstream_body)).await;

        let state = app_state(upstream(&server), Arc::new(ScriptedSource::new(vec![])));
        let resp = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/predictions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], upstream_body.as_bytes());
    }

    #[tokio::test]
    async fn test_proxy_passes_records_the_view_cannot_decode() {
        // naive kickoff time and a null xG value
        let upstream_body = r#"[{"matchId":"1","dateTime":"2026-10-19T19:00:00","expectedHomeGoals":null}]"#;
        let server = MockServer::start().await;
        mount_upstream(&server, ResponseTemplate::new(200).set_body_string(upstream_body)).await;

        let state = app_state(upstream(&server), Arc::new(ScriptedSource::new(vec![])));
        let (status, body) = get(router(state), "/api/predictions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, upstream_body);
    }

    #[tokio::test]
    async fn test_proxy_rejects_non_array_body() {
        let server = MockServer::start().await;
        mount_upstream(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "detail": "ok" })),
        )
        .await;

        let state = app_state(upstream(&server), Arc::new(ScriptedSource::new(vec![])));
        let (status, body) = get(router(state), "/api/predictions").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"], PROXY_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_proxy_maps_upstream_503_to_500() {
        let server = MockServer::start().await;
        mount_upstream(&server, ResponseTemplate::new(503).set_body_string("unavailable")).await;

        let state = app_state(upstream(&server), Arc::new(ScriptedSource::new(vec![])));
        let (status, body) = get(router(state), "/api/predictions").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"], PROXY_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_upstream_503_puts_view_in_error_with_retry() {
        let server = MockServer::start().await;
        mount_upstream(&server, ResponseTemplate::new(503)).await;

        // The page's view polls through the proxy, as in production.
        let proxied = app_state(upstream(&server), Arc::new(ScriptedSource::new(vec![])));
        let proxy_url = serve(proxied).await;
        let source = Arc::new(ProxyClient::new(proxy_url, Duration::from_secs(5)).unwrap());
        let state = app_state(upstream(&server), source);
        let view = state.view.clone();

        view.refresh().await;
        assert!(matches!(view.snapshot().await.state, ViewState::Error { .. }));

        let (status, html) = get(router(state), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"action="/retry""#));
    }

    #[tokio::test]
    async fn test_upstream_empty_list_renders_empty_state() {
        let server = MockServer::start().await;
        mount_upstream(&server, ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .await;

        let proxied = app_state(upstream(&server), Arc::new(ScriptedSource::new(vec![])));
        let proxy_url = serve(proxied).await;
        let source = Arc::new(ProxyClient::new(proxy_url, Duration::from_secs(5)).unwrap());
        let state = app_state(upstream(&server), source);
        state.view.refresh().await;

        let (_, html) = get(router(state), "/").await;
        assert!(html.contains(render::EMPTY_MESSAGE));
        assert!(!html.contains(r#"action="/retry""#));
    }

    #[tokio::test]
    async fn test_retry_refreshes_and_redirects() {
        let server = MockServer::start().await;
        let source = Arc::new(ScriptedSource::new(vec![
            Err(anyhow::anyhow!("down")),
            Ok(vec![]),
        ]));
        let state = app_state(upstream(&server), source.clone());
        let view = state.view.clone();
        view.refresh().await;

        let resp = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/retry")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");
        assert_eq!(source.calls(), 2);
        assert!(matches!(view.snapshot().await.state, ViewState::Loaded { .. }));
    }

    #[tokio::test]
    async fn test_view_endpoint_reports_state() {
        let server = MockServer::start().await;
        let state = app_state(upstream(&server), Arc::new(ScriptedSource::new(vec![])));
        let (status, body) = get(router(state), "/api/view").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "loading");
    }

    #[tokio::test]
    async fn test_placeholder_is_svg() {
        let server = MockServer::start().await;
        let state = app_state(upstream(&server), Arc::new(ScriptedSource::new(vec![])));
        let resp = router(state)
            .oneshot(
                Request::builder()
                    .uri("/placeholder.svg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/svg+xml");
    }
}
