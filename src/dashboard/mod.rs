pub mod render;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::api::FetchError;
use crate::view::derived::format_match_date;
use crate::view::{Tab, ViewController};

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ViewController>,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/tab/:tab", get(tab_handler))
        .route("/refresh", post(refresh_handler))
        .route("/matches/:id", get(match_handler))
        .route("/api/view", get(view_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Render the active tab.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(render::page(&state.controller.view_model().await))
}

/// GET /tab/{dashboard|history}
async fn tab_handler(
    State(state): State<Arc<AppState>>,
    Path(tab): Path<String>,
) -> Result<Redirect, (StatusCode, String)> {
    let tab: Tab = tab.parse().map_err(|e| (StatusCode::NOT_FOUND, e))?;
    state.controller.select_tab(tab).await;
    Ok(Redirect::to("/"))
}

/// POST /refresh: start a load cycle and return to the page, which shows the
/// loading indicator until the cycle settles.
async fn refresh_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Manual refresh requested");
    let controller = state.controller.clone();
    tokio::spawn(async move {
        controller.load_data().await;
    });
    Redirect::to("/")
}

/// GET /matches/{id}
async fn match_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let controller = &state.controller;
    match controller.source().get_match(id).await {
        Ok(m) => {
            let date = format_match_date(&m.date, &controller.settings().date_format);
            Ok(Html(render::match_detail(&m, &date)))
        }
        Err(FetchError::NotFound(_)) => Err((StatusCode::NOT_FOUND, format!("Match {} not found", id))),
        Err(e) => {
            error!("Error fetching match {}: {}", id, e);
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

/// GET /api/view
async fn view_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.view_model().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tests::{sample_correlations, sample_match, FakeSource};
    use crate::view::{ViewSettings, ViewState};
    use std::time::Duration;

    async fn spawn_dashboard(controller: Arc<ViewController>) -> String {
        let app = router(AppState { controller });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn no_redirects() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    fn controller() -> Arc<ViewController> {
        let source = Arc::new(FakeSource::new(vec![sample_match(1)], sample_correlations()));
        Arc::new(ViewController::new(source, ViewSettings::default()))
    }

    #[tokio::test]
    async fn test_tab_switch_redirects_and_updates_state() {
        let vc = controller();
        let base = spawn_dashboard(vc.clone()).await;

        let resp = no_redirects().get(format!("{}/tab/history", base)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
        assert_eq!(vc.snapshot().await.active_tab, Tab::History);

        let resp = no_redirects().get(format!("{}/tab/settings", base)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_refresh_loads_data() {
        let vc = controller();
        let base = spawn_dashboard(vc.clone()).await;

        let resp = no_redirects().post(format!("{}/refresh", base)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);

        let mut state: ViewState = vc.snapshot().await;
        for _ in 0..50 {
            if !state.loading {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            state = vc.snapshot().await;
        }
        assert!(!state.loading);
        assert_eq!(state.matches.len(), 1);
    }

    #[tokio::test]
    async fn test_view_json() {
        let vc = controller();
        vc.load_data().await;
        let base = spawn_dashboard(vc).await;

        let body: serde_json::Value = reqwest::get(format!("{}/api/view", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["active_tab"], "dashboard");
        assert_eq!(body["loading"], false);
        assert_eq!(body["dashboard"]["count_series"][0]["name"], "MS - 1");
        assert_eq!(body["dashboard"]["count_series"][0]["count"], 42);
        assert_eq!(body["history"][0]["full_time"], "2-1");
    }

    #[tokio::test]
    async fn test_match_detail_not_found() {
        let base = spawn_dashboard(controller()).await;
        let resp = reqwest::get(format!("{}/matches/404", base)).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        let resp = reqwest::get(format!("{}/matches/1", base)).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let html = resp.text().await.unwrap();
        assert!(html.contains("A vs B"));
    }
}
