use api::AppState;
use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use core_sim::{Market, SeededSource, SharedMarket};

use crate::config::Config;

pub fn build_market(config: &Config) -> SharedMarket {
    let source = config
        .seed
        .map(SeededSource::new)
        .unwrap_or_else(SeededSource::from_entropy);

    Market::new(&config.sim, Box::new(source)).into_shared()
}

pub fn build_app(market: SharedMarket) -> (Router, AppState) {
    let (api, state) = api::app_for_market(market);
    let app = api
        .route("/health", get(healthcheck))
        .route("/", get(index))
        .route("/static/styles.css", get(styles))
        .route("/static/app.js", get(script));

    (app, state)
}

async fn healthcheck() -> &'static str {
    "ok"
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], ui::styles_css())
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        ui::app_js(),
    )
}
