//! Page handlers for serving the dashboard

use crate::error::WebResult;
use crate::html::render_page;
use crate::state::AppState;
use axum::{
    extract::State,
    response::{Html, Redirect},
};
use std::sync::Arc;

/// Dashboard page for the current view state
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let current = state.controller.current_update();
    Html(render_page(&current.state, current.revision))
}

/// Retry control: restart the fetch, then reload the page
pub async fn retry(State(state): State<Arc<AppState>>) -> WebResult<Redirect> {
    state.controller.retry()?;
    Ok(Redirect::to("/"))
}
