//! Helpers for driving controllers and servers in tests

use axum::Router;
use std::net::SocketAddr;
use std::sync::Once;
use stellar_insights_core::ViewState;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::{Duration, timeout};

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Wait until the controller leaves `Loading`
pub async fn wait_until_settled(rx: &mut watch::Receiver<ViewState>) -> ViewState {
    timeout(Duration::from_secs(5), rx.wait_for(|state| !state.is_loading()))
        .await
        .unwrap_or_else(|_| panic!("view state did not settle"))
        .unwrap_or_else(|e| panic!("controller dropped: {e}"))
        .clone()
}

/// Serve `app` on an ephemeral local port
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("Failed to bind test listener: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("No local address: {e}"));

    tokio::spawn(async move { axum::serve(listener, app).await });

    addr
}
