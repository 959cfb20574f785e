//! Integration tests for the dashboard controller against real and mock sources

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use stellar_insights_core::{LOAD_FAILURE_MESSAGE, ViewState};
use stellar_insights_web::mock::MockAnalyticsSource;
use stellar_insights_web::view::{DashboardView, ReadyView};
use stellar_insights_web::{AnalyticsSource, ApiClient, DashboardController};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DASHBOARD_PATH: &str = "/api/analytics/dashboard";

fn http_controller(server: &MockServer, request_timeout: Option<Duration>) -> DashboardController {
    let client = ApiClient::new(format!("{}{DASHBOARD_PATH}", server.uri()), 5_000).unwrap();
    DashboardController::new(Arc::new(client), request_timeout)
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |requests| requests.len())
}

fn ready_view(state: &ViewState) -> ReadyView {
    match DashboardView::from_state(state) {
        DashboardView::Ready(view) => *view,
        other => panic!("expected ready view, got {other:?}"),
    }
}

/// Success scenario end to end over HTTP
#[tokio::test]
async fn test_success_scenario_over_http() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DASHBOARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(scenario_json()))
        .expect(1)
        .mount(&server)
        .await;

    let controller = http_controller(&server, None);
    let mut rx = controller.subscribe();
    controller.initialize().unwrap();

    let state = wait_until_settled(&mut rx).await;
    assert_eq!(state.snapshot(), Some(&scenario_snapshot()));

    let view = ready_view(&state);
    assert_eq!(view.cards[0].value, "$2.5M");
    assert_eq!(view.rows[0].corridor, "US-MX");
    assert_eq!(view.rows[0].success_rate, "97%");
    assert_eq!(view.rows[0].volume, "$15K");
    assert_eq!(view.rows[0].health_width, "90%");
    assert_eq!(view.rows[0].status, "Healthy");
}

/// Any failure collapses to the same message and no data is shown
#[tokio::test]
async fn test_failures_collapse_to_one_message() {
    init_test_logging();

    let responses = [
        ResponseTemplate::new(500),
        ResponseTemplate::new(404),
        ResponseTemplate::new(200).set_body_string("not json"),
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"stats": {}})),
    ];

    for response in responses {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(response)
            .mount(&server)
            .await;

        let controller = http_controller(&server, None);
        let mut rx = controller.subscribe();
        controller.initialize().unwrap();

        let state = wait_until_settled(&mut rx).await;
        assert_eq!(
            state,
            ViewState::Error {
                message: LOAD_FAILURE_MESSAGE.to_string()
            }
        );
        assert!(matches!(
            DashboardView::from_state(&state),
            DashboardView::Failed { .. }
        ));
    }
}

/// Retry from the error state re-enters loading and issues one request
#[tokio::test]
async fn test_retry_after_failure_over_http() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scenario_json()))
        .mount(&server)
        .await;

    let controller = http_controller(&server, None);
    let mut rx = controller.subscribe();

    controller.initialize().unwrap();
    assert!(matches!(wait_until_settled(&mut rx).await, ViewState::Error { .. }));
    assert_eq!(request_count(&server).await, 1);

    controller.retry().unwrap();
    assert_eq!(controller.state(), ViewState::Loading);

    let state = wait_until_settled(&mut rx).await;
    assert!(state.snapshot().is_some());
    assert_eq!(request_count(&server).await, 2);
}

/// Rapid re-initialization issues a single request
#[tokio::test]
async fn test_repeated_initialize_issues_one_request() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(scenario_json())
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let controller = http_controller(&server, None);
    let mut rx = controller.subscribe();

    for _ in 0..5 {
        controller.initialize().unwrap();
    }

    wait_until_settled(&mut rx).await;
    assert_eq!(request_count(&server).await, 1);
}

/// Teardown while the request is outstanding leaves the state untouched
#[tokio::test]
async fn test_dispose_during_slow_request() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(scenario_json())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let controller = http_controller(&server, None);
    controller.initialize().unwrap();

    let mut rx = controller.subscribe();
    rx.borrow_and_update();
    controller.dispose();

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(!rx.has_changed().unwrap());
    assert_eq!(controller.state(), ViewState::Loading);
}

/// The controller's own timeout turns a hung source into an error
#[tokio::test]
async fn test_controller_timeout_over_http() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(scenario_json())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let controller = http_controller(&server, Some(Duration::from_millis(50)));
    let mut rx = controller.subscribe();
    controller.initialize().unwrap();

    assert_eq!(wait_until_settled(&mut rx).await, ViewState::load_failed());
}

/// A response belonging to a superseded attempt never lands
#[tokio::test]
async fn test_superseded_response_is_discarded() {
    init_test_logging();

    let source = Arc::new(MockAnalyticsSource::failing("first attempt").gated());
    let controller =
        DashboardController::new(Arc::clone(&source) as Arc<dyn AnalyticsSource>, None);
    let mut rx = controller.subscribe();

    controller.initialize().unwrap();
    controller.retry().unwrap();
    source.succeed_with(snapshot_with_corridors(vec![corridor("EU-NG", 88.5, 2_499.0, 75.0)]));
    source.release(2);

    let state = wait_until_settled(&mut rx).await;
    let view = ready_view(&state);

    assert_eq!(view.rows[0].corridor, "EU-NG");
    assert_eq!(view.rows[0].success_rate, "88.5%");
    assert_eq!(view.rows[0].volume, "$2K");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(controller.state(), state);
}

/// Each snapshot replaces the previous one wholesale
#[tokio::test]
async fn test_new_snapshot_replaces_old_one() {
    init_test_logging();

    let source = Arc::new(MockAnalyticsSource::succeeding(scenario_snapshot()));
    let controller =
        DashboardController::new(Arc::clone(&source) as Arc<dyn AnalyticsSource>, None);
    let mut rx = controller.subscribe();

    controller.initialize().unwrap();
    let first = wait_until_settled(&mut rx).await;
    assert_eq!(first.snapshot().unwrap().corridor_performance.len(), 1);

    let replacement = snapshot_with_corridors(vec![
        corridor("BR-AR", 91.0, 1_500.0, 60.0),
        corridor("PH-SG", 99.0, 2_500.0, 100.0),
    ]);
    source.succeed_with(replacement.clone());
    controller.retry().unwrap();

    let second = wait_until_settled(&mut rx).await;
    assert_eq!(second.snapshot(), Some(&replacement));
    assert_eq!(first.snapshot(), Some(&scenario_snapshot()));

    let labels: Vec<String> = ready_view(&second)
        .rows
        .into_iter()
        .map(|row| row.corridor)
        .collect();
    assert_eq!(labels, vec!["BR-AR", "PH-SG"]);
    assert_eq!(ready_view(&second).rows[1].volume, "$3K");
}
