//! Session controller tests against a mock backend.

use crate::common::{answer_json, drive_until, mount_idle_backend, wait_for_event};
use pretty_assertions::assert_eq;
use seekterm::api::BackendClient;
use seekterm::app::controller::SessionController;
use seekterm::app::events::AppEvent;
use seekterm::app::state::{ViewMode, STOPPING_STATUS, SUBMIT_ERROR, SUBMIT_ERROR_MESSAGE};
use seekterm::error::SeekError;
use seekterm::screenshot::ScreenshotSlot;
use seekterm::types::MessageKind;
use std::time::Duration;
use tracing_test::traced_test;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);
const FAST_POLL: Duration = Duration::from_millis(50);

fn controller_for(server: &MockServer) -> SessionController {
    SessionController::new(BackendClient::with_timeout(
        &server.uri(),
        Duration::from_secs(2),
    ))
}

// ============================================================================
// Submit
// ============================================================================

#[tokio::test]
async fn test_submit_input_success() {
    let server = MockServer::start().await;
    mount_idle_backend(&server).await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_json("Paris", "1")))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.state_mut().input = "capital of France?".to_string();

    assert!(controller.submit_input());
    assert!(controller.state().is_loading());
    assert_eq!(controller.state().messages()[0].kind, MessageKind::User);

    assert!(drive_until(&mut controller, WAIT, |c| !c.state().is_loading()).await);
    assert!(drive_until(&mut controller, WAIT, |c| c.state().is_online()).await);

    let state = controller.state();
    assert!(state.input.is_empty());
    assert_eq!(state.error(), None);
    assert_eq!(state.snapshot().answer, "Paris");
}

#[tokio::test]
#[traced_test]
async fn test_submit_failure_surfaces_error() {
    let server = MockServer::start().await;
    mount_idle_backend(&server).await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    assert!(controller.submit_query("break please"));
    assert!(drive_until(&mut controller, WAIT, |c| !c.state().is_loading()).await);

    let state = controller.state();
    assert_eq!(state.error(), Some(SUBMIT_ERROR));
    let errors: Vec<_> = state
        .messages()
        .iter()
        .filter(|m| m.kind == MessageKind::Error)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(errors, [SUBMIT_ERROR_MESSAGE]);
    assert!(logs_contain("Query failed"));
}

#[tokio::test]
async fn test_submit_to_unreachable_backend() {
    let mut controller = SessionController::new(BackendClient::with_timeout(
        "http://127.0.0.1:9",
        Duration::from_secs(2),
    ));

    assert!(controller.submit_query("anyone there?"));
    assert!(drive_until(&mut controller, WAIT, |c| !c.state().is_loading()).await);

    assert!(!controller.state().is_online());
    assert_eq!(controller.state().error(), Some(SUBMIT_ERROR));
}

#[tokio::test]
async fn test_blank_submit_issues_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.state_mut().input = "   ".to_string();

    assert!(!controller.submit_input());
    assert!(!controller.submit_query("\n\t"));
    assert!(controller.state().messages().is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(controller.try_next_event().is_none());
}

#[tokio::test]
async fn test_second_submit_ignored_while_loading() {
    let server = MockServer::start().await;
    mount_idle_backend(&server).await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(answer_json("slow", "1"))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    assert!(controller.submit_query("first"));
    assert!(!controller.submit_query("second"));

    assert!(drive_until(&mut controller, WAIT, |c| !c.state().is_loading()).await);
    assert_eq!(controller.state().messages().len(), 1);
}

// ============================================================================
// Stop
// ============================================================================

#[tokio::test]
async fn test_stop_failure_is_non_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stop"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.stop();

    assert_eq!(controller.state().status_text(), STOPPING_STATUS);
    assert!(drive_until(&mut controller, WAIT, |c| c.state().is_online()).await);

    // Give the stop request time to land before the mock verifies.
    tokio::time::sleep(Duration::from_millis(200)).await;
    controller.reap_finished();

    assert_eq!(controller.state().error(), None);
    assert!(controller.state().messages().is_empty());
}

// ============================================================================
// Polling
// ============================================================================

#[tokio::test]
async fn test_polling_reports_all_three_kinds() {
    let server = MockServer::start().await;
    mount_idle_backend(&server).await;

    let mut controller = controller_for(&server);
    controller.start_polling(FAST_POLL).unwrap();
    assert!(controller.is_polling());

    assert!(drive_until(&mut controller, WAIT, |c| c.state().is_online()).await);
    assert!(
        drive_until(&mut controller, WAIT, |c| matches!(
            c.state().snapshot().screenshot,
            ScreenshotSlot::Handle(_)
        ))
        .await
    );

    // 404 from /latest_answer produces no event and no message.
    assert!(controller.state().messages().is_empty());
    assert!(controller.select_view(ViewMode::Browser));

    let state = controller.shutdown().await;
    assert_eq!(state.snapshot().screenshot, ScreenshotSlot::Empty);
    assert_eq!(state.screenshots().live_handles(), 0);
}

#[tokio::test]
async fn test_polled_answer_is_appended_once() {
    let server = MockServer::start().await;
    mount_idle_backend(&server).await;
    Mock::given(method("GET"))
        .and(path("/latest_answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_json("Hello World.", "1")))
        .with_priority(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.start_polling(FAST_POLL).unwrap();

    for _ in 0..3 {
        wait_for_event(&mut controller, WAIT, |e| matches!(e, AppEvent::LatestAnswer(_)))
            .await
            .expect("latest answer event");
    }

    let agents: Vec<_> = controller
        .state()
        .messages()
        .iter()
        .filter(|m| m.kind == MessageKind::Agent)
        .map(|m| m.content.clone())
        .collect();
    assert_eq!(agents, ["Hello World."]);

    controller.shutdown().await;
}

#[tokio::test]
async fn test_offline_backend_marks_offline_and_keeps_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/screenshots/updated_screen.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.state_mut().set_online(true);
    controller.start_polling(FAST_POLL).unwrap();

    assert!(drive_until(&mut controller, WAIT, |c| !c.state().is_online()).await);

    for _ in 0..2 {
        wait_for_event(&mut controller, WAIT, |e| matches!(e, AppEvent::Screenshot(_)))
            .await
            .expect("screenshot event");
        assert_eq!(
            controller.state().snapshot().screenshot,
            ScreenshotSlot::Placeholder
        );
    }
    assert_eq!(controller.state().screenshots().released_count(), 0);

    controller.shutdown().await;
}

#[tokio::test]
async fn test_zero_poll_interval_is_rejected() {
    let server = MockServer::start().await;
    let mut controller = controller_for(&server);

    let err = controller.start_polling(Duration::ZERO).unwrap_err();

    assert!(matches!(err, SeekError::Config { .. }));
    assert!(!controller.is_polling());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(controller.try_next_event().is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_restart_keeps_existing_poller() {
    let server = MockServer::start().await;
    mount_idle_backend(&server).await;

    let mut controller = controller_for(&server);
    controller.start_polling(FAST_POLL).unwrap();
    assert!(controller.start_polling(Duration::ZERO).is_err());
    assert!(controller.is_polling());

    // Events keep flowing after the rejected restart.
    for _ in 0..2 {
        wait_for_event(&mut controller, WAIT, |e| matches!(e, AppEvent::Health { .. }))
            .await
            .expect("health event");
    }
    assert!(controller.state().is_online());

    controller.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_stops_polling() {
    let server = MockServer::start().await;
    mount_idle_backend(&server).await;

    let mut controller = controller_for(&server);
    controller.start_polling(FAST_POLL).unwrap();
    assert!(drive_until(&mut controller, WAIT, |c| c.state().is_online()).await);

    controller.shutdown().await;
    let seen = server.received_requests().await.unwrap().len();

    tokio::time::sleep(FAST_POLL * 4).await;
    assert_eq!(server.received_requests().await.unwrap().len(), seen);
}
