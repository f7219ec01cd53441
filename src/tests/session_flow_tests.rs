// src/tests/session_flow_tests.rs
use crate::config::ProgressConfig;
use crate::models::{GenerationStatus, ProjectStatus};
use crate::tests::{
    spawn_scripted_upload_endpoint, test_app, test_state, test_state_with_progress, unreachable_endpoint, SESSION,
};
use actix_web::test;
use serde_json::Value;
use std::time::Duration;

#[actix_rt::test]
async fn processing_project_completes_while_open() {
    let state = test_state(&unreachable_endpoint());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/session/select/2")
        .insert_header(SESSION)
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["view"], "detail");
    assert_eq!(view["modelAvailable"], false);
    assert_eq!(view["generation"]["status"], "processing");
    assert_eq!(view["progressRunning"], true);

    // step 25 every 5ms: four ticks to 100
    tokio::time::sleep(Duration::from_millis(200)).await;

    let req = test::TestRequest::get().uri("/session").insert_header(SESSION).to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["generation"]["status"], "completed");
    assert_eq!(view["generation"]["progress"], 100);
    assert_eq!(view["project"]["status"], "completed");
    assert_eq!(view["modelAvailable"], true);
    assert_eq!(view["progressRunning"], false);
    assert!(state.simulators.running_project("tab-1").unwrap().is_none());
}

#[actix_rt::test]
async fn progress_resumes_after_failed_upload_is_retried() {
    let endpoint = spawn_scripted_upload_endpoint(vec![
        (500, r#"{"error":"boom"}"#),
        (200, r#"{"message":"queued"}"#),
    ])
    .await;
    let config = ProgressConfig { step: 10, interval: Duration::from_millis(20) };
    let state = test_state_with_progress(&endpoint, config);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/session/select/2")
        .insert_header(SESSION)
        .to_request();
    test::call_service(&app, req).await;

    let upload = || {
        test::TestRequest::post()
            .uri("/projects/2/images/front.png")
            .insert_header(("Content-Type", "image/png"))
            .set_payload(vec![0x89, b'P', b'N', b'G', 1, 2, 3])
            .to_request()
    };

    let resp = test::call_service(&app, upload()).await;
    assert_eq!(resp.status(), 502);
    assert_eq!(state.generations.get("2").unwrap().unwrap().status, GenerationStatus::Failed);

    // The failed job stops the timer on its next tick
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(state.simulators.running_project("tab-1").unwrap().is_none());
    let stalled = state.generations.get("2").unwrap().unwrap().progress;
    assert!(stalled < 100);

    let resp = test::call_service(&app, upload()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["generation"]["status"], "processing");
    assert_eq!(state.simulators.running_project("tab-1").unwrap().as_deref(), Some("2"));

    // step 10 every 20ms: at most ten ticks to 100
    tokio::time::sleep(Duration::from_millis(600)).await;

    let job = state.generations.get("2").unwrap().unwrap();
    assert_eq!(job.status, GenerationStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(state.find_project("2").unwrap().status, ProjectStatus::Completed);
    assert!(state.simulators.running_project("tab-1").unwrap().is_none());
}

#[actix_rt::test]
async fn going_back_cancels_progress() {
    let slow = ProgressConfig { step: 2, interval: Duration::from_millis(20) };
    let state = test_state_with_progress(&unreachable_endpoint(), slow);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/session/select/2")
        .insert_header(SESSION)
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(state.simulators.running_project("tab-1").unwrap().as_deref(), Some("2"));

    let req = test::TestRequest::post()
        .uri("/session/back")
        .insert_header(SESSION)
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["view"], "list");
    assert!(view["selectedProjectId"].is_null());
    assert!(state.simulators.running_project("tab-1").unwrap().is_none());

    let progress_at_back = state.generations.get("2").unwrap().unwrap().progress;
    tokio::time::sleep(Duration::from_millis(60)).await;
    let job = state.generations.get("2").unwrap().unwrap();
    assert_eq!(job.progress, progress_at_back);
    assert_ne!(job.status, GenerationStatus::Completed);
}

#[actix_rt::test]
async fn completed_project_starts_no_timer() {
    let state = test_state(&unreachable_endpoint());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/session/select/1")
        .insert_header(SESSION)
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(view["modelAvailable"], true);
    assert!(state.simulators.running_project("tab-1").unwrap().is_none());
}

#[actix_rt::test]
async fn modal_and_team_panel_flags() {
    let state = test_state(&unreachable_endpoint());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/session/create-modal/open")
        .insert_header(SESSION)
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["showCreateModal"], true);

    let req = test::TestRequest::post()
        .uri("/session/team-panel/open")
        .insert_header(SESSION)
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["showTeamPanel"], true);
    assert_eq!(view["activeTeamId"], "1");

    let req = test::TestRequest::post()
        .uri("/session/create-modal/toggle")
        .insert_header(SESSION)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri("/session/team/8")
        .insert_header(SESSION)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::post()
        .uri("/session/select/8")
        .insert_header(SESSION)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}
