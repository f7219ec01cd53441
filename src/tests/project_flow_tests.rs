// src/tests/project_flow_tests.rs
use crate::tests::{test_app, test_state, unreachable_endpoint, SESSION};
use actix_web::test;
use serde_json::{json, Value};

#[actix_rt::test]
async fn lists_seeded_projects() {
    let state = test_state(&unreachable_endpoint());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/projects").to_request();
    let projects: Value = test::call_and_read_body_json(&app, req).await;

    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["name"], "Product Showcase");
    assert_eq!(projects[0]["status"], "completed");
    assert_eq!(projects[1]["status"], "processing");
    assert!(projects[1]["thumbnailUrl"].as_str().unwrap().starts_with("https://images.unsplash.com/"));
}

#[actix_rt::test]
async fn create_project_is_processing_and_selected() {
    let state = test_state(&unreachable_endpoint());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/projects")
        .insert_header(SESSION)
        .set_json(&json!({
            "name": "Sneaker",
            "description": "Running shoe scan",
            "previewImages": ["blob:one", "blob:two"]
        }))
        .to_request();
    let project: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(project["id"], "3");
    assert_eq!(project["name"], "Sneaker");
    assert_eq!(project["description"], "Running shoe scan");
    assert_eq!(project["status"], "processing");
    assert_eq!(project["thumbnailUrl"], "blob:one");

    let req = test::TestRequest::get().uri("/session").insert_header(SESSION).to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["view"], "detail");
    assert_eq!(view["project"]["id"], "3");
    assert_eq!(view["selectedProjectId"], "3");
    assert_eq!(view["generation"]["images"], json!(["blob:one", "blob:two"]));

    // Other tabs still see the list
    let req = test::TestRequest::get().uri("/session").to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["view"], "list");
    assert_eq!(view["projects"].as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn create_project_accepts_empty_fields() {
    let state = test_state(&unreachable_endpoint());
    let app = test_app!(state);

    let req = test::TestRequest::post().uri("/projects").set_json(&json!({})).to_request();
    let project: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(project["name"], "");
    assert_eq!(project["status"], "processing");
    assert!(project.get("thumbnailUrl").is_none());
}

#[actix_rt::test]
async fn unknown_project_is_404() {
    let state = test_state(&unreachable_endpoint());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/projects/77").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get().uri("/projects/77/generation").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn exports_require_a_model() {
    let state = test_state(&unreachable_endpoint());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/projects/1/exports").to_request();
    let exports: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(exports["available"], true);
    assert_eq!(exports["formats"][0]["name"], "GLB");
    assert_eq!(exports["formats"][1]["description"], "Filmbox 3D Format");

    let req = test::TestRequest::post().uri("/projects/1/exports/obj").to_request();
    let export: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(export["format"]["name"], "OBJ");

    let req = test::TestRequest::post().uri("/projects/1/exports/stl").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    // Project 2 is still processing
    let req = test::TestRequest::post().uri("/projects/2/exports/glb").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 409);
}
