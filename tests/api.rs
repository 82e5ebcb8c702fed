use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use tasksync_server::config::Config;
use tasksync_server::routes;
use tasksync_server::state::AppState;

fn server() -> TestServer {
    TestServer::new(routes::router(AppState::new(Config::default()))).unwrap()
}

async fn create(server: &TestServer, body: Value) -> Value {
    let response = server.post("/api/tasks").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["task"].clone()
}

#[tokio::test]
async fn test_create_update_conflict_scenario() {
    let server = server();
    let task = create(&server, json!({"title": "A"})).await;
    let id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["version"], 1);
    assert_eq!(task["createdAt"], task["updatedAt"]);

    let response = server
        .put(&format!("/api/tasks/{}", id))
        .json(&json!({"completed": true, "version": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["task"]["version"], 2);
    assert_eq!(body["task"]["completed"], true);

    let response = server
        .put(&format!("/api/tasks/{}", id))
        .json(&json!({"title": "B", "version": 1}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["conflict"], true);
    assert_eq!(body["serverTask"]["version"], 2);
    assert_eq!(body["serverTask"]["title"], "A");
}

#[tokio::test]
async fn test_create_requires_title() {
    let server = server();
    let response = server
        .post("/api/tasks")
        .json(&json!({"title": "   "}))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "VALIDATION");
}

#[tokio::test]
async fn test_duplicate_client_id_conflicts() {
    let server = server();
    create(&server, json!({"id": "offline-1", "title": "First"})).await;

    let response = server
        .post("/api/tasks")
        .json(&json!({"id": "offline-1", "title": "Second"}))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["serverTask"]["title"], "First");
}

#[tokio::test]
async fn test_get_and_delete() {
    let server = server();
    let task = create(&server, json!({"title": "A", "priority": "urgent"})).await;
    let path = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let response = server.get(&path).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["task"]["priority"], "urgent");

    let response = server
        .delete(&path)
        .add_query_param("version", 3)
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["serverTask"]["version"], 1);

    let response = server.delete(&path).add_query_param("version", 1).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["success"], true);

    let response = server.get(&path).expect_failure().await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.delete(&path).expect_failure().await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_task() {
    let server = server();
    let response = server
        .put("/api/tasks/ghost")
        .json(&json!({"completed": true}))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_incremental_listing() {
    let server = server();
    create(&server, json!({"title": "A"})).await;
    create(&server, json!({"title": "Other user", "userId": "bob"})).await;

    let response = server.get("/api/tasks").await;
    let body = response.json::<Value>();
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    let cursor = body["lastSync"].as_i64().unwrap();
    assert!(cursor > 0);
    assert!(body["serverTime"].as_i64().unwrap() >= cursor);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let b = create(&server, json!({"title": "B"})).await;

    let response = server
        .get("/api/tasks")
        .add_query_param("userId", "user1")
        .add_query_param("modifiedSince", cursor)
        .await;
    let body = response.json::<Value>();
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], b["id"]);
    assert_eq!(body["lastSync"], b["updatedAt"]);

    let response = server
        .get("/api/tasks")
        .add_query_param("userId", "bob")
        .await;
    assert_eq!(response.json::<Value>()["tasks"][0]["title"], "Other user");
}

#[tokio::test]
async fn test_sync_batch() {
    let server = server();
    let existing = create(&server, json!({"title": "Existing"})).await;

    let response = server
        .post("/api/sync/batch")
        .json(&json!({
            "operations": [
                {"type": "CREATE", "taskId": "n1", "data": {"id": "n1", "title": "New"}},
                {"type": "UPDATE", "taskId": existing["id"], "version": 1},
                {"type": "DELETE", "taskId": existing["id"], "version": 1},
                {"type": "ARCHIVE", "taskId": "n1"}
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert!(body["serverTime"].as_i64().unwrap() > 0);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[0]["task"]["id"], "n1");
    assert_eq!(results[1]["code"], "MISSING_DATA");
    assert_eq!(results[2]["success"], true);
    assert_eq!(results[3]["code"], "UNKNOWN_OPERATION");
    assert_eq!(results[3]["operation"]["type"], "ARCHIVE");
}

#[tokio::test]
async fn test_sync_batch_requires_array() {
    let server = server();
    let response = server
        .post("/api/sync/batch")
        .json(&json!({"operations": {"type": "CREATE"}}))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/sync/batch")
        .json(&json!({}))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_body_of_wrong_shape_is_json_error() {
    let server = server();
    let response = server
        .post("/api/sync/batch")
        .json(&json!("nope"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "VALIDATION");
    assert!(body["message"].is_string());

    let response = server
        .post("/api/sync/batch")
        .text("{\"operations\": [")
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_create_with_bad_field_types_is_json_error() {
    let server = server();
    for body in [
        json!({"title": "A", "priority": "critical"}),
        json!({"title": 5}),
    ] {
        let response = server
            .post("/api/tasks")
            .json(&body)
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION");
    }

    let task = create(&server, json!({"title": "A"})).await;
    let response = server
        .put(&format!("/api/tasks/{}", task["id"].as_str().unwrap()))
        .json(&json!({"completed": "yes"}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "VALIDATION");
}

#[tokio::test]
async fn test_zero_created_at_uses_server_time() {
    let server = server();
    let task = create(&server, json!({"title": "A", "createdAt": 0})).await;
    assert!(task["createdAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_sync_stats() {
    let server = server();
    let a = create(&server, json!({"title": "A"})).await;
    create(&server, json!({"title": "B"})).await;
    create(&server, json!({"title": "C"})).await;

    let response = server
        .put(&format!("/api/tasks/{}", a["id"].as_str().unwrap()))
        .json(&json!({"completed": true}))
        .await;
    let updated_at = response.json::<Value>()["task"]["updatedAt"].clone();

    let response = server
        .get("/api/sync/stats")
        .add_query_param("userId", "user1")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let stats = response.json::<Value>()["stats"].clone();
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["pending"], 2);
    assert_eq!(stats["lastSync"], updated_at);
}

#[tokio::test]
async fn test_health() {
    let server = server();
    let response = server.get("/api/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "tasksync-server");
}
