//! Query surface integration tests
//!
//! Binds the API server on an ephemeral port and exercises the three read
//! operations over real HTTP.

use std::sync::Arc;

use eduscout::cache::SnapshotStore;
use eduscout::config::Config;
use eduscout::models::{Conference, Course};
use eduscout::server::ApiServer;

async fn spawn_server(store: Arc<SnapshotStore>) -> String {
    let config = Config::default();
    let server = ApiServer::new(config.server, store);
    let router = server.build_router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_health_always_ok() {
    let base = spawn_server(Arc::new(SnapshotStore::new())).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_empty_store_serves_empty_arrays() {
    let base = spawn_server(Arc::new(SnapshotStore::new())).await;

    let courses: Vec<Course> = reqwest::get(format!("{base}/courses"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(courses.is_empty());

    let conferences: Vec<Conference> = reqwest::get(format!("{base}/conferences"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(conferences.is_empty());
}

#[tokio::test]
async fn test_populated_store_serves_full_snapshot() {
    let store = Arc::new(SnapshotStore::new());
    store
        .courses
        .replace_if_non_empty(vec![
            Course {
                title: "Algebra for Teachers".to_string(),
                url: "https://courses.example.org/learn/algebra".to_string(),
            },
            Course {
                title: "Geometry".to_string(),
                url: "https://courses.example.org/learn/geometry".to_string(),
            },
        ])
        .await;
    store
        .conferences
        .replace_if_non_empty(vec![Conference {
            title: "EduTech Summit".to_string(),
            date: "10 Jan 2026".to_string(),
            location: "Bengaluru, Karnataka".to_string(),
            link: "https://events.example.org/event/1".to_string(),
        }])
        .await;

    let base = spawn_server(store).await;

    let courses: Vec<Course> = reqwest::get(format!("{base}/courses"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].title, "Algebra for Teachers");
    assert_eq!(courses[1].title, "Geometry");

    let conferences: Vec<Conference> = reqwest::get(format!("{base}/conferences"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(conferences.len(), 1);
    assert_eq!(conferences[0].location, "Bengaluru, Karnataka");
}

#[tokio::test]
async fn test_wire_format_field_names() {
    let store = Arc::new(SnapshotStore::new());
    store
        .conferences
        .replace_if_non_empty(vec![Conference {
            title: "EduTech Summit".to_string(),
            date: "10 Jan 2026".to_string(),
            location: "Bengaluru".to_string(),
            link: "https://events.example.org/event/1".to_string(),
        }])
        .await;

    let base = spawn_server(store).await;

    let body: serde_json::Value = reqwest::get(format!("{base}/conferences"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        serde_json::json!([{
            "title": "EduTech Summit",
            "date": "10 Jan 2026",
            "location": "Bengaluru",
            "link": "https://events.example.org/event/1"
        }])
    );
}
