//! Training workflow and cache control tests.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{image, test_analyzer};
use crate::config::DispatchPolicy;
use crate::error::Error;
use crate::types::Event;

#[tokio::test]
async fn train_submits_session_and_returns_acknowledgement() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/train"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Trained on 2 images"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = test_analyzer(&server, DispatchPolicy::SequentialPerItem);
    analyzer
        .select_files(vec![image("a.png"), image("b.png")])
        .await
        .unwrap();
    let mut events = analyzer.subscribe();

    let message = analyzer.train("auburn").await.unwrap();
    assert_eq!(message, "Trained on 2 images");

    match events.recv().await.unwrap() {
        Event::TrainingComplete { color_name, message } => {
            assert_eq!(color_name, "auburn");
            assert_eq!(message, "Trained on 2 images");
        }
        other => panic!("expected TrainingComplete, got {other:?}"),
    }
}

#[tokio::test]
async fn train_without_session_is_an_error() {
    let server = MockServer::start().await;
    let analyzer = test_analyzer(&server, DispatchPolicy::SequentialPerItem);

    let err = analyzer.train("auburn").await.unwrap_err();
    assert!(matches!(err, Error::NoSession));
}

#[tokio::test]
async fn train_surfaces_service_detail_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/train"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "color_name is required"})),
        )
        .mount(&server)
        .await;

    let analyzer = test_analyzer(&server, DispatchPolicy::SequentialPerItem);
    analyzer.select_files(vec![image("a.png")]).await.unwrap();

    let err = analyzer.train("").await.unwrap_err();
    match err {
        Error::Service { message, status } => {
            assert_eq!(message, "color_name is required");
            assert_eq!(status, Some(400));
        }
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[tokio::test]
async fn trained_colors_parses_wrapper() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trained-colors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trained_colors": [
                {"id": "c1", "name": "auburn", "reference_colors": ["#a52a2a"]},
                {"id": "c2", "name": "jet black"}
            ]
        })))
        .mount(&server)
        .await;

    let analyzer = test_analyzer(&server, DispatchPolicy::SequentialPerItem);
    let colors = analyzer.trained_colors().await.unwrap();

    assert_eq!(colors.len(), 2);
    assert_eq!(colors[0].name, "auburn");
    assert_eq!(colors[0].reference_colors, vec!["#a52a2a"]);
    assert!(colors[1].reference_colors.is_empty());
}

#[tokio::test]
async fn clear_cache_resets_the_local_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/clear-cache"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = test_analyzer(&server, DispatchPolicy::SequentialPerItem);
    analyzer
        .select_files(vec![image("a.png"), image("b.png")])
        .await
        .unwrap();
    let mut events = analyzer.subscribe();

    analyzer.clear_cache().await.unwrap();

    assert!(analyzer.session_id().await.is_none());
    assert_eq!(analyzer.live_previews(), 0);

    // SessionCleared for the local reset, then CacheCleared.
    match events.recv().await.unwrap() {
        Event::SessionCleared { .. } => {}
        other => panic!("expected SessionCleared, got {other:?}"),
    }
    match events.recv().await.unwrap() {
        Event::CacheCleared => {}
        other => panic!("expected CacheCleared, got {other:?}"),
    }
}

#[tokio::test]
async fn clear_cache_failure_keeps_the_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/clear-cache"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "cache locked"})))
        .mount(&server)
        .await;

    let analyzer = test_analyzer(&server, DispatchPolicy::SequentialPerItem);
    analyzer.select_files(vec![image("a.png")]).await.unwrap();

    let err = analyzer.clear_cache().await.unwrap_err();
    assert!(matches!(err, Error::Service { .. }));
    assert!(
        analyzer.session_id().await.is_some(),
        "a failed server-side clear must not wipe the local session"
    );
    assert_eq!(analyzer.live_previews(), 1);
}
