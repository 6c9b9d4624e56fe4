//! Recommendations end to end: demo dataset, insight engine and the HTTP
//! reason generator against a mock service.

use std::path::PathBuf;
use std::sync::Arc;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gradelens_core::model::Trend;
use gradelens_core::InsightEngine;
use gradelens_reason::{create_generator, MockReasonGenerator, ReasonConfig};
use gradelens_store::MemoryStore;

fn store() -> Arc<MemoryStore> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../datasets/demo-school.json");
    Arc::new(MemoryStore::open(&path).unwrap())
}

#[tokio::test]
async fn remote_reasons_with_partial_outage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reason"))
        .and(body_partial_json(serde_json::json!({"course": "Math", "studentId": 2})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"reason": "Rebuild number sense with daily drills."})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/reason"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model offline"))
        .mount(&server)
        .await;

    let generator = create_generator(&ReasonConfig {
        enabled: true,
        proxy_url: format!("{}/reason", server.uri()),
        ..ReasonConfig::default()
    })
    .unwrap();
    assert_eq!(generator.name(), "http");

    let store = store();
    let engine = InsightEngine::new(store.clone(), store).with_reason_generator(generator);
    let result = engine.student_recommendations(2).await.unwrap();

    assert_eq!(result.student_name, "Brian Liu");
    assert_eq!(result.recommendations.len(), 3);

    let math = &result.recommendations[0];
    assert_eq!(math.course_name, "Math");
    assert_eq!(math.trend, Trend::Falling);
    assert_eq!(math.trend_delta, -10.0);
    assert_eq!(math.class_average, 77.0);
    assert_eq!(math.difference_with_class_avg, -22.0);
    assert_eq!(math.reason, "Rebuild number sense with daily drills.");

    let physics = &result.recommendations[2];
    assert_eq!(physics.course_name, "Physics");
    assert_eq!(physics.trend, Trend::Stable);
    assert_eq!(physics.difference_with_class_avg, -12.0);
    assert!(physics.reason.starts_with("Below the class average in Physics"));
}

#[tokio::test]
async fn mock_generator_sees_reason_context() {
    let generator = Arc::new(MockReasonGenerator::with_fixed_response("Stay consistent."));
    let store = store();
    let engine = InsightEngine::new(store.clone(), store).with_reason_generator(generator.clone());

    let result = engine.student_recommendations(4).await.unwrap();
    assert_eq!(result.recommendations.len(), 3);
    assert!(result
        .recommendations
        .iter()
        .all(|r| r.reason == "Stay consistent."));
    assert_eq!(generator.call_count(), 3);

    let last = generator.last_context().unwrap();
    assert_eq!(last.student_name, "Deepak Rao");
    assert!(!last.materials.is_empty());
}

#[tokio::test]
async fn disabled_config_uses_local_fallback() {
    let generator = create_generator(&ReasonConfig::default()).unwrap();
    let store = store();
    let engine = InsightEngine::new(store.clone(), store).with_reason_generator(generator);

    let result = engine.student_recommendations(5).await.unwrap();
    let english = result
        .recommendations
        .iter()
        .find(|r| r.course_name == "English")
        .unwrap();
    assert_eq!(english.trend, Trend::Falling);
    assert!(english.reason.starts_with("Below the class average in English"));
    assert_eq!(engine.reason_generator(), "local");
}
