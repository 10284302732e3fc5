//! Full pipeline against a mock Gemini endpoint

use market_potential::{AppConfig, OrchestratorBuilder, RequestStatus};
use mockito::{Matcher, Server};
use serde_json::json;

fn candidate(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

fn config(base_url: String) -> AppConfig {
    AppConfig {
        api_key: Some("test-key".into()),
        base_url,
        model_candidates: vec!["gemini-retired".into(), "gemini-test".into()],
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn test_pipeline_over_http_with_candidate_fallback() {
    let mut server = Server::new_async().await;

    let retired = server
        .mock("POST", "/v1beta/models/gemini-retired:generateContent")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(404)
        .with_body(
            json!({"error": {"code": 404, "message": "models/gemini-retired is not found", "status": "NOT_FOUND"}})
                .to_string(),
        )
        .expect(3)
        .create_async()
        .await;

    let validation = server
        .mock("POST", "/v1beta/models/gemini-test:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("isValid".into()))
        .with_status(200)
        .with_body(candidate(r#"{"isValid": true, "reason": "known locality"}"#))
        .expect(1)
        .create_async()
        .await;

    let ambiguity = server
        .mock("POST", "/v1beta/models/gemini-test:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("isAmbiguous".into()))
        .with_status(200)
        .with_body(candidate(r#"{"isAmbiguous": false, "suggestedCities": []}"#))
        .expect(1)
        .create_async()
        .await;

    let analysis = server
        .mock("POST", "/v1beta/models/gemini-test:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("connectivity".into()),
            Matcher::PartialJson(json!({
                "generationConfig": {"temperature": 0.0, "topK": 1, "candidateCount": 1}
            })),
        ]))
        .with_status(200)
        .with_body(candidate(
            &json!({
                "breakdown": {"connectivity": 100, "healthcare": 100, "education": 100, "retail": 100, "employment": 100},
                "infrastructure": [
                    {"name": "Hinjewadi Phase 1", "category": "office", "distance": 4.2},
                    {"name": "Metro", "category": "metro", "distance": 0.1}
                ],
                "summary": "IT corridor."
            })
            .to_string(),
        ))
        .expect(1)
        .create_async()
        .await;

    let orchestrator = OrchestratorBuilder::from_config(&config(server.url()))
        .unwrap()
        .build()
        .await
        .unwrap();
    let id = orchestrator.submit("Pune", "Wakad").unwrap().id;
    let record = orchestrator.fetch(&id).await.unwrap();

    assert_eq!(record.status, RequestStatus::Done);
    assert_eq!(record.error, None);
    let result = record.result.unwrap();
    assert_eq!(result.overall_score, 85.0);
    // "Metro" is a placeholder; one real item plus backfill.
    assert!(result.infrastructure.iter().all(|i| i.name != "Metro"));
    assert!(result.infrastructure.iter().any(|i| i.name == "Hinjewadi Phase 1"));
    assert_eq!(result.infrastructure.len(), 5);

    retired.assert_async().await;
    validation.assert_async().await;
    ambiguity.assert_async().await;
    analysis.assert_async().await;
}

#[tokio::test]
async fn test_upstream_outage_yields_fallback_record() {
    let mut server = Server::new_async().await;
    let _outage = server
        .mock("POST", Matcher::Regex(r"^/v1beta/models/.*:generateContent$".into()))
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body(json!({"error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}}).to_string())
        .create_async()
        .await;

    let orchestrator = OrchestratorBuilder::from_config(&config(server.url()))
        .unwrap()
        .build()
        .await
        .unwrap();
    let id = orchestrator.submit("Pune", "Wakad").unwrap().id;
    let record = orchestrator.fetch(&id).await.unwrap();

    assert_eq!(record.status, RequestStatus::Done);
    assert!(record.error.unwrap().contains("503"));
    assert!(record.result.is_some());
}
