//! (6) Full upload to app flow through the real OpenAI-compatible client,
//! plus the service endpoints.

use crate::mock_openai::MockOpenAi;
use crate::test_helpers::*;
use beanstalk_lib::config::LlmSettings;
use beanstalk_lib::db::MemoryStore;
use beanstalk_lib::services::{LanguageModel, OpenAiClient};
use beanstalk_lib::state::AppState;
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;

fn client_for(mock: &MockOpenAi) -> Arc<dyn LanguageModel> {
    let settings = LlmSettings {
        api_key: SecretString::from("test-key".to_string()),
        base_url: format!("{}/", mock.base_url),
        model: "gpt-test".to_string(),
        timeout_secs: 10,
        repair_attempts: 0,
    };
    Arc::new(OpenAiClient::new(&settings).expect("client should build"))
}

/// (6a) Upload, epics, one extra story and the generated app, end to end.
#[actix_rt::test]
async fn test_full_flow_against_mock_model() {
    let mock = MockOpenAi::start().await;
    mock.reply_with(&format!("```json\n{}\n```", prd_reply("Renewal Radar")));
    mock.reply_with(&epics_reply(&["Client directory", "Renewal reminders"], 2));
    mock.reply_with(&story_reply("Export renewals"));

    let state = AppState::new(Arc::new(MemoryStore::new()), client_for(&mock))
        .expect("state should build");
    let app = create_test_app(state).await;

    let (status, body) = upload(
        &app,
        Some("kickoff.txt"),
        b"Broker: I need reminders before policies lapse.",
        &[("generateAcceptanceCriteria", "true")],
    )
    .await;
    assert_eq!(status, 201, "{body}");
    let prd_id = body["prd"]["id"].as_i64().unwrap();

    let (status, body) = post_empty(&app, &format!("/api/prds/{}/generate-epics", prd_id)).await;
    assert_eq!(status, 200, "{body}");
    let epic_id = body["content"]["epics"][1]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app,
        &format!("/api/epics/{}/add-story", epic_id),
        json!({ "prompt": "CSV export" }),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["totalStories"], 3);

    let (status, body) = post_empty(&app, &format!("/api/prds/{}/generate-app", prd_id)).await;
    assert_eq!(status, 200);
    let reminders = body["pages"][1]["content"].as_str().unwrap();
    assert!(reminders.contains("Export renewals"));
    assert!(body["readmeText"].as_str().unwrap().contains("Renewal Radar"));

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(request.authorization.as_deref(), Some("Bearer test-key"));
        assert_eq!(request.body["model"], "gpt-test");
        assert_eq!(request.body["response_format"]["type"], "json_object");
        assert_eq!(request.body["messages"][0]["role"], "system");
        assert_eq!(request.body["messages"][1]["role"], "user");
    }
    assert!(
        requests[0].body["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("reminders before policies lapse")
    );
}

/// (6b) Upstream API errors are reported as 502 with the provider's message.
#[actix_rt::test]
async fn test_upstream_error_is_reported() {
    let mock = MockOpenAi::start().await;
    mock.fail_with(401, "Incorrect API key provided");

    let state = AppState::new(Arc::new(MemoryStore::new()), client_for(&mock))
        .expect("state should build");
    let app = create_test_app(state).await;

    let (status, body) = post_json(
        &app,
        "/api/conversation/analyze-prompt",
        json!({ "transcript": "We keep missing policy renewals every month" }),
    )
    .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "UPSTREAM_GENERATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("Incorrect API key provided"));

    // Text prompts do not ask for JSON mode
    assert!(mock.requests()[0].body.get("response_format").is_none());
}

/// (6c) Health, readiness and the OpenAPI document.
#[actix_rt::test]
async fn test_service_endpoints() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get_json(&app, "/api/ready").await;
    assert_eq!(status, 200);
    assert_eq!(body["model"], "scripted-model");
    assert_eq!(body["availableGenerations"], 4);

    let (status, body) = get_json(&app, "/api/openapi.json").await;
    assert_eq!(status, 200);
    assert!(body["paths"]["/api/prds/{id}/generate-app"].is_object());
    assert!(body["paths"]["/api/conversation/analyze-insights"].is_object());
}
