//! (5) Live discovery conversation endpoints.

use crate::test_helpers::*;
use serde_json::json;

const SHORT_TRANSCRIPT: &str = "We keep missing policy renewals every month";

fn long_transcript() -> String {
    "Broker: renewals slip through the cracks because reminders live in my inbox. ".repeat(3)
}

/// (5a) Follow-up questions come back trimmed with transcript statistics.
#[actix_rt::test]
async fn test_analyze_prompt() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        "  Who feels this pain most?\n".to_string(),
    ]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = post_json(
        &app,
        "/api/conversation/analyze-prompt",
        json!({ "transcript": format!("  {}  ", SHORT_TRANSCRIPT) }),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["prompt"], "Who feels this pain most?");
    assert_eq!(body["analysis"]["phase"], "discovery");
    assert_eq!(body["analysis"]["wordCount"], 7);
    assert_eq!(
        body["analysis"]["transcriptLength"],
        SHORT_TRANSCRIPT.chars().count()
    );

    let prompts = ctx.model.prompts();
    assert!(!prompts[0].json_output);
    assert!(prompts[0].user.contains(SHORT_TRANSCRIPT));
}

/// (5b) Transcripts under the minimum length are rejected before the model.
#[actix_rt::test]
async fn test_short_transcripts_rejected() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = post_json(
        &app,
        "/api/conversation/analyze-prompt",
        json!({ "transcript": "too short", "phase": "users" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");

    let (status, _) = post_json(
        &app,
        "/api/conversation/analyze-insights",
        json!({ "transcript": SHORT_TRANSCRIPT }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post_json(&app, "/api/conversation/analyze-insights", json!({})).await;
    assert_eq!(status, 400);

    assert!(ctx.model.prompts().is_empty());
}

/// (5c) Insights are typed; missing sections default to empty.
#[actix_rt::test]
async fn test_analyze_insights() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![json!({
        "keyThemes": ["renewal tracking"],
        "painPoints": ["reminders buried in email"],
        "userPersonas": [{ "name": "Broker Bea", "needs": ["timely reminders"] }]
    })
    .to_string()]));
    let app = create_test_app(ctx.state()).await;

    let transcript = long_transcript();
    let (status, body) = post_json(
        &app,
        "/api/conversation/analyze-insights",
        json!({ "transcript": transcript }),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["insights"]["keyThemes"], json!(["renewal tracking"]));
    assert_eq!(body["insights"]["userPersonas"][0]["name"], "Broker Bea");
    assert_eq!(body["insights"]["missingInformation"], json!([]));
    assert_eq!(
        body["metadata"]["transcriptLength"],
        transcript.trim().chars().count()
    );
    assert!(body["metadata"]["analysisTimestamp"].is_string());
    assert!(ctx.model.prompts()[0].json_output);
}

/// (5d) Insights without any theme are a schema failure.
#[actix_rt::test]
async fn test_insights_without_themes_rejected() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        json!({ "painPoints": ["x"] }).to_string(),
    ]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = post_json(
        &app,
        "/api/conversation/analyze-insights",
        json!({ "transcript": long_transcript() }),
    )
    .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "SCHEMA_VALIDATION_FAILED");
}
