//! (4) React project generation from a PRD's epics.

use crate::test_helpers::*;
use beanstalk_lib::services::llm::GenerationError;
use serde_json::Value;

fn paths(files: &Value) -> Vec<String> {
    files
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap().to_string())
        .collect()
}

/// (4a) Code generation is refused until epics exist.
#[actix_rt::test]
async fn test_generate_app_requires_epics() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;

    let (status, body) = post_empty(&app, &format!("/api/prds/{}/generate-app", prd.id)).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "PRECONDITION_FAILED");
    assert!(body["message"].as_str().unwrap().contains("no epics"));

    let (status, _) = post_empty(&app, "/api/prds/99/generate-app").await;
    assert_eq!(status, 404);
}

/// (4b) Templated generation writes one page per epic and never calls the model.
#[actix_rt::test]
async fn test_templated_project() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![epics_reply(
        &["Client directory", "Renewal reminders", "Reports"],
        2,
    )]));
    let prd = ctx.seed_prd("Renewal Radar").await;
    let app = create_test_app(ctx.state()).await;
    post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;

    let (status, body) = post_empty(&app, &format!("/api/prds/{}/generate-app", prd.id)).await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["appName"], "Renewal Radar");
    assert_eq!(body["generationMode"], "templated");
    assert_eq!(
        paths(&body["pages"]),
        vec![
            "src/pages/ClientDirectoryPage.tsx",
            "src/pages/RenewalRemindersPage.tsx",
            "src/pages/ReportsPage.tsx",
        ]
    );
    assert!(paths(&body["components"]).contains(&"src/App.tsx".to_string()));
    assert!(paths(&body["config"]).contains(&"package.json".to_string()));
    assert_eq!(body["packageManifest"]["name"], "renewal-radar");

    let page = body["pages"][1]["content"].as_str().unwrap();
    assert!(page.contains("Renewal reminders story 2"));
    assert!(body["readmeText"].as_str().unwrap().contains("# Renewal Radar"));
    assert!(body["deployNotes"].as_str().unwrap().contains("/renewal-reminders"));

    // Only the epic generation prompt reached the model
    assert_eq!(ctx.model.prompts().len(), 1);
}

/// (4c) The generate-code alias and explicit mode values behave the same.
#[actix_rt::test]
async fn test_alias_and_mode_validation() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![epics_reply(&["Inbox"], 1)]));
    let prd = ctx.seed_prd("Mailer").await;
    let app = create_test_app(ctx.state()).await;
    post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;

    let (status, first) = post_empty(&app, &format!("/api/prds/{}/generate-code", prd.id)).await;
    assert_eq!(status, 200);
    let (status, second) =
        post_empty(&app, &format!("/api/prds/{}/generate-app?mode=templated", prd.id)).await;
    assert_eq!(status, 200);
    assert_eq!(first["pages"], second["pages"]);

    let (status, body) =
        post_empty(&app, &format!("/api/prds/{}/generate-app?mode=magic", prd.id)).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("magic"));
}

/// (4d) Model-assisted mode replaces page bodies with the model's code.
#[actix_rt::test]
async fn test_model_assisted_pages() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        epics_reply(&["Inbox", "Settings"], 1),
        "```tsx\nexport default function InboxPage() { return <main>Inbox</main>; }\n```".to_string(),
        "export default function SettingsPage() { return <main>Settings</main>; }".to_string(),
    ]));
    let prd = ctx.seed_prd("Mailer").await;
    let app = create_test_app(ctx.state()).await;
    post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;

    let (status, body) = post_empty(
        &app,
        &format!("/api/prds/{}/generate-app?mode=model_assisted", prd.id),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["generationMode"], "model_assisted");
    assert_eq!(
        body["pages"][0]["content"],
        "export default function InboxPage() { return <main>Inbox</main>; }\n"
    );
    assert!(body["pages"][1]["content"].as_str().unwrap().contains("SettingsPage"));

    let prompts = ctx.model.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(!prompts[1].json_output);
}

/// (4e) The server default mode applies when no mode is given, and model
/// failures surface as 502.
#[actix_rt::test]
async fn test_model_assisted_default_and_failure() {
    let ctx = TestContext::new(ScriptedModel::new(vec![
        Ok(epics_reply(&["Inbox"], 1)),
        Err(GenerationError::Api {
            status: 429,
            message: "rate limited".to_string(),
        }),
    ]));
    let prd = ctx.seed_prd("Mailer").await;
    let app = create_test_app(ctx.state().with_model_assisted_codegen(true)).await;
    post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;

    let (status, body) = post_empty(&app, &format!("/api/prds/{}/generate-app", prd.id)).await;
    assert_eq!(status, 502);
    assert!(body["message"].as_str().unwrap().contains("rate limited"));
    assert_eq!(ctx.model.prompts().len(), 2);
}
