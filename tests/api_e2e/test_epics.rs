//! (3) Epic generation, lookup, deletion and story appends.

use crate::test_helpers::*;
use beanstalk_lib::services::GenerationLimiter;
use serde_json::{Value, json};
use std::time::Duration;

fn epic_ids(body: &Value) -> Vec<String> {
    body["epics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

/// (3a) Generating epics stores the batch and returns it.
#[actix_rt::test]
async fn test_generate_epics() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![epics_reply(
        &["Client directory", "Renewal reminders"],
        2,
    )]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;

    let (status, body) = post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["prdId"], prd.id);
    let epics = body["content"]["epics"].as_array().unwrap();
    assert_eq!(epics.len(), 2);
    assert_eq!(epics[1]["title"], "Renewal reminders");
    assert_eq!(epics[0]["userStories"].as_array().unwrap().len(), 2);
    assert_eq!(epics[0]["userStories"][0]["status"], "todo");

    let prompt = &ctx.model.prompts()[0];
    assert!(prompt.user.contains("Renewal tracker"));

    let (status, listed) = get_json(&app, &format!("/api/prds/{}/epics", prd.id)).await;
    assert_eq!(status, 200);
    assert_eq!(listed["epics"], body["content"]["epics"]);
    assert!(listed["generatedAt"].is_string());
}

/// (3b) Regenerating replaces the whole batch; old epic ids stop resolving.
#[actix_rt::test]
async fn test_regenerate_replaces_batch() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        epics_reply(&["One", "Two", "Three"], 1),
        epics_reply(&["Only"], 1),
    ]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;
    let uri = format!("/api/prds/{}/generate-epics", prd.id);

    let (_, first) = post_empty(&app, &uri).await;
    let old_ids = epic_ids(&first["content"]);
    assert_eq!(old_ids.len(), 3);

    let (status, second) = post_empty(&app, &uri).await;
    assert_eq!(status, 200);
    assert_eq!(epic_ids(&second["content"]).len(), 1);

    for id in old_ids {
        let (status, _) = get_json(&app, &format!("/api/epics/{}", id)).await;
        assert_eq!(status, 404);
    }
}

/// (3c) A failed regeneration keeps the previous batch.
#[actix_rt::test]
async fn test_failed_regeneration_keeps_old_batch() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        epics_reply(&["Keep me"], 2),
        json!({ "epics": [] }).to_string(),
        epics_reply(&["Storyless"], 0),
    ]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;
    let uri = format!("/api/prds/{}/generate-epics", prd.id);

    let (_, first) = post_empty(&app, &uri).await;

    let (status, body) = post_empty(&app, &uri).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "SCHEMA_VALIDATION_FAILED");

    let (status, _) = post_empty(&app, &uri).await;
    assert_eq!(status, 502);

    let (_, listed) = get_json(&app, &format!("/api/prds/{}/epics", prd.id)).await;
    assert_eq!(listed["epics"], first["content"]["epics"]);
}

/// (3d) Epic endpoints on unknown PRDs and epics are 404.
#[actix_rt::test]
async fn test_epic_not_found() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let app = create_test_app(ctx.state()).await;

    let (status, _) = post_empty(&app, "/api/prds/7/generate-epics").await;
    assert_eq!(status, 404);
    let (status, _) = get_json(&app, "/api/prds/7/epics").await;
    assert_eq!(status, 404);
    let (status, _) = get_json(&app, "/api/epics/no-such-epic").await;
    assert_eq!(status, 404);
    let (status, _) = delete(&app, "/api/epics/no-such-epic").await;
    assert_eq!(status, 404);
    let (status, _) = post_json(&app, "/api/epics/no-such-epic/add-story", json!({ "prompt": "export" })).await;
    assert_eq!(status, 404);
    assert!(ctx.model.prompts().is_empty());
}

/// (3e) Epics resolve to their parent PRD and can be deleted one at a time.
#[actix_rt::test]
async fn test_get_and_delete_epic() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![epics_reply(&["A", "B"], 1)]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;

    let (_, body) = post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;
    let ids = epic_ids(&body["content"]);

    let (status, found) = get_json(&app, &format!("/api/epics/{}", ids[0])).await;
    assert_eq!(status, 200);
    assert_eq!(found["prdId"], prd.id);
    assert_eq!(found["epic"]["title"], "A");

    let (status, _) = delete(&app, &format!("/api/epics/{}", ids[0])).await;
    assert_eq!(status, 200);

    let (_, listed) = get_json(&app, &format!("/api/prds/{}/epics", prd.id)).await;
    assert_eq!(epic_ids(&listed), vec![ids[1].clone()]);
}

/// (3f) Adding a story appends exactly one `todo` story.
#[actix_rt::test]
async fn test_add_story_appends() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        epics_reply(&["Reporting"], 3),
        story_reply("Export renewals"),
    ]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;

    let (_, body) = post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;
    let epic_id = epic_ids(&body["content"]).remove(0);

    let (status, added) = post_json(
        &app,
        &format!("/api/epics/{}/add-story", epic_id),
        json!({ "prompt": "  let brokers export renewals  " }),
    )
    .await;
    assert_eq!(status, 200, "{added}");
    assert_eq!(added["epicId"], epic_id.as_str());
    assert_eq!(added["prdId"], prd.id);
    assert_eq!(added["totalStories"], 4);
    assert_eq!(added["story"]["title"], "Export renewals");
    assert_eq!(added["story"]["status"], "todo");
    assert!(ctx.model.prompts()[1].user.contains("let brokers export renewals"));

    let (_, found) = get_json(&app, &format!("/api/epics/{}", epic_id)).await;
    let stories = found["epic"]["userStories"].as_array().unwrap();
    assert_eq!(stories.len(), 4);
    assert_eq!(stories[3]["id"], added["story"]["id"]);
}

/// (3g) Blank prompts and invalid stories leave the epic unchanged.
#[actix_rt::test]
async fn test_add_story_rejections() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        epics_reply(&["Reporting"], 1),
        json!({ "title": "", "description": "" }).to_string(),
    ]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;

    let (_, body) = post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;
    let epic_id = epic_ids(&body["content"]).remove(0);
    let uri = format!("/api/epics/{}/add-story", epic_id);

    let (status, _) = post_json(&app, &uri, json!({ "prompt": "   " })).await;
    assert_eq!(status, 400);

    let (status, _) = post_json(&app, &uri, json!({ "prompt": "something" })).await;
    assert_eq!(status, 502);

    let (_, found) = get_json(&app, &format!("/api/epics/{}", epic_id)).await;
    assert_eq!(found["epic"]["userStories"].as_array().unwrap().len(), 1);
}

/// (3g') Replies missing required story or epic fields are schema failures.
#[actix_rt::test]
async fn test_incomplete_replies_are_schema_failures() {
    let mut partial_batch: Value = serde_json::from_str(&epics_reply(&["Reporting"], 1)).unwrap();
    partial_batch["epics"][0].as_object_mut().unwrap().remove("goals");
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        partial_batch.to_string(),
        epics_reply(&["Reporting"], 1),
        json!({
            "title": "Export renewals",
            "description": "As a broker I want to export renewals to CSV",
            "priority": "low",
            "estimatedStoryPoints": 2
        })
        .to_string(),
    ]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;
    let uri = format!("/api/prds/{}/generate-epics", prd.id);

    let (status, body) = post_empty(&app, &uri).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "SCHEMA_VALIDATION_FAILED");
    assert!(body["details"][0].as_str().unwrap().contains("goals"));

    let (status, body) = post_empty(&app, &uri).await;
    assert_eq!(status, 200);
    let epic_id = epic_ids(&body["content"]).remove(0);

    let (status, body) = post_json(
        &app,
        &format!("/api/epics/{}/add-story", epic_id),
        json!({ "prompt": "export renewals" }),
    )
    .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "SCHEMA_VALIDATION_FAILED");
    assert!(body["details"][0].as_str().unwrap().contains("acceptanceCriteria"));

    let (_, found) = get_json(&app, &format!("/api/epics/{}", epic_id)).await;
    assert_eq!(found["epic"]["userStories"].as_array().unwrap().len(), 1);
}

/// (3h) Generation requests are rejected with 503 when no slot frees up.
#[actix_rt::test]
async fn test_saturated_limiter_returns_503() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![epics_reply(&["A"], 1)]));
    let prd = ctx.seed_prd("Renewals").await;
    let limiter = GenerationLimiter::new(1, Duration::from_millis(50));
    let app = create_test_app(ctx.state().with_limiter(limiter.clone())).await;

    let held = limiter.acquire("test").await.unwrap();
    let (status, body) = post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;
    assert_eq!(status, 503);
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
    assert!(ctx.model.prompts().is_empty());

    drop(held);
    let (status, _) = post_empty(&app, &format!("/api/prds/{}/generate-epics", prd.id)).await;
    assert_eq!(status, 200);
}
