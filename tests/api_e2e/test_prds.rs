//! (1) PRD management: listing, lookup, partial updates and deletion.

use crate::test_helpers::*;
use serde_json::json;

/// (1a) PRDs are listed newest first.
#[actix_rt::test]
async fn test_list_prds_newest_first() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    ctx.seed_prd("First").await;
    ctx.seed_prd("Second").await;
    let app = create_test_app(ctx.state()).await;

    let (status, body) = get_json(&app, "/api/prds").await;
    assert_eq!(status, 200);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

/// (1b) A stored PRD comes back with camelCase content and no epics.
#[actix_rt::test]
async fn test_get_prd_returns_stored_record() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;

    let (status, body) = get_json(&app, &format!("/api/prds/{}", prd.id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["title"], "Renewals");
    assert_eq!(body["status"], "complete");
    assert_eq!(body["originalFileName"], "notes.txt");
    assert_eq!(
        body["content"]["coreFeatures"][0]["name"],
        "Renewal tracker"
    );
    assert_eq!(body["epics"], json!([]));
}

/// (1c) Unknown ids are 404 and non-numeric ids are 400.
#[actix_rt::test]
async fn test_get_prd_bad_ids() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = get_json(&app, "/api/prds/999").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = get_json(&app, "/api/prds/abc").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("abc"));
}

/// (1d) PATCH updates only the fields present and bumps the timestamp.
#[actix_rt::test]
async fn test_patch_title_and_status() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let prd = ctx.seed_prd("Draft title").await;
    let app = create_test_app(ctx.state()).await;

    let (status, body) = patch_json(
        &app,
        &format!("/api/prds/{}", prd.id),
        json!({ "title": "  Final title  ", "status": "in_review" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["title"], "Final title");
    assert_eq!(body["status"], "in_review");
    assert_eq!(
        body["content"]["purposeAndVision"],
        prd_content_json()["purposeAndVision"]
    );
    assert!(body["revision"].as_u64().unwrap() > prd.revision);
}

/// (1e) PATCH content must be a complete, valid PRD body.
#[actix_rt::test]
async fn test_patch_rejects_invalid_content() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;
    let uri = format!("/api/prds/{}", prd.id);

    let (status, body) = patch_json(&app, &uri, json!({ "content": { "purposeAndVision": "x" } })).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("Invalid PRD content"));

    let mut blank = prd_content_json();
    blank["purposeAndVision"] = json!("   ");
    let (status, _) = patch_json(&app, &uri, json!({ "content": blank })).await;
    assert_eq!(status, 400);

    let (status, _) = patch_json(&app, &uri, json!({ "title": " " })).await;
    assert_eq!(status, 400);

    let (status, _) = patch_json(&app, &uri, json!({})).await;
    assert_eq!(status, 400);

    let (status, body) = patch_json(&app, &uri, json!({ "owner": "bea" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");

    // Nothing above reached the store
    let (_, body) = get_json(&app, &uri).await;
    assert_eq!(body["title"], "Renewals");
    assert_eq!(body["revision"].as_u64().unwrap(), prd.revision);
}

/// (1f) PATCH with a full valid content replaces it.
#[actix_rt::test]
async fn test_patch_replaces_content() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let prd = ctx.seed_prd("Renewals").await;
    let app = create_test_app(ctx.state()).await;

    let mut content = prd_content_json();
    content["purposeAndVision"] = json!("Keep every client insured.");
    let (status, body) =
        patch_json(&app, &format!("/api/prds/{}", prd.id), json!({ "content": content })).await;
    assert_eq!(status, 200);
    assert_eq!(body["content"]["purposeAndVision"], "Keep every client insured.");
}

/// (1g) PATCH and DELETE on a missing PRD are 404.
#[actix_rt::test]
async fn test_mutations_on_missing_prd() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let app = create_test_app(ctx.state()).await;

    let (status, _) = patch_json(&app, "/api/prds/42", json!({ "title": "x" })).await;
    assert_eq!(status, 404);
    let (status, _) = delete(&app, "/api/prds/42").await;
    assert_eq!(status, 404);
}

/// (1h) Deleting a PRD removes it from lookups and listings.
#[actix_rt::test]
async fn test_delete_prd() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let prd = ctx.seed_prd("Doomed").await;
    let keep = ctx.seed_prd("Kept").await;
    let app = create_test_app(ctx.state()).await;

    let (status, body) = delete(&app, &format!("/api/prds/{}", prd.id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let (status, _) = get_json(&app, &format!("/api/prds/{}", prd.id)).await;
    assert_eq!(status, 404);

    let (_, body) = get_json(&app, "/api/prds").await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], keep.id);
}

/// (1i) Section enhancement returns the model's rewrite.
#[actix_rt::test]
async fn test_enhance_section() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        "Brokers see every renewal 60 days ahead.".to_string(),
    ]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = post_json(
        &app,
        "/api/prds/enhance-section",
        json!({ "sectionContent": "renewal list", "sectionType": "coreFeatures" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["content"], "Brokers see every renewal 60 days ahead.");

    let (status, _) = post_json(
        &app,
        "/api/prds/enhance-section",
        json!({ "sectionContent": "  ", "sectionType": "coreFeatures" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(ctx.model.prompts().len(), 1);
}
