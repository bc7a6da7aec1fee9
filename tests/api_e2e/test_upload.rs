//! (2) PRD generation from uploaded conversation documents.

use crate::test_helpers::*;
use beanstalk_lib::services::llm::GenerationError;
use std::io::{Cursor, Write};

const TRANSCRIPT: &str = "Broker: I lose track of renewals.\nPM: How many clients do you have?\nBroker: About three hundred.";

fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        writer
            .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    buffer.into_inner()
}

/// (2a) A text upload produces a stored, complete PRD.
#[actix_rt::test]
async fn test_generate_prd_from_text_upload() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![prd_reply("Renewal Radar")]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = upload(
        &app,
        Some("call.txt"),
        TRANSCRIPT.as_bytes(),
        &[("extractPersonas", "true"), ("identifyFeatures", "false")],
    )
    .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["prd"]["title"], "Renewal Radar");
    assert_eq!(body["prd"]["status"], "complete");
    assert_eq!(body["prd"]["originalFileName"], "call.txt");
    assert!(body["prd"]["processingTimeMs"].is_u64());

    let prompts = ctx.model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].json_output);
    assert!(prompts[0].user.contains("About three hundred."));
    assert!(prompts[0].system.contains("describe each as a persona"));
    assert!(!prompts[0].system.contains("Enumerate every feature"));

    let id = body["prd"]["id"].as_i64().unwrap();
    let (status, stored) = get_json(&app, &format!("/api/prds/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(stored["title"], "Renewal Radar");
}

/// (2b) DOCX paragraphs reach the model as plain text lines.
#[actix_rt::test]
async fn test_generate_prd_from_docx_upload() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![prd_reply("Renewal Radar")]));
    let app = create_test_app(ctx.state()).await;

    let docx = build_docx(&["Broker: renewals slip", "PM: what &amp; why?"]);
    let (status, _) = upload(&app, Some("Interview.DOCX"), &docx, &[]).await;
    assert_eq!(status, 201);

    let user = &ctx.model.prompts()[0].user;
    assert!(user.contains("Broker: renewals slip\nPM: what & why?"));
}

/// (2c) A file exactly at the limit is accepted; one byte more is rejected.
#[actix_rt::test]
async fn test_upload_size_limit_is_inclusive() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![prd_reply("Sized")]));
    let app = create_test_app(ctx.state().with_max_upload_size(64)).await;

    let at_limit = "a".repeat(64);
    let (status, _) = upload(&app, Some("notes.txt"), at_limit.as_bytes(), &[]).await;
    assert_eq!(status, 201);

    let over_limit = "a".repeat(65);
    let (status, body) = upload(&app, Some("notes.txt"), over_limit.as_bytes(), &[]).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("too large"));
    assert_eq!(ctx.model.prompts().len(), 1);
}

/// (2d) Unsupported, empty and missing files never reach the model.
#[actix_rt::test]
async fn test_rejected_uploads() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = upload(&app, Some("deck.pdf"), b"%PDF-1.7 ...", &[]).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("PDF"));

    let (status, body) = upload(&app, Some("tool.exe"), b"MZ", &[]).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("Unsupported"));

    let (status, body) = upload(&app, Some("blank.txt"), b"  \n\t ", &[]).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("empty"));

    let (status, body) = upload(&app, None, b"", &[("extractPersonas", "true")]).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("No file uploaded"));

    let (status, _) = upload(&app, Some("call.txt"), TRANSCRIPT.as_bytes(), &[("identifyFeatures", "maybe")]).await;
    assert_eq!(status, 400);

    assert!(ctx.model.prompts().is_empty());
    let (_, list) = get_json(&app, "/api/prds").await;
    assert_eq!(list, serde_json::json!([]));
}

/// (2e) Model failures are 502 and leave the store untouched.
#[actix_rt::test]
async fn test_model_failures_store_nothing() {
    let ctx = TestContext::new(ScriptedModel::new(vec![
        Ok("this is not json".to_string()),
        Ok(r#"{"title": "Half", "content": {"purposeAndVision": "x"}}"#.to_string()),
        Err(GenerationError::Api {
            status: 500,
            message: "upstream down".to_string(),
        }),
    ]));
    let app = create_test_app(ctx.state()).await;

    let (status, body) = upload(&app, Some("call.txt"), TRANSCRIPT.as_bytes(), &[]).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "UPSTREAM_GENERATION_ERROR");

    let (status, body) = upload(&app, Some("call.txt"), TRANSCRIPT.as_bytes(), &[]).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "SCHEMA_VALIDATION_FAILED");
    assert!(body["details"].as_array().is_some_and(|d| !d.is_empty()));

    let (status, body) = upload(&app, Some("call.txt"), TRANSCRIPT.as_bytes(), &[]).await;
    assert_eq!(status, 502);
    assert!(body["message"].as_str().unwrap().contains("upstream down"));

    let (_, list) = get_json(&app, "/api/prds").await;
    assert_eq!(list, serde_json::json!([]));
}

/// (2f) With repair enabled a malformed first reply is retried.
#[actix_rt::test]
async fn test_repair_attempt_recovers() {
    let ctx = TestContext::new(ScriptedModel::replying(vec![
        "Sure! Here is your PRD".to_string(),
        prd_reply("Repaired"),
    ]));
    let app = create_test_app(ctx.state().with_repair_attempts(1)).await;

    let (status, body) = upload(&app, Some("call.txt"), TRANSCRIPT.as_bytes(), &[]).await;
    assert_eq!(status, 201);
    assert_eq!(body["prd"]["title"], "Repaired");
    assert_eq!(ctx.model.prompts().len(), 2);
    assert_eq!(ctx.model.remaining(), 0);
}
