//! Live discovery endpoints: next question and insight extraction.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::models::conversation::{
    MIN_INSIGHTS_TRANSCRIPT_CHARS, MIN_PROMPT_TRANSCRIPT_CHARS, word_count,
};
use crate::models::{
    AnalyzeInsightsRequest, AnalyzeInsightsResponse, AnalyzePromptRequest, AnalyzePromptResponse,
    InsightsMetadata, TranscriptAnalysis,
};
use crate::services::generators;
use crate::state::AppState;

fn require_transcript(transcript: &str, min_chars: usize) -> AppResult<&str> {
    let transcript = transcript.trim();
    if transcript.chars().count() < min_chars {
        return Err(AppError::InvalidInput(format!(
            "Transcript must be at least {} characters",
            min_chars
        )));
    }
    Ok(transcript)
}

/// Suggest the next discovery question for a transcript.
#[utoipa::path(
    post,
    path = "/api/conversation/analyze-prompt",
    tag = "Conversation",
    request_body = AnalyzePromptRequest,
    responses(
        (status = 200, description = "Follow-up question", body = AnalyzePromptResponse),
        (status = 400, description = "Transcript too short", body = crate::error::ErrorResponse),
        (status = 502, description = "Model call failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn analyze_prompt(
    state: web::Data<AppState>,
    body: web::Json<AnalyzePromptRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    let transcript = require_transcript(&request.transcript, MIN_PROMPT_TRANSCRIPT_CHARS)?;
    let phase = match request.phase.trim() {
        "" => "discovery",
        phase => phase,
    };

    let _permit = state.limiter.acquire("Follow-up question").await?;
    let prompt =
        generators::follow_up_question(&state.generator, transcript, phase, &request.context)
            .await?;

    Ok(HttpResponse::Ok().json(AnalyzePromptResponse {
        prompt,
        analysis: TranscriptAnalysis {
            phase: phase.to_string(),
            transcript_length: transcript.chars().count(),
            word_count: word_count(transcript),
        },
    }))
}

/// Extract structured insights from a transcript.
#[utoipa::path(
    post,
    path = "/api/conversation/analyze-insights",
    tag = "Conversation",
    request_body = AnalyzeInsightsRequest,
    responses(
        (status = 200, description = "Conversation insights", body = AnalyzeInsightsResponse),
        (status = 400, description = "Transcript too short", body = crate::error::ErrorResponse),
        (status = 502, description = "Model call failed or returned invalid insights", body = crate::error::ErrorResponse),
    )
)]
pub async fn analyze_insights(
    state: web::Data<AppState>,
    body: web::Json<AnalyzeInsightsRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    let transcript = require_transcript(&request.transcript, MIN_INSIGHTS_TRANSCRIPT_CHARS)?;

    let _permit = state.limiter.acquire("Insight extraction").await?;
    let insights = generators::analyze_insights(&state.generator, transcript).await?;

    Ok(HttpResponse::Ok().json(AnalyzeInsightsResponse {
        insights,
        metadata: InsightsMetadata {
            transcript_length: transcript.chars().count(),
            word_count: word_count(transcript),
            analysis_timestamp: Utc::now(),
        },
    }))
}

/// Configure conversation routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/conversation/analyze-prompt").route(web::post().to(analyze_prompt)),
    )
    .service(
        web::resource("/conversation/analyze-insights").route(web::post().to(analyze_insights)),
    );
}
