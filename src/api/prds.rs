//! PRD API handlers: upload-and-generate, CRUD, epic generation, app generation.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::db::{NewPrd, PrdUpdate};
use crate::error::{AppError, AppResult};
use crate::models::{
    DeleteResponse, EnhanceSectionRequest, EnhanceSectionResponse, EpicGenerationResponse,
    EpicListResponse, EpicsContent, GenerateAppQuery, GeneratePrdResponse, GenerationMode,
    PrdContent, PrdRecord, PrdStatus, UpdatePrdRequest, Validate,
};
use crate::services::generators;
use crate::services::upload::read_prd_upload;
use crate::state::AppState;

/// Multipart body for `POST /api/prds/generate` (documentation only).
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
#[serde(rename_all = "camelCase")]
pub struct PrdUploadForm {
    /// Conversation document (.txt, .docx or .doc, at most 10 MiB).
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    extract_personas: Option<bool>,
    identify_features: Option<bool>,
    generate_acceptance_criteria: Option<bool>,
}

/// Parse a numeric PRD id from the path.
pub(crate) fn parse_prd_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::InvalidInput(format!("Invalid PRD id '{}'", raw)))
}

async fn load_prd(state: &AppState, id: i64) -> AppResult<PrdRecord> {
    state
        .repo
        .get_prd(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("PRD {}", id)))
}

/// List all PRDs, newest first.
#[utoipa::path(
    get,
    path = "/api/prds",
    tag = "PRDs",
    responses(
        (status = 200, description = "All stored PRDs", body = Vec<PrdRecord>),
    )
)]
pub async fn list_prds(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let prds = state.repo.list_prds().await?;
    Ok(HttpResponse::Ok().json(prds))
}

/// Get one PRD.
#[utoipa::path(
    get,
    path = "/api/prds/{id}",
    tag = "PRDs",
    params(("id" = i64, Path, description = "PRD id")),
    responses(
        (status = 200, description = "The PRD", body = PrdRecord),
        (status = 400, description = "Invalid id", body = crate::error::ErrorResponse),
        (status = 404, description = "PRD not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_prd(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_prd_id(&path)?;
    let prd = load_prd(&state, id).await?;
    Ok(HttpResponse::Ok().json(prd))
}

/// Partially update a PRD. `content`, when present, must be a complete PRD body.
#[utoipa::path(
    patch,
    path = "/api/prds/{id}",
    tag = "PRDs",
    params(("id" = i64, Path, description = "PRD id")),
    request_body = UpdatePrdRequest,
    responses(
        (status = 200, description = "Updated PRD", body = PrdRecord),
        (status = 400, description = "Invalid update", body = crate::error::ErrorResponse),
        (status = 404, description = "PRD not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_prd(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePrdRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_prd_id(&path)?;
    let update = build_update(body.into_inner())?;
    if update.is_empty() {
        return Err(AppError::InvalidInput(
            "Update must include at least one of title, content or status".to_string(),
        ));
    }

    let prd = state
        .repo
        .update_prd(id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("PRD {}", id)))?;
    info!("Updated PRD {} (revision {})", id, prd.revision);
    Ok(HttpResponse::Ok().json(prd))
}

fn build_update(request: UpdatePrdRequest) -> AppResult<PrdUpdate> {
    let title = match request.title {
        Some(title) if title.trim().is_empty() => {
            return Err(AppError::InvalidInput("title must not be blank".to_string()));
        }
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };

    let content = match request.content {
        Some(raw) => {
            let content: PrdContent = serde_json::from_value(raw)
                .map_err(|e| AppError::InvalidInput(format!("Invalid PRD content: {}", e)))?;
            content.validate().map_err(|violations| {
                AppError::InvalidInput(format!("Invalid PRD content: {}", violations.join("; ")))
            })?;
            Some(content)
        }
        None => None,
    };

    Ok(PrdUpdate {
        title,
        content,
        status: request.status,
    })
}

/// Delete a PRD and its epics.
#[utoipa::path(
    delete,
    path = "/api/prds/{id}",
    tag = "PRDs",
    params(("id" = i64, Path, description = "PRD id")),
    responses(
        (status = 200, description = "PRD deleted", body = DeleteResponse),
        (status = 404, description = "PRD not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_prd(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_prd_id(&path)?;
    if !state.repo.delete_prd(id).await? {
        return Err(AppError::NotFound(format!("PRD {}", id)));
    }
    info!("Deleted PRD {}", id);
    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: format!("PRD {} deleted", id),
    }))
}

/// Upload a conversation document and generate a PRD from it.
#[utoipa::path(
    post,
    path = "/api/prds/generate",
    tag = "PRDs",
    request_body(content = PrdUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "PRD generated and stored", body = GeneratePrdResponse),
        (status = 400, description = "Missing, oversized, empty or unsupported file", body = crate::error::ErrorResponse),
        (status = 502, description = "Model call failed or returned an invalid PRD", body = crate::error::ErrorResponse),
        (status = 503, description = "Too many generations in progress", body = crate::error::ErrorResponse),
    )
)]
pub async fn generate_prd(
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let upload = read_prd_upload(payload, state.max_upload_size, state.upload_dir.as_deref()).await?;

    let _permit = state.limiter.acquire("PRD generation").await?;
    let generated =
        generators::generate_prd(&state.generator, &upload.text, upload.options).await?;

    let prd = state
        .repo
        .create_prd(NewPrd {
            title: generated.title,
            content: generated.content,
            status: PrdStatus::Complete,
            original_file_name: Some(upload.filename),
            processing_time_ms: Some(generated.processing_time_ms),
        })
        .await?;
    info!(
        "Created PRD {} '{}' in {}ms",
        prd.id, prd.title, generated.processing_time_ms
    );

    Ok(HttpResponse::Created().json(GeneratePrdResponse {
        success: true,
        message: format!("PRD '{}' generated", prd.title),
        prd,
    }))
}

/// Generate epics for a PRD, replacing any previous batch.
#[utoipa::path(
    post,
    path = "/api/prds/{id}/generate-epics",
    tag = "Epics",
    params(("id" = i64, Path, description = "PRD id")),
    responses(
        (status = 200, description = "New epic batch", body = EpicGenerationResponse),
        (status = 404, description = "PRD not found", body = crate::error::ErrorResponse),
        (status = 409, description = "PRD changed while epics were generated", body = crate::error::ErrorResponse),
        (status = 502, description = "Model call failed or returned invalid epics", body = crate::error::ErrorResponse),
    )
)]
pub async fn generate_epics(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_prd_id(&path)?;
    let prd = load_prd(&state, id).await?;

    let _permit = state.limiter.acquire("Epic generation").await?;
    let generated = generators::generate_epics(&state.generator, &prd.title, &prd.content).await?;

    // Only a validated batch reaches the store; the old batch survives any failure above.
    let updated = state
        .repo
        .replace_epics(id, prd.revision, generated.epics, generated.processing_time_ms)
        .await?;

    Ok(HttpResponse::Ok().json(EpicGenerationResponse {
        prd_id: id,
        title: updated.title,
        content: EpicsContent {
            epics: updated.epics,
        },
        processing_time_ms: generated.processing_time_ms,
    }))
}

/// Current epic batch for a PRD (empty before generation).
#[utoipa::path(
    get,
    path = "/api/prds/{id}/epics",
    tag = "Epics",
    params(("id" = i64, Path, description = "PRD id")),
    responses(
        (status = 200, description = "Epic batch", body = EpicListResponse),
        (status = 404, description = "PRD not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_epics(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_prd_id(&path)?;
    let prd = load_prd(&state, id).await?;
    Ok(HttpResponse::Ok().json(EpicListResponse {
        prd_id: id,
        epics: prd.epics,
        generated_at: prd.epics_generated_at,
    }))
}

/// Generate a React project from the PRD's epics. Nothing is stored.
#[utoipa::path(
    post,
    path = "/api/prds/{id}/generate-app",
    tag = "Code generation",
    params(
        ("id" = i64, Path, description = "PRD id"),
        ("mode" = Option<String>, Query, description = "templated (default) or model_assisted")
    ),
    responses(
        (status = 200, description = "Generated project files", body = crate::models::GeneratedApp),
        (status = 404, description = "PRD not found", body = crate::error::ErrorResponse),
        (status = 409, description = "PRD has no epics yet", body = crate::error::ErrorResponse),
        (status = 502, description = "Model-assisted page generation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn generate_app(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<GenerateAppQuery>,
) -> AppResult<HttpResponse> {
    let id = parse_prd_id(&path)?;
    let mode = match query.mode.as_deref() {
        Some(raw) => GenerationMode::parse(raw).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Unknown mode '{}'. Use templated or model_assisted",
                raw
            ))
        })?,
        None if state.model_assisted_codegen => GenerationMode::ModelAssisted,
        None => GenerationMode::Templated,
    };

    let prd = load_prd(&state, id).await?;
    if !prd.has_epics() {
        return Err(AppError::PreconditionFailed(format!(
            "PRD {} has no epics yet. Generate epics before generating the app",
            id
        )));
    }

    let app = match mode {
        GenerationMode::Templated => state.codegen.generate(&prd.title, &prd.epics)?,
        GenerationMode::ModelAssisted => {
            let _permit = state.limiter.acquire("App generation").await?;
            state
                .codegen
                .generate_with_model(&state.generator, &prd.title, &prd.epics)
                .await?
        }
    };
    info!(
        "Generated app for PRD {} ({} pages, {:?})",
        id,
        app.pages.len(),
        app.generation_mode
    );

    Ok(HttpResponse::Ok().json(app))
}

/// Rewrite one PRD section with the model.
#[utoipa::path(
    post,
    path = "/api/prds/enhance-section",
    tag = "PRDs",
    request_body = EnhanceSectionRequest,
    responses(
        (status = 200, description = "Rewritten section", body = EnhanceSectionResponse),
        (status = 400, description = "Missing section content or type", body = crate::error::ErrorResponse),
        (status = 502, description = "Model call failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn enhance_section(
    state: web::Data<AppState>,
    body: web::Json<EnhanceSectionRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    if request.section_content.trim().is_empty() || request.section_type.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "sectionContent and sectionType are required".to_string(),
        ));
    }

    let _permit = state.limiter.acquire("Section enhancement").await?;
    let content = generators::enhance_section(
        &state.generator,
        &request.section_content,
        &request.section_type,
        &request.context,
    )
    .await?;

    Ok(HttpResponse::Ok().json(EnhanceSectionResponse { content }))
}

/// Configure PRD routes. Fixed paths are registered before `/prds/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/prds").route(web::get().to(list_prds)))
        .service(web::resource("/prds/generate").route(web::post().to(generate_prd)))
        .service(web::resource("/prds/enhance-section").route(web::post().to(enhance_section)))
        .service(
            web::resource("/prds/{id}")
                .route(web::get().to(get_prd))
                .route(web::patch().to(update_prd))
                .route(web::delete().to(delete_prd)),
        )
        .service(web::resource("/prds/{id}/generate-epics").route(web::post().to(generate_epics)))
        .service(web::resource("/prds/{id}/epics").route(web::get().to(list_epics)))
        .service(
            web::resource(["/prds/{id}/generate-app", "/prds/{id}/generate-code"])
                .route(web::post().to(generate_app)),
        );
}
