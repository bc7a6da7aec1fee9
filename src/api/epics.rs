//! Epic API handlers. Epics are owned by their PRD and found through the
//! store's epic index.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{AddStoryRequest, AddStoryResponse, DeleteResponse, EpicLookupResponse};
use crate::services::generators;
use crate::state::AppState;

/// Look up one epic and its parent PRD.
#[utoipa::path(
    get,
    path = "/api/epics/{id}",
    tag = "Epics",
    params(("id" = String, Path, description = "Epic id")),
    responses(
        (status = 200, description = "The epic", body = EpicLookupResponse),
        (status = 404, description = "Epic not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_epic(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let epic_id = path.into_inner();
    let location = state
        .repo
        .find_epic(&epic_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Epic {}", epic_id)))?;

    Ok(HttpResponse::Ok().json(EpicLookupResponse {
        prd_id: location.prd_id,
        epic: location.epic,
    }))
}

/// Remove one epic from its PRD.
#[utoipa::path(
    delete,
    path = "/api/epics/{id}",
    tag = "Epics",
    params(("id" = String, Path, description = "Epic id")),
    responses(
        (status = 200, description = "Epic deleted", body = DeleteResponse),
        (status = 404, description = "Epic not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_epic(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let epic_id = path.into_inner();
    if !state.repo.delete_epic(&epic_id).await? {
        return Err(AppError::NotFound(format!("Epic {}", epic_id)));
    }
    info!("Deleted epic {}", epic_id);
    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: format!("Epic {} deleted", epic_id),
    }))
}

/// Generate one user story from a prompt and append it to the epic.
#[utoipa::path(
    post,
    path = "/api/epics/{id}/add-story",
    tag = "Epics",
    params(("id" = String, Path, description = "Epic id")),
    request_body = AddStoryRequest,
    responses(
        (status = 200, description = "Story appended", body = AddStoryResponse),
        (status = 400, description = "Blank prompt", body = crate::error::ErrorResponse),
        (status = 404, description = "Epic not found", body = crate::error::ErrorResponse),
        (status = 502, description = "Model call failed or returned an invalid story", body = crate::error::ErrorResponse),
    )
)]
pub async fn add_story(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AddStoryRequest>,
) -> AppResult<HttpResponse> {
    let epic_id = path.into_inner();
    let prompt = body.into_inner().prompt;
    if prompt.trim().is_empty() {
        return Err(AppError::InvalidInput("prompt must not be blank".to_string()));
    }

    let location = state
        .repo
        .find_epic(&epic_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Epic {}", epic_id)))?;

    let _permit = state.limiter.acquire("Story generation").await?;
    let (story, processing_time_ms) =
        generators::generate_story(&state.generator, &location.epic, prompt.trim()).await?;

    // The epic may have been deleted or regenerated while the model was running.
    let updated = state
        .repo
        .append_story(&epic_id, story.clone())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Epic {}", epic_id)))?;
    info!(
        "Appended story '{}' to epic {} ({} stories)",
        story.title,
        epic_id,
        updated.epic.user_stories.len()
    );

    Ok(HttpResponse::Ok().json(AddStoryResponse {
        prd_id: updated.prd_id,
        epic_id,
        total_stories: updated.epic.user_stories.len(),
        story,
        processing_time_ms,
    }))
}

/// Configure epic routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/epics/{id}")
            .route(web::get().to(get_epic))
            .route(web::delete().to(delete_epic)),
    )
    .service(web::resource("/epics/{id}/add-story").route(web::post().to(add_story)));
}
