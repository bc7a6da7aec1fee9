//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, web};
use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Beanstalk Server",
        version = "0.1.0",
        description = "API server that turns conversation transcripts into PRDs, epics with user stories, and generated React app scaffolds"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // PRD endpoints
        api::prds::list_prds,
        api::prds::get_prd,
        api::prds::update_prd,
        api::prds::delete_prd,
        api::prds::generate_prd,
        api::prds::enhance_section,
        // Epic endpoints
        api::prds::generate_epics,
        api::prds::list_epics,
        api::epics::get_epic,
        api::epics::delete_epic,
        api::epics::add_story,
        // Code generation
        api::prds::generate_app,
        // Conversation endpoints
        api::conversation::analyze_prompt,
        api::conversation::analyze_insights,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::DeleteResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // PRDs
            models::PrdStatus,
            models::PrdContent,
            models::PrdRecord,
            models::GenerationOptions,
            models::GeneratePrdResponse,
            models::UpdatePrdRequest,
            models::EnhanceSectionRequest,
            models::EnhanceSectionResponse,
            api::prds::PrdUploadForm,
            // Epics
            models::Priority,
            models::StoryStatus,
            models::UserStory,
            models::Epic,
            models::EpicsContent,
            models::EpicGenerationResponse,
            models::EpicListResponse,
            models::EpicLookupResponse,
            models::AddStoryRequest,
            models::AddStoryResponse,
            // Code generation
            models::GeneratedFile,
            models::GenerationMode,
            models::GeneratedApp,
            // Conversation
            models::AnalyzePromptRequest,
            models::AnalyzePromptResponse,
            models::TranscriptAnalysis,
            models::AnalyzeInsightsRequest,
            models::AnalyzeInsightsResponse,
            models::ConversationInsights,
            models::InsightsMetadata,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "PRDs", description = "PRD generation from uploaded conversations and PRD management"),
        (name = "Epics", description = "Epic and user story generation"),
        (name = "Code generation", description = "React project generation from epics"),
        (name = "Conversation", description = "Live discovery conversation analysis")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document.
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure the OpenAPI route.
pub fn configure_openapi_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/openapi.json").route(web::get().to(openapi_json)));
}
