use std::sync::Arc;

use axum::extract::{Json, State};
use tracing::{error, info};

use crate::{
    api::{ApiError, AppState},
    clients::llm::ObjectRequest,
    models::{
        metadata::{LpMetadata, MetadataRequest},
        response::ApiResponse,
    },
    prompts::{MetadataPromptInput, build_metadata_prompt},
};

pub async fn generate_metadata(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MetadataRequest>,
) -> Result<Json<ApiResponse<LpMetadata>>, ApiError> {
    if request.generation_log_id.trim().is_empty() {
        return Err(ApiError::bad_request("generationLogId is required"));
    }

    let log = state
        .database_client
        .get_generation_log(&request.generation_log_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Generation log not found"))?;

    let provider = request.provider.unwrap_or_default();
    let brand_images = log.brand_image_list();

    let prompt = build_metadata_prompt(&MetadataPromptInput {
        product_name: &log.product_name,
        product_category: &log.product_category,
        target_user_image: &log.target_user_image,
        brand_images: &brand_images,
        selected_copies: &request.selected_copies,
        story: log.story.as_deref().unwrap_or_default(),
    });

    let object_request =
        ObjectRequest::metadata(provider, state.llm_client.settings(provider), prompt);

    let metadata: LpMetadata = state
        .llm_client
        .generate_object(&object_request)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                generation_log_id = %log.id,
                provider = %provider,
                "Metadata generation failed"
            );
            ApiError::internal("Failed to generate metadata")
        })?;

    info!(generation_log_id = %log.id, provider = %provider, "Metadata generated");

    Ok(Json(ApiResponse::success(
        metadata,
        "Metadata generated".to_string(),
    )))
}
