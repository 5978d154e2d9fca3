use std::{convert::Infallible, sync::Arc};

use axum::{
    body::Body,
    extract::{Json, State},
    http::header,
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::{
    api::{ApiError, AppState},
    clients::{database::DatabaseClient, llm::ObjectRequest},
    models::{
        generation::{CreateGenerationLog, GenerationInput, StoryOutput},
        validation::validate_generation_input,
    },
    prompts::build_story_prompt,
    utils::new_id,
};

pub const GENERATION_LOG_ID_HEADER: &str = "x-generation-log-id";

const STREAM_BUFFER: usize = 64;

/// Streams the story object as raw text while it is generated, then stores
/// the generation log once the provider has finished.
pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    Json(input): Json<GenerationInput>,
) -> Result<Response, ApiError> {
    validate_generation_input(&input).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let generation_log_id = input
        .generation_log_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(new_id);

    let settings = state.llm_client.settings(input.provider);
    let prompt = build_story_prompt(&input);
    let request = ObjectRequest::story(input.provider, settings, prompt);

    info!(
        generation_log_id = %generation_log_id,
        provider = %input.provider,
        model = %request.model,
        "Starting story generation"
    );

    let stream = state.llm_client.open_stream(&request).await.map_err(|e| {
        error!(
            error = %e,
            generation_log_id = %generation_log_id,
            "Failed to start story generation"
        );
        ApiError::bad_gateway("Failed to start generation")
    })?;

    let (tx, rx) = mpsc::channel::<String>(STREAM_BUFFER);
    let database_client = state.database_client.clone();
    let log_id = generation_log_id.clone();

    tokio::spawn(async move {
        match stream.forward(&tx).await {
            Ok(completion) => {
                drop(tx);

                let mut log = CreateGenerationLog::new(
                    log_id,
                    &input,
                    request.model,
                    request.temperature.unwrap_or_default(),
                    request.prompt,
                )
                .with_usage(completion.usage);

                match serde_json::from_str::<StoryOutput>(&completion.text) {
                    Ok(output) => log = log.with_output(&output),
                    Err(e) => warn!(
                        error = %e,
                        generation_log_id = %log.id,
                        "Generated text is not a story object, storing without output"
                    ),
                }

                persist_generation(&database_client, &log).await;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    generation_log_id = %log_id,
                    "Story generation abandoned"
                );
            }
        }
    });

    let body = Body::from_stream(futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|delta| (Ok::<_, Infallible>(delta), rx))
    }));

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(GENERATION_LOG_ID_HEADER, generation_log_id.as_str())
        .body(body)
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

async fn persist_generation(database_client: &DatabaseClient, log: &CreateGenerationLog) {
    match database_client.insert_generation_log(log).await {
        Ok(()) => info!(
            generation_log_id = %log.id,
            total_tokens = log.usage.total_tokens,
            "Story generation stored"
        ),
        Err(e) => error!(
            error = %e,
            generation_log_id = %log.id,
            "Failed to store story generation"
        ),
    }
}
