use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, header},
    response::{Html, Redirect},
};
use tracing::{info, warn};

use crate::{
    api::{ApiError, AppState},
    generator::{GenerateOptions, generate_landing_page_html},
    models::{
        landing_page::{
            CreateLandingPage, CreatePageRequest, CreatePageView, Dashboard, LandingPage,
            PageBuilderData,
        },
        metadata::{LpMetadata, MetadataSource},
        response::ApiResponse,
        template::LpTemplate,
        validation::validate_create_page_request,
    },
    renderer::escape_html,
    sanitize::sanitize_document,
    utils::new_id,
};

const UNKNOWN: &str = "unknown";
const TITLE_SUFFIX: &str = "エモコピーLP";

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LpTemplate>>>, ApiError> {
    let templates = state.database_client.list_active_templates().await?;

    Ok(Json(ApiResponse::success(
        templates,
        "Templates retrieved".to_string(),
    )))
}

/// Data for the page builder: the generation, the templates it can be
/// rendered with and the copy candidates to choose from.
pub async fn get_page_builder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PageBuilderData>>, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Generation log id is required"));
    }

    let generation_log = state
        .database_client
        .get_generation_log(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Generation log not found"))?;

    let templates = state.database_client.list_active_templates().await?;
    let candidates = generation_log.candidate_list();

    Ok(Json(ApiResponse::success(
        PageBuilderData {
            generation_log,
            templates,
            candidates,
        },
        "Page builder data retrieved".to_string(),
    )))
}

pub async fn create_landing_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<CreatePageRequest>,
) -> Result<Redirect, ApiError> {
    validate_create_page_request(&request).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let generation_log = state
        .database_client
        .get_generation_log(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Generation log not found"))?;

    let template = state
        .database_client
        .get_template(&request.template_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Template not found"))?;

    let config = request
        .config
        .clone()
        .unwrap_or_else(|| template.parsed_default_config());

    let html_content = generate_landing_page_html(&GenerateOptions {
        template: (&template).into(),
        generation: (&generation_log).into(),
        selected_copies: &request.selected_copies,
        config: Some(&config),
    });

    let metadata = LpMetadata::from_defaults(&MetadataSource {
        product_name: &generation_log.product_name,
        product_category: &generation_log.product_category,
        target_user_image: &generation_log.target_user_image,
        selected_copies: &request.selected_copies,
        story: generation_log.story.as_deref().unwrap_or_default(),
    });

    let page = CreateLandingPage {
        id: new_id(),
        generation_log_id: generation_log.id.clone(),
        template_id: template.id.clone(),
        title: format!("{} - {}", generation_log.product_name, TITLE_SUFFIX),
        selected_copies: request.selected_copies,
        config,
        html_content,
        share_url: new_id(),
        metadata,
    };

    state.database_client.insert_landing_page(&page).await?;

    info!(
        landing_page_id = %page.id,
        generation_log_id = %page.generation_log_id,
        template_id = %page.template_id,
        "Landing page created"
    );

    Ok(Redirect::to(&format!("/lp/{}", page.id)))
}

pub async fn get_landing_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LandingPage>>, ApiError> {
    let page = state
        .database_client
        .get_landing_page(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Landing page not found"))?;

    state.database_client.increment_view_count(&page.id).await?;

    Ok(Json(ApiResponse::success(
        page,
        "Landing page retrieved".to_string(),
    )))
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    let landing_pages = state.database_client.list_landing_pages().await?;
    let total_views = state.database_client.count_views().await?;

    Ok(Json(ApiResponse::success(
        Dashboard::new(landing_pages, total_views),
        "Dashboard retrieved".to_string(),
    )))
}

/// Public view of a page. Every request is recorded as a view.
pub async fn view_shared_page(
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let page = state
        .database_client
        .find_public_page_by_share_url(&share_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Page not found"))?;

    let view = page_view_from_headers(&page.id, &headers);

    if let Err(e) = state.database_client.record_view(&view).await {
        warn!(error = %e, landing_page_id = %page.id, "Failed to record page view");
    }

    state.database_client.increment_view_count(&page.id).await?;

    let document = match page.html_content.as_deref().filter(|html| !html.is_empty()) {
        Some(html) => sanitize_document(html),
        None => fallback_document(&page.title, &page.selected_copies),
    };

    Ok(Html(document))
}

pub fn page_view_from_headers(landing_page_id: &str, headers: &HeaderMap) -> CreatePageView {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let ip_address = header_value("x-forwarded-for")
        .and_then(|forwarded| {
            forwarded
                .split(',')
                .next()
                .map(|ip| ip.trim().to_string())
        })
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    CreatePageView {
        id: new_id(),
        landing_page_id: landing_page_id.to_string(),
        ip_address,
        user_agent: header_value(header::USER_AGENT.as_str())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        referrer: header_value(header::REFERER.as_str()),
    }
}

/// Minimal document for pages stored without rendered HTML.
pub fn fallback_document(title: &str, copies: &[String]) -> String {
    let title = escape_html(title);
    let copies = copies
        .iter()
        .map(|copy| format!("    <p>{}</p>", escape_html(copy)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="utf-8" />
  <title>{title}</title>
</head>
<body>
  <main>
    <h1>{title}</h1>
{copies}
  </main>
</body>
</html>
"#
    )
}
