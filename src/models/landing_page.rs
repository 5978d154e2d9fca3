use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    generation::GenerationLog, metadata::LpMetadata, template::LpTemplate, template::PageConfig,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPage {
    pub id: String,
    pub generation_log_id: String,
    pub template_id: String,
    pub title: String,
    pub selected_copies: Vec<String>,
    pub config: PageConfig,
    pub html_content: Option<String>,
    pub is_public: bool,
    pub share_url: String,
    pub og_image_url: Option<String>,
    pub view_count: i32,
    pub metadata: Option<LpMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateLandingPage {
    pub id: String,
    pub generation_log_id: String,
    pub template_id: String,
    pub title: String,
    pub selected_copies: Vec<String>,
    pub config: PageConfig,
    pub html_content: String,
    pub share_url: String,
    pub metadata: LpMetadata,
}

/// Body of a landing page creation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    pub template_id: String,
    pub selected_copies: Vec<String>,

    #[serde(default)]
    pub config: Option<PageConfig>,
}

/// Everything needed to assemble a page from one generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBuilderData {
    pub generation_log: GenerationLog,
    pub templates: Vec<LpTemplate>,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageSummary {
    pub id: String,
    pub title: String,
    pub share_url: String,
    pub view_count: i32,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub landing_pages: Vec<LandingPageSummary>,
    pub total_views: i64,
    pub public_pages: usize,
}

impl Dashboard {
    pub fn new(landing_pages: Vec<LandingPageSummary>, total_views: i64) -> Self {
        let public_pages = landing_pages.iter().filter(|page| page.is_public).count();

        Self {
            landing_pages,
            total_views,
            public_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePageView {
    pub id: String,
    pub landing_page_id: String,
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: Option<String>,
}
