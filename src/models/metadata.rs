use serde::{Deserialize, Serialize};

use crate::models::provider::Provider;

pub const DEFAULT_MAIN_COPY: &str = "キャッチコピー";
pub const DEFAULT_CTA_TEXT: &str = "詳しく見る";
pub const DEFAULT_CTA_URL: &str = "#";
const DEFAULT_BRAND_MESSAGE: &str = "毎日に、新しい体験を";

/// Copy blocks shown around a landing page's main content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpMetadata {
    pub main_copy: String,
    pub sub_copy: String,
    pub cta_text: String,
    pub cta_url: String,
    pub sub_description: String,
    pub og_description: String,
    pub formatted_story: String,
    pub brand_message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    pub generation_log_id: String,
    pub selected_copies: Vec<String>,

    #[serde(default)]
    pub provider: Option<Provider>,
}

pub struct MetadataSource<'a> {
    pub product_name: &'a str,
    pub product_category: &'a str,
    pub target_user_image: &'a str,
    pub selected_copies: &'a [String],
    pub story: &'a str,
}

impl LpMetadata {
    /// Builds metadata without a model call.
    pub fn from_defaults(source: &MetadataSource<'_>) -> Self {
        let main_copy = source
            .selected_copies
            .first()
            .filter(|copy| !copy.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_MAIN_COPY.to_string());

        let formatted_story = source
            .story
            .replace('。', "。\n\n")
            .replace('、', "、\n")
            .trim()
            .to_string();

        Self {
            og_description: format!("{} - {}の特別なページ", main_copy, source.product_name),
            main_copy,
            sub_copy: format!("{}の日常に寄り添う", source.target_user_image),
            cta_text: DEFAULT_CTA_TEXT.to_string(),
            cta_url: DEFAULT_CTA_URL.to_string(),
            sub_description: format!(
                "{}のための{}",
                source.target_user_image, source.product_category
            ),
            formatted_story,
            brand_message: DEFAULT_BRAND_MESSAGE.to_string(),
        }
    }
}
