use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::provider::{Provider, TokenUsage},
    utils::parse_json_or_default,
};

pub const STORY_TEMPERATURE: f32 = 1.0;

/// Product description submitted to start a generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    pub provider: Provider,
    pub product_name: String,
    pub product_category: String,
    pub brand_images: Vec<String>,
    pub target_user_image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_log_id: Option<String>,
}

/// Structured object the model is asked to produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryOutput {
    pub novel: String,
    pub title: String,
    pub the_protagonists_last_words: String,
    pub short_poems_inspired_by_the_story: String,

    #[serde(default)]
    pub generation_log_id: String,
}

impl StoryOutput {
    /// Copy candidates offered to the user: the title, the protagonist's last
    /// words, then each sentence of the short poem. Blank entries are dropped.
    pub fn candidates(&self) -> Vec<String> {
        [self.title.as_str(), self.the_protagonists_last_words.as_str()]
            .into_iter()
            .chain(self.short_poems_inspired_by_the_story.split('。'))
            .map(str::trim)
            .filter(|copy| !copy.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationLog {
    pub id: String,
    pub product_name: String,
    pub product_category: String,
    pub brand_images: String,
    pub target_user_image: String,
    pub story: Option<String>,
    pub candidates: Option<String>,
    pub provider: String,
    pub model_name: String,
    pub temperature: f32,
    pub prompt: String,
    pub usage_prompt_tokens: i64,
    pub usage_completion_tokens: i64,
    pub usage_total_tokens: i64,
    pub created_at: DateTime<Utc>,
}

impl GenerationLog {
    pub fn brand_image_list(&self) -> Vec<String> {
        parse_json_or_default(Some(self.brand_images.as_str()))
    }

    pub fn candidate_list(&self) -> Vec<String> {
        parse_json_or_default(self.candidates.as_deref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGenerationLog {
    pub id: String,
    pub product_name: String,
    pub product_category: String,
    pub brand_images: String,
    pub target_user_image: String,
    pub story: Option<String>,
    pub candidates: String,
    pub provider: Provider,
    pub model_name: String,
    pub temperature: f32,
    pub prompt: String,
    pub usage: TokenUsage,
}

impl CreateGenerationLog {
    pub fn new(
        id: String,
        input: &GenerationInput,
        model_name: String,
        temperature: f32,
        prompt: String,
    ) -> Self {
        Self {
            id,
            product_name: input.product_name.clone(),
            product_category: input.product_category.clone(),
            brand_images: serde_json::to_string(&input.brand_images)
                .unwrap_or_else(|_| "[]".to_string()),
            target_user_image: input.target_user_image.clone(),
            story: None,
            candidates: "[]".to_string(),
            provider: input.provider,
            model_name,
            temperature,
            prompt,
            usage: TokenUsage::default(),
        }
    }

    pub fn with_output(mut self, output: &StoryOutput) -> Self {
        self.story = Some(output.novel.clone());
        self.candidates =
            serde_json::to_string(&output.candidates()).unwrap_or_else(|_| "[]".to_string());
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }
}
