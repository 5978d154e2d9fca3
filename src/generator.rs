use crate::{
    models::{
        generation::GenerationLog,
        metadata::{DEFAULT_CTA_TEXT, DEFAULT_CTA_URL, DEFAULT_MAIN_COPY},
        template::{DEFAULT_FONT_FAMILY, DEFAULT_PRIMARY_COLOR, LpTemplate, PageConfig},
        validation::{validate_color, validate_font_family},
    },
    renderer::{RenderContext, TemplateRenderer, build_copy_buttons},
    utils::parse_json_or_default,
};

const DEFAULT_SUB_COPY: &str = "ブランドメッセージ";

pub struct TemplateSource<'a> {
    pub base_html: &'a str,
    pub default_config: &'a str,
}

impl<'a> From<&'a LpTemplate> for TemplateSource<'a> {
    fn from(template: &'a LpTemplate) -> Self {
        Self {
            base_html: &template.base_html,
            default_config: &template.default_config,
        }
    }
}

pub struct GenerationSource<'a> {
    pub product_name: &'a str,
    pub product_category: &'a str,
    /// JSON-encoded array of strings, as stored.
    pub brand_images: &'a str,
    pub target_user_image: &'a str,
    pub story: Option<&'a str>,
}

impl<'a> From<&'a GenerationLog> for GenerationSource<'a> {
    fn from(log: &'a GenerationLog) -> Self {
        Self {
            product_name: &log.product_name,
            product_category: &log.product_category,
            brand_images: &log.brand_images,
            target_user_image: &log.target_user_image,
            story: log.story.as_deref(),
        }
    }
}

pub struct GenerateOptions<'a> {
    pub template: TemplateSource<'a>,
    pub generation: GenerationSource<'a>,
    pub selected_copies: &'a [String],
    pub config: Option<&'a PageConfig>,
}

pub fn generate_landing_page_html(options: &GenerateOptions<'_>) -> String {
    let GenerateOptions {
        template,
        generation,
        selected_copies,
        config,
    } = options;

    let defaults = PageConfig::parse_or_fallback(template.default_config);
    let final_config = match config {
        Some(config) => config.merged_over(&defaults),
        None => defaults,
    };

    let brand_images: Vec<String> = parse_json_or_default(Some(generation.brand_images));

    let main_copy = first_non_empty(selected_copies).unwrap_or(DEFAULT_MAIN_COPY);
    let sub_copy = first_non_empty(&brand_images).unwrap_or(DEFAULT_SUB_COPY);

    let primary_color = validate_color(
        final_config
            .primary_color
            .as_deref()
            .filter(|color| !color.is_empty())
            .unwrap_or(DEFAULT_PRIMARY_COLOR),
    );
    let font_family = validate_font_family(
        final_config
            .font_family
            .as_deref()
            .filter(|font| !font.is_empty())
            .unwrap_or(DEFAULT_FONT_FAMILY),
    );

    let context = RenderContext {
        product_name: generation.product_name.to_string(),
        product_category: generation.product_category.to_string(),
        main_copy: main_copy.to_string(),
        sub_copy: sub_copy.to_string(),
        story: generation.story.unwrap_or_default().to_string(),
        cta_text: DEFAULT_CTA_TEXT.to_string(),
        cta_url: DEFAULT_CTA_URL.to_string(),
        copy_buttons: build_copy_buttons(selected_copies, Some(0)),
        target_user_image: generation.target_user_image.to_string(),
        sub_description: format!(
            "{}のための{}",
            generation.target_user_image, generation.product_category
        ),
        og_description: format!(
            "{} {}の特別なランディングページ。",
            main_copy, generation.product_name
        ),
        primary_color,
        font_family,
    };

    TemplateRenderer::new(template.base_html).render(&context)
}

fn first_non_empty(values: &[String]) -> Option<&str> {
    values
        .first()
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
