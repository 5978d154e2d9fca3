use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::Regex;

use crate::models::{
    generation::GenerationInput,
    landing_page::CreatePageRequest,
    template::{DEFAULT_FONT_FAMILY, DEFAULT_PRIMARY_COLOR},
};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("hex color pattern is valid")
});

pub const ALLOWED_FONTS: [&str; 6] = [
    "Noto Sans JP",
    "Shippori Mincho",
    "system-ui",
    "sans-serif",
    "serif",
    "monospace",
];

const MAX_BRAND_IMAGES: usize = 3;

/// Colors end up inside inline CSS, so only `#rgb` / `#rrggbb` get through.
pub fn validate_color(color: &str) -> String {
    if HEX_COLOR.is_match(color) {
        color.to_string()
    } else {
        DEFAULT_PRIMARY_COLOR.to_string()
    }
}

pub fn validate_font_family(font: &str) -> String {
    if ALLOWED_FONTS.contains(&font) {
        font.to_string()
    } else {
        DEFAULT_FONT_FAMILY.to_string()
    }
}

pub fn validate_generation_input(input: &GenerationInput) -> Result<()> {
    require_text("productName", &input.product_name)?;
    require_text("productCategory", &input.product_category)?;
    require_text("targetUserImage", &input.target_user_image)?;

    if input.brand_images.is_empty() {
        return Err(anyhow!("brandImages requires at least one entry"));
    }

    if input.brand_images.len() > MAX_BRAND_IMAGES {
        return Err(anyhow!(
            "brandImages accepts at most {} entries",
            MAX_BRAND_IMAGES
        ));
    }

    for image in &input.brand_images {
        require_text("brandImages", image)?;
    }

    Ok(())
}

pub fn validate_create_page_request(request: &CreatePageRequest) -> Result<()> {
    require_text("templateId", &request.template_id)?;

    if request.selected_copies.is_empty() {
        return Err(anyhow!("selectedCopies requires at least one entry"));
    }

    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{} is required", field));
    }

    Ok(())
}
