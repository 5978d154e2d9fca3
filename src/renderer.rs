//! Placeholder substitution for landing page templates.
//!
//! Templates are plain HTML carrying `{{name}}` tokens. Every recognized token
//! is replaced in one pass with an HTML-escaped context value, except
//! `{{copy_buttons}}` which receives markup produced by [`build_copy_buttons`].
//! Unknown tokens are left in place.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-z_]+)\}\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    ProductName,
    ProductCategory,
    MainCopy,
    SubCopy,
    Story,
    CtaText,
    CtaUrl,
    CopyButtons,
    TargetUser,
    SubDescription,
    OgDescription,
    PrimaryColor,
    FontFamily,
}

impl Placeholder {
    pub const ALL: [Placeholder; 13] = [
        Placeholder::ProductName,
        Placeholder::ProductCategory,
        Placeholder::MainCopy,
        Placeholder::SubCopy,
        Placeholder::Story,
        Placeholder::CtaText,
        Placeholder::CtaUrl,
        Placeholder::CopyButtons,
        Placeholder::TargetUser,
        Placeholder::SubDescription,
        Placeholder::OgDescription,
        Placeholder::PrimaryColor,
        Placeholder::FontFamily,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::ProductName => "product_name",
            Placeholder::ProductCategory => "product_category",
            Placeholder::MainCopy => "main_copy",
            Placeholder::SubCopy => "sub_copy",
            Placeholder::Story => "story",
            Placeholder::CtaText => "cta_text",
            Placeholder::CtaUrl => "cta_url",
            Placeholder::CopyButtons => "copy_buttons",
            Placeholder::TargetUser => "target_user",
            Placeholder::SubDescription => "sub_description",
            Placeholder::OgDescription => "og_description",
            Placeholder::PrimaryColor => "primary_color",
            Placeholder::FontFamily => "font_family",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|placeholder| placeholder.name() == name)
    }

    /// The token as it appears in a template, e.g. `{{main_copy}}`.
    pub fn token(&self) -> String {
        format!("{{{{{}}}}}", self.name())
    }

    /// Only the copy-button block is inserted without escaping.
    pub fn is_markup(&self) -> bool {
        matches!(self, Placeholder::CopyButtons)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub product_name: String,
    pub product_category: String,
    pub main_copy: String,
    pub sub_copy: String,
    pub story: String,
    pub cta_text: String,
    pub cta_url: String,
    pub copy_buttons: String,
    pub target_user_image: String,
    pub sub_description: String,
    pub og_description: String,
    pub primary_color: String,
    pub font_family: String,
}

impl RenderContext {
    pub fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::ProductName => &self.product_name,
            Placeholder::ProductCategory => &self.product_category,
            Placeholder::MainCopy => &self.main_copy,
            Placeholder::SubCopy => &self.sub_copy,
            Placeholder::Story => &self.story,
            Placeholder::CtaText => &self.cta_text,
            Placeholder::CtaUrl => &self.cta_url,
            Placeholder::CopyButtons => &self.copy_buttons,
            Placeholder::TargetUser => &self.target_user_image,
            Placeholder::SubDescription => &self.sub_description,
            Placeholder::OgDescription => &self.og_description,
            Placeholder::PrimaryColor => &self.primary_color,
            Placeholder::FontFamily => &self.font_family,
        }
    }
}

pub struct TemplateRenderer<'a> {
    template_html: &'a str,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(template_html: &'a str) -> Self {
        Self { template_html }
    }

    pub fn render(&self, context: &RenderContext) -> String {
        let mut unknown = 0usize;

        let rendered = PLACEHOLDER.replace_all(self.template_html, |caps: &Captures| {
            match Placeholder::from_name(&caps[1]) {
                Some(placeholder) if placeholder.is_markup() => {
                    context.value(placeholder).to_string()
                }
                Some(placeholder) => escape_html(context.value(placeholder)),
                None => {
                    unknown += 1;
                    caps[0].to_string()
                }
            }
        });

        if unknown > 0 {
            debug!(
                unknown_placeholders = unknown,
                "Template contains unrecognized placeholders, leaving them as-is"
            );
        }

        rendered.into_owned()
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

/// One selectable button per copy. Copy text is escaped both in the
/// `data-copy` attribute and in the button label.
pub fn build_copy_buttons(copies: &[String], selected_index: Option<usize>) -> String {
    copies
        .iter()
        .enumerate()
        .map(|(index, copy)| {
            let escaped = escape_html(copy);
            format!(
                r#"<button class="tag" aria-pressed="{}" data-copy="{}">{}</button>"#,
                selected_index == Some(index),
                escaped,
                escaped
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
