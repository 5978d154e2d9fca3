use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_PRIMARY_COLOR: &str = "#000000";
pub const DEFAULT_FONT_FAMILY: &str = "Noto Sans JP";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpTemplate {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub base_html: String,
    pub default_config: String,
    pub category: Option<String>,
    pub is_active: bool,
}

impl LpTemplate {
    pub fn parsed_default_config(&self) -> PageConfig {
        PageConfig::parse_or_fallback(&self.default_config)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Default,
    Minimal,
    Story,
}

/// Presentation options of a landing page. Every key is optional so that a
/// caller-supplied config can be layered over a template's defaults.
///
/// Keys are read one at a time: a value of the wrong type or an unknown
/// layout only unsets that key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_color: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_family: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub layout: Option<Layout>,
}

impl PageConfig {
    /// Used when a stored default config cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            primary_color: Some(DEFAULT_PRIMARY_COLOR.to_string()),
            font_family: Some(DEFAULT_FONT_FAMILY.to_string()),
            layout: Some(Layout::Default),
        }
    }

    pub fn parse_or_fallback(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            Ok(_) => {
                debug!("Default config is not a JSON object, using fallback");
                Self::fallback()
            }
            Err(e) => {
                debug!(error = %e, "Default config is not valid JSON, using fallback");
                Self::fallback()
            }
        }
    }

    /// Keys set on `self` win; missing keys are taken from `defaults`.
    pub fn merged_over(&self, defaults: &PageConfig) -> PageConfig {
        PageConfig {
            primary_color: self
                .primary_color
                .clone()
                .or_else(|| defaults.primary_color.clone()),
            font_family: self
                .font_family
                .clone()
                .or_else(|| defaults.font_family.clone()),
            layout: self.layout.or(defaults.layout),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
