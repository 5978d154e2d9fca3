use anyhow::{Error, Result};
use tracing::{debug, info};

use crate::{clients::database::DatabaseClient, models::template::LpTemplate};

const NEWSPAPER_HTML: &str = include_str!("../templates/newspaper.html");
const MINIMAL_HTML: &str = include_str!("../templates/minimal.html");

pub fn builtin_templates() -> Vec<LpTemplate> {
    vec![
        LpTemplate {
            id: "newspaper".to_string(),
            name: "新聞広告風".to_string(),
            description: Some("クラシックな新聞広告風のデザイン".to_string()),
            thumbnail_url: None,
            base_html: NEWSPAPER_HTML.to_string(),
            default_config: r##"{"primaryColor":"#0b0b0b","fontFamily":"Shippori Mincho","layout":"default"}"##
                .to_string(),
            category: Some("classic".to_string()),
            is_active: true,
        },
        LpTemplate {
            id: "minimal".to_string(),
            name: "ミニマルモダン".to_string(),
            description: Some("シンプルで洗練されたデザイン".to_string()),
            thumbnail_url: None,
            base_html: MINIMAL_HTML.to_string(),
            default_config: r##"{"primaryColor":"#000000","fontFamily":"Noto Sans JP","layout":"minimal"}"##
                .to_string(),
            category: Some("modern".to_string()),
            is_active: true,
        },
    ]
}

/// Inserts the built-in templates that are not stored yet. Existing rows are
/// left untouched so edited templates survive restarts.
pub async fn seed_templates(database_client: &DatabaseClient) -> Result<usize, Error> {
    let mut inserted = 0;

    for template in builtin_templates() {
        if database_client.insert_template_if_absent(&template).await? {
            debug!(template_id = %template.id, "Seeded built-in template");
            inserted += 1;
        }
    }

    info!(inserted, "Template catalogue ready");

    Ok(inserted)
}
