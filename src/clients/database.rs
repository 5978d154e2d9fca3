use anyhow::{Error, Result, anyhow};
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info};

use crate::{
    models::{
        generation::{CreateGenerationLog, GenerationLog},
        landing_page::{CreateLandingPage, CreatePageView, LandingPage, LandingPageSummary},
        metadata::LpMetadata,
        template::{LpTemplate, PageConfig},
    },
    utils::parse_json_or_default,
};

const MIGRATIONS: [(&str, &str); 3] = [
    (
        "0001_generation_logs",
        include_str!("../../migrations/0001_generation_logs.sql"),
    ),
    (
        "0002_landing_pages",
        include_str!("../../migrations/0002_landing_pages.sql"),
    ),
    (
        "0003_landing_page_metadata",
        include_str!("../../migrations/0003_landing_page_metadata.sql"),
    ),
];

const LANDING_PAGE_COLUMNS: &str = "id, generation_log_id, template_id, title, selected_copies, \
    config, html_content, is_public, share_url, og_image_url, view_count, metadata, \
    created_at, updated_at, deleted_at";

const TEMPLATE_COLUMNS: &str =
    "id, name, description, thumbnail_url, base_html, default_config, category, is_active";

pub struct DatabaseClient {
    client: Client,
}

impl DatabaseClient {
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        info!("Connecting to PostgreSQL database");

        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection closed with error");
            }
        });

        info!("PostgreSQL connection established");

        Ok(Self { client })
    }

    /// Applies the embedded schema. Every statement is idempotent.
    pub async fn migrate(&self) -> Result<(), Error> {
        for (name, sql) in MIGRATIONS {
            self.client
                .batch_execute(sql)
                .await
                .map_err(|e| anyhow!("Migration {} failed: {}", name, e))?;

            debug!(migration = name, "Migration applied");
        }

        info!(count = MIGRATIONS.len(), "Database schema is up to date");

        Ok(())
    }

    pub async fn insert_generation_log(&self, log: &CreateGenerationLog) -> Result<(), Error> {
        let provider = log.provider.to_string();

        self.client
            .execute(
                r#"
                INSERT INTO generation_logs (
                    id,
                    product_name,
                    product_category,
                    brand_images,
                    target_user_image,
                    story,
                    candidates,
                    provider,
                    model_name,
                    temperature,
                    prompt,
                    usage_prompt_tokens,
                    usage_completion_tokens,
                    usage_total_tokens
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
                &[
                    &log.id,
                    &log.product_name,
                    &log.product_category,
                    &log.brand_images,
                    &log.target_user_image,
                    &log.story,
                    &log.candidates,
                    &provider,
                    &log.model_name,
                    &log.temperature,
                    &log.prompt,
                    &log.usage.prompt_tokens,
                    &log.usage.completion_tokens,
                    &log.usage.total_tokens,
                ],
            )
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    generation_log_id = %log.id,
                    "Failed to write generation log"
                );
                anyhow!("Database write failed: {}", e)
            })?;

        debug!(
            generation_log_id = %log.id,
            provider = %provider,
            "Generation log written to database"
        );

        Ok(())
    }

    pub async fn get_generation_log(&self, id: &str) -> Result<Option<GenerationLog>, Error> {
        let row = self
            .client
            .query_opt(
                r#"
                SELECT id, product_name, product_category, brand_images, target_user_image,
                       story, candidates, provider, model_name, temperature, prompt,
                       usage_prompt_tokens, usage_completion_tokens, usage_total_tokens,
                       created_at
                FROM generation_logs
                WHERE id = $1
                "#,
                &[&id],
            )
            .await
            .map_err(|e| anyhow!("Failed to load generation log: {}", e))?;

        row.as_ref().map(generation_log_from_row).transpose()
    }

    pub async fn list_active_templates(&self) -> Result<Vec<LpTemplate>, Error> {
        let sql = format!(
            "SELECT {} FROM lp_templates WHERE is_active = TRUE ORDER BY created_at, id",
            TEMPLATE_COLUMNS
        );
        let rows = self
            .client
            .query(sql.as_str(), &[])
            .await
            .map_err(|e| anyhow!("Failed to list templates: {}", e))?;

        rows.iter().map(template_from_row).collect()
    }

    pub async fn get_template(&self, id: &str) -> Result<Option<LpTemplate>, Error> {
        let sql = format!("SELECT {} FROM lp_templates WHERE id = $1", TEMPLATE_COLUMNS);
        let row = self
            .client
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(|e| anyhow!("Failed to load template: {}", e))?;

        row.as_ref().map(template_from_row).transpose()
    }

    /// Returns `true` when the template was inserted, `false` if the id exists.
    pub async fn insert_template_if_absent(&self, template: &LpTemplate) -> Result<bool, Error> {
        let inserted = self
            .client
            .execute(
                r#"
                INSERT INTO lp_templates (
                    id, name, description, thumbnail_url, base_html, default_config,
                    category, is_active
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (id) DO NOTHING
                "#,
                &[
                    &template.id,
                    &template.name,
                    &template.description,
                    &template.thumbnail_url,
                    &template.base_html,
                    &template.default_config,
                    &template.category,
                    &template.is_active,
                ],
            )
            .await
            .map_err(|e| anyhow!("Failed to seed template {}: {}", template.id, e))?;

        Ok(inserted > 0)
    }

    pub async fn insert_landing_page(&self, page: &CreateLandingPage) -> Result<(), Error> {
        let selected_copies = serde_json::to_string(&page.selected_copies)?;
        let config = serde_json::to_string(&page.config)?;
        let metadata = serde_json::to_string(&page.metadata)?;

        self.client
            .execute(
                r#"
                INSERT INTO landing_pages (
                    id, generation_log_id, template_id, title, selected_copies, config,
                    html_content, is_public, share_url, view_count, metadata
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, 0, $9)
                "#,
                &[
                    &page.id,
                    &page.generation_log_id,
                    &page.template_id,
                    &page.title,
                    &selected_copies,
                    &config,
                    &page.html_content,
                    &page.share_url,
                    &metadata,
                ],
            )
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    landing_page_id = %page.id,
                    "Failed to write landing page"
                );
                anyhow!("Database write failed: {}", e)
            })?;

        debug!(landing_page_id = %page.id, "Landing page written to database");

        Ok(())
    }

    pub async fn get_landing_page(&self, id: &str) -> Result<Option<LandingPage>, Error> {
        let sql = format!("SELECT {} FROM landing_pages WHERE id = $1", LANDING_PAGE_COLUMNS);
        let row = self
            .client
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(|e| anyhow!("Failed to load landing page: {}", e))?;

        row.as_ref().map(landing_page_from_row).transpose()
    }

    pub async fn find_public_page_by_share_url(
        &self,
        share_url: &str,
    ) -> Result<Option<LandingPage>, Error> {
        let sql = format!(
            "SELECT {} FROM landing_pages WHERE share_url = $1 AND is_public = TRUE",
            LANDING_PAGE_COLUMNS
        );
        let row = self
            .client
            .query_opt(sql.as_str(), &[&share_url])
            .await
            .map_err(|e| anyhow!("Failed to load shared page: {}", e))?;

        row.as_ref().map(landing_page_from_row).transpose()
    }

    pub async fn increment_view_count(&self, id: &str) -> Result<(), Error> {
        self.client
            .execute(
                "UPDATE landing_pages SET view_count = view_count + 1 WHERE id = $1",
                &[&id],
            )
            .await
            .map_err(|e| anyhow!("Failed to increment view count: {}", e))?;

        Ok(())
    }

    pub async fn record_view(&self, view: &CreatePageView) -> Result<(), Error> {
        self.client
            .execute(
                r#"
                INSERT INTO lp_views (id, landing_page_id, ip_address, user_agent, referrer)
                VALUES ($1, $2, $3, $4, $5)
                "#,
                &[
                    &view.id,
                    &view.landing_page_id,
                    &view.ip_address,
                    &view.user_agent,
                    &view.referrer,
                ],
            )
            .await
            .map_err(|e| anyhow!("Failed to record page view: {}", e))?;

        Ok(())
    }

    pub async fn list_landing_pages(&self) -> Result<Vec<LandingPageSummary>, Error> {
        let rows = self
            .client
            .query(
                r#"
                SELECT lp.id, lp.title, lp.share_url, lp.view_count, lp.is_public,
                       lp.created_at, gl.product_name
                FROM landing_pages lp
                LEFT JOIN generation_logs gl ON lp.generation_log_id = gl.id
                ORDER BY lp.created_at DESC
                "#,
                &[],
            )
            .await
            .map_err(|e| anyhow!("Failed to list landing pages: {}", e))?;

        rows.iter()
            .map(|row| -> Result<LandingPageSummary, Error> {
                Ok(LandingPageSummary {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    share_url: row.try_get("share_url")?,
                    view_count: row.try_get("view_count")?,
                    is_public: row.try_get("is_public")?,
                    created_at: row.try_get("created_at")?,
                    product_name: row.try_get("product_name")?,
                })
            })
            .collect()
    }

    pub async fn count_views(&self) -> Result<i64, Error> {
        let row = self
            .client
            .query_one("SELECT COUNT(id) AS count FROM lp_views", &[])
            .await
            .map_err(|e| anyhow!("Failed to count page views: {}", e))?;

        Ok(row.try_get("count")?)
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        self.client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| anyhow!("Database health check failed: {}", e))?;

        Ok(())
    }
}

fn generation_log_from_row(row: &Row) -> Result<GenerationLog, Error> {
    Ok(GenerationLog {
        id: row.try_get("id")?,
        product_name: row.try_get("product_name")?,
        product_category: row.try_get("product_category")?,
        brand_images: row.try_get("brand_images")?,
        target_user_image: row.try_get("target_user_image")?,
        story: row.try_get("story")?,
        candidates: row.try_get("candidates")?,
        provider: row.try_get("provider")?,
        model_name: row.try_get("model_name")?,
        temperature: row.try_get("temperature")?,
        prompt: row.try_get("prompt")?,
        usage_prompt_tokens: row.try_get("usage_prompt_tokens")?,
        usage_completion_tokens: row.try_get("usage_completion_tokens")?,
        usage_total_tokens: row.try_get("usage_total_tokens")?,
        created_at: row.try_get("created_at")?,
    })
}

fn template_from_row(row: &Row) -> Result<LpTemplate, Error> {
    Ok(LpTemplate {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        thumbnail_url: row.try_get("thumbnail_url")?,
        base_html: row.try_get("base_html")?,
        default_config: row.try_get("default_config")?,
        category: row.try_get("category")?,
        is_active: row.try_get("is_active")?,
    })
}

fn landing_page_from_row(row: &Row) -> Result<LandingPage, Error> {
    let selected_copies: String = row.try_get("selected_copies")?;
    let config: String = row.try_get("config")?;
    let metadata: Option<String> = row.try_get("metadata")?;

    Ok(LandingPage {
        id: row.try_get("id")?,
        generation_log_id: row.try_get("generation_log_id")?,
        template_id: row.try_get("template_id")?,
        title: row.try_get("title")?,
        selected_copies: parse_json_or_default(Some(selected_copies.as_str())),
        config: parse_json_or_default::<PageConfig>(Some(config.as_str())),
        html_content: row.try_get("html_content")?,
        is_public: row.try_get("is_public")?,
        share_url: row.try_get("share_url")?,
        og_image_url: row.try_get("og_image_url")?,
        view_count: row.try_get("view_count")?,
        metadata: metadata
            .as_deref()
            .and_then(|raw| serde_json::from_str::<LpMetadata>(raw).ok()),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}
