//! Catalog seeding
//!
//! Upserts the built-in achievements and workout templates by name, so it can
//! run on every startup. Edits to the definitions replace the stored rows;
//! template usage counts are kept.

use crate::repositories::{AchievementRepository, TemplateRepository};
use anyhow::{Context, Result};
use fitness_tracker_shared::catalog::{default_achievements, default_templates};
use sqlx::PgPool;
use tracing::info;

/// Counts of seeded rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub achievements: usize,
    pub templates: usize,
}

pub async fn ensure_catalog(pool: &PgPool) -> Result<SeedReport> {
    let achievements = default_achievements();
    for (order, definition) in achievements.iter().enumerate() {
        let display_order = i32::try_from(order).context("catalog too large")?;
        AchievementRepository::upsert(pool, definition, display_order)
            .await
            .with_context(|| format!("seeding achievement {}", definition.name))?;
    }

    let templates = default_templates();
    for definition in &templates {
        TemplateRepository::upsert_catalog(pool, definition)
            .await
            .with_context(|| format!("seeding template {}", definition.name))?;
    }

    let report = SeedReport {
        achievements: achievements.len(),
        templates: templates.len(),
    };
    info!(
        achievements = report.achievements,
        templates = report.templates,
        "Catalog seeded"
    );
    Ok(report)
}
