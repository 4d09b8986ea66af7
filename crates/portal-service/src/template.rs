//! Template management and previews.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_database::repositories::TemplateRepository;
use portal_entity::access::SystemAction;
use portal_entity::template::{NotificationTemplate, UpsertTemplate};
use portal_notify::{MessageContent, RenderedMessage, TemplateResolver};

use crate::context::RequestContext;

/// Slugs are lowercase ASCII letters, digits and dashes.
pub fn valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Template listing, editing and rendering previews.
#[derive(Debug, Clone)]
pub struct TemplateService {
    template_repo: Arc<TemplateRepository>,
    resolver: TemplateResolver,
}

impl TemplateService {
    /// Creates a new template service.
    pub fn new(template_repo: Arc<TemplateRepository>, resolver: TemplateResolver) -> Self {
        Self {
            template_repo,
            resolver,
        }
    }

    /// All templates.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<NotificationTemplate>> {
        ctx.guard().require_action(SystemAction::ManageTemplates)?;
        self.template_repo.find_all().await
    }

    /// One template by slug.
    pub async fn get(&self, ctx: &RequestContext, slug: &str) -> AppResult<NotificationTemplate> {
        ctx.guard().require_action(SystemAction::ManageTemplates)?;
        self.template_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Template '{slug}' not found")))
    }

    /// Create or replace a template.
    pub async fn upsert(
        &self,
        ctx: &RequestContext,
        slug: &str,
        data: &UpsertTemplate,
    ) -> AppResult<NotificationTemplate> {
        ctx.guard().require_action(SystemAction::ManageTemplates)?;
        if !valid_slug(slug) {
            return Err(AppError::validation(
                "Template slug must be lowercase letters, digits and dashes",
            ));
        }
        if data.subject.trim().is_empty() || data.body.trim().is_empty() {
            return Err(AppError::validation("Template subject and body are required"));
        }

        let template = self.template_repo.upsert(slug, data).await?;
        info!(actor = %ctx.uid(), slug = %slug, "Template saved");
        Ok(template)
    }

    /// Render a stored template with sample variables.
    pub async fn preview(
        &self,
        ctx: &RequestContext,
        slug: &str,
        variables: BTreeMap<String, String>,
    ) -> AppResult<RenderedMessage> {
        ctx.guard().require_action(SystemAction::ManageTemplates)?;
        Ok(self
            .resolver
            .resolve(&MessageContent::template(slug, variables))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rules() {
        assert!(valid_slug("leave-decision"));
        assert!(valid_slug("q3-offsite-2025"));
        assert!(!valid_slug("Leave Decision"));
        assert!(!valid_slug(""));
    }
}
