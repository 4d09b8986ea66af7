//! Loads templates by slug and renders them per recipient.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::store::TemplateStore;

use super::render::{placeholders, render};

/// What to send: a stored template or an inline subject/body pair.
///
/// A non-blank `template` wins; otherwise `subject` and `body` are
/// required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageContent {
    /// Template slug.
    #[serde(default)]
    pub template: Option<String>,
    /// Inline subject.
    #[serde(default)]
    pub subject: Option<String>,
    /// Inline body.
    #[serde(default)]
    pub body: Option<String>,
    /// Values for `{{placeholders}}`.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl MessageContent {
    /// Content backed by a stored template.
    pub fn template(slug: impl Into<String>, variables: BTreeMap<String, String>) -> Self {
        Self {
            template: Some(slug.into()),
            variables,
            ..Self::default()
        }
    }

    /// Content composed by the caller.
    pub fn inline(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            body: Some(body.into()),
            ..Self::default()
        }
    }
}

/// Final text for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    /// Subject line.
    pub subject: String,
    /// Body.
    pub body: String,
}

/// A loaded pattern pair plus its base variables, ready to render.
#[derive(Debug, Clone)]
pub struct PreparedMessage {
    /// Slug the patterns came from, if any.
    pub slug: Option<String>,
    subject: String,
    body: String,
    variables: HashMap<String, String>,
}

impl PreparedMessage {
    /// Render with the base variables only.
    pub fn render(&self) -> RenderedMessage {
        RenderedMessage {
            subject: render(&self.subject, &self.variables),
            body: render(&self.body, &self.variables),
        }
    }

    /// Render with per-recipient defaults that never override the base
    /// variables.
    pub fn render_with(&self, defaults: &[(&str, &str)]) -> RenderedMessage {
        if defaults.is_empty() {
            return self.render();
        }
        let mut vars = self.variables.clone();
        for (key, value) in defaults {
            vars.entry((*key).to_string())
                .or_insert_with(|| (*value).to_string());
        }
        RenderedMessage {
            subject: render(&self.subject, &vars),
            body: render(&self.body, &vars),
        }
    }

    /// Placeholder names the patterns reference.
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut names = placeholders(&self.subject);
        names.extend(placeholders(&self.body));
        names
    }
}

/// Resolves [`MessageContent`] into a [`PreparedMessage`].
#[derive(Clone)]
pub struct TemplateResolver {
    store: Arc<dyn TemplateStore>,
}

impl std::fmt::Debug for TemplateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateResolver").finish_non_exhaustive()
    }
}

impl TemplateResolver {
    /// Create a resolver over a template store.
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Load the template (once) or validate the inline pair.
    ///
    /// An unknown slug is a hard failure, never an empty message.
    pub async fn prepare(
        &self,
        content: &MessageContent,
    ) -> Result<PreparedMessage, DispatchError> {
        let variables: HashMap<String, String> = content
            .variables
            .iter()
            .map(|(k, v)| (k.trim().to_string(), v.clone()))
            .collect();

        let slug = content
            .template
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(slug) = slug {
            let template = self
                .store
                .find_template(slug)
                .await?
                .ok_or_else(|| DispatchError::TemplateNotFound(slug.to_string()))?;
            return Ok(PreparedMessage {
                slug: Some(template.slug),
                subject: template.subject,
                body: template.body,
                variables,
            });
        }

        let subject =
            non_blank(content.subject.as_deref()).ok_or(DispatchError::MissingField("title"))?;
        let body =
            non_blank(content.body.as_deref()).ok_or(DispatchError::MissingField("body"))?;
        Ok(PreparedMessage {
            slug: None,
            subject: subject.to_string(),
            body: body.to_string(),
            variables,
        })
    }

    /// Load and render in one step.
    pub async fn resolve(
        &self,
        content: &MessageContent,
    ) -> Result<RenderedMessage, DispatchError> {
        Ok(self.prepare(content).await?.render())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use portal_core::result::AppResult;
    use portal_entity::template::NotificationTemplate;

    struct OneTemplate;

    #[async_trait]
    impl TemplateStore for OneTemplate {
        async fn find_template(&self, slug: &str) -> AppResult<Option<NotificationTemplate>> {
            Ok((slug == "greeting").then(|| NotificationTemplate {
                slug: "greeting".to_string(),
                subject: "Hi {{x}}".to_string(),
                body: "{{x}}, {{x}} and {{x}} {{missing}}".to_string(),
                description: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        }
    }

    fn resolver() -> TemplateResolver {
        TemplateResolver::new(Arc::new(OneTemplate))
    }

    #[tokio::test]
    async fn test_template_variable_used_three_times() {
        let content = MessageContent::template(
            "greeting",
            BTreeMap::from([("x".to_string(), "Ravi".to_string())]),
        );
        let out = resolver().resolve(&content).await.unwrap();
        assert_eq!(out.subject, "Hi Ravi");
        assert_eq!(out.body, "Ravi, Ravi and Ravi ");
    }

    #[tokio::test]
    async fn test_unknown_slug_is_setup_error() {
        let content = MessageContent::template("nope", BTreeMap::new());
        let err = resolver().resolve(&content).await.unwrap_err();
        assert!(matches!(err, DispatchError::TemplateNotFound(slug) if slug == "nope"));
    }

    #[tokio::test]
    async fn test_inline_content_falls_back_when_no_slug() {
        let mut content = MessageContent::inline("Office notice", "Hello {{name}}");
        content.template = Some("  ".to_string());
        let prepared = resolver().prepare(&content).await.unwrap();
        assert_eq!(prepared.slug, None);
        let out = prepared.render_with(&[("name", "Meera")]);
        assert_eq!(out.body, "Hello Meera");
    }

    #[tokio::test]
    async fn test_inline_requires_body() {
        let content = MessageContent {
            subject: Some("Title".to_string()),
            ..MessageContent::default()
        };
        let err = resolver().prepare(&content).await.unwrap_err();
        assert!(matches!(err, DispatchError::MissingField("body")));
    }

    #[tokio::test]
    async fn test_recipient_defaults_do_not_override_caller_values() {
        let mut content = MessageContent::inline("s", "{{name}}");
        content.variables.insert("name".to_string(), "Fixed".to_string());
        let prepared = resolver().prepare(&content).await.unwrap();
        assert_eq!(prepared.render_with(&[("name", "Other")]).body, "Fixed");
    }
}
