use crate::error::RenderError;
use handlebars::Handlebars;
use serde_json::Value;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Produces the annotated markup for a render.
pub trait MarkupSource: Send + Sync {
    fn markup(&self) -> Result<Cow<'_, str>, RenderError>;
}

impl MarkupSource for str {
    fn markup(&self) -> Result<Cow<'_, str>, RenderError> {
        Ok(Cow::Borrowed(self))
    }
}

impl MarkupSource for String {
    fn markup(&self) -> Result<Cow<'_, str>, RenderError> {
        Ok(Cow::Borrowed(self.as_str()))
    }
}

/// A handlebars template rendered with JSON data.
///
/// Values are HTML-escaped on the way in; the renderer decodes entities
/// when it reads text and option payloads back out.
#[derive(Debug)]
pub struct HandlebarsSource {
    template: String,
    data: Value,
    registry: Handlebars<'static>,
}

impl HandlebarsSource {
    pub fn new(template: impl Into<String>, data: Value) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        Self {
            template: template.into(),
            data,
            registry,
        }
    }

    /// Rejects templates that reference missing data instead of rendering
    /// them as empty strings.
    pub fn strict(mut self, strict: bool) -> Self {
        self.registry.set_strict_mode(strict);
        self
    }

    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        template_path: P,
        data_path: Q,
    ) -> Result<Self, RenderError> {
        let template = fs::read_to_string(template_path.as_ref())?;
        let data: Value = serde_json::from_str(&fs::read_to_string(data_path.as_ref())?)
            .map_err(|e| RenderError::Template(format!("Invalid template data: {}", e)))?;
        Ok(Self::new(template, data))
    }
}

impl MarkupSource for HandlebarsSource {
    fn markup(&self) -> Result<Cow<'_, str>, RenderError> {
        let rendered = self.registry.render_template(&self.template, &self.data)?;
        Ok(Cow::Owned(rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_pass_through() {
        let markup = "<div></div>".to_string();
        assert_eq!(markup.markup().unwrap(), "<div></div>");
        assert_eq!("<p></p>".markup().unwrap(), "<p></p>");
    }

    #[test]
    fn handlebars_values_are_escaped() {
        let source = HandlebarsSource::new(
            "<p data-svelte-pdf-kit-type=\"text\">{{name}}</p>",
            json!({ "name": "Fish & Chips" }),
        );
        assert_eq!(
            source.markup().unwrap(),
            "<p data-svelte-pdf-kit-type=\"text\">Fish &amp; Chips</p>"
        );
    }

    #[test]
    fn strict_mode_reports_missing_fields() {
        let source = HandlebarsSource::new("{{missing}}", json!({})).strict(true);
        assert!(matches!(source.markup(), Err(RenderError::Template(_))));
    }
}
