//! Font families declared by font nodes, resolved lazily when text uses them.

use crate::error::RenderError;
use crate::options::FontDefinition;
use inkpage_style::{FontStyle, FontWeight};
use inkpage_traits::{ResourceFetcher, SharedResourceData};
use std::collections::HashMap;

/// One (style, weight) face of a family and, once fetched, its bytes.
#[derive(Debug, Clone)]
pub struct FontVariant {
    source: String,
    style: FontStyle,
    weight: FontWeight,
    data: Option<SharedResourceData>,
    // Bumped each time the source is replaced.
    revision: u32,
}

impl FontVariant {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// The fetched font file, if it has been loaded.
    pub fn bytes(&self) -> Option<&SharedResourceData> {
        self.data.as_ref()
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// The name the writer knows this variant's current bytes by. Once the
    /// source is replaced the name changes, so the new file gets embedded
    /// next to the old one instead of being shadowed by it.
    pub fn writer_name(&self, font_name: &str) -> String {
        match self.revision {
            0 => font_name.to_string(),
            revision => format!("{}-r{}", font_name, revision),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FontFamily {
    name: String,
    variants: Vec<FontVariant>,
}

impl FontFamily {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variants: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[FontVariant] {
        &self.variants
    }

    pub fn find(&self, style: FontStyle, weight: FontWeight) -> Option<&FontVariant> {
        self.variants
            .iter()
            .find(|v| v.style == style && v.weight == weight)
    }

    fn find_mut(&mut self, style: FontStyle, weight: FontWeight) -> Option<&mut FontVariant> {
        self.variants
            .iter_mut()
            .find(|v| v.style == style && v.weight == weight)
    }

    /// Adds a variant, or points an existing (style, weight) at a new source.
    /// Bytes loaded for a replaced source are dropped.
    fn upsert(&mut self, style: FontStyle, weight: FontWeight, source: String) {
        match self.find_mut(style, weight) {
            Some(existing) => {
                if existing.source != source {
                    existing.source = source;
                    existing.data = None;
                    existing.revision += 1;
                }
            }
            None => self.variants.push(FontVariant {
                source,
                style,
                weight,
                data: None,
                revision: 0,
            }),
        }
    }
}

/// Per-render registry of font families.
#[derive(Debug, Default)]
pub struct FontRegistry {
    families: HashMap<String, FontFamily>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares variants for `family`, creating the family on first use.
    /// Definitions without a style or weight get normal / 400.
    pub fn register_font<I>(&mut self, family: &str, definitions: I)
    where
        I: IntoIterator<Item = FontDefinition>,
    {
        let entry = self
            .families
            .entry(family.to_string())
            .or_insert_with(|| FontFamily::new(family));
        for definition in definitions {
            let style = definition.style.unwrap_or_default();
            let weight = definition.weight.unwrap_or_default();
            log::debug!(
                "Font variant {} registered from '{}'",
                Self::get_font_name(family, Some(style), Some(weight)),
                definition.src
            );
            entry.upsert(style, weight, definition.src);
        }
    }

    /// Resolves a variant and makes sure its bytes are loaded. A variant is
    /// fetched at most once per registry.
    pub async fn get_font_file(
        &mut self,
        family: &str,
        style: Option<FontStyle>,
        weight: Option<FontWeight>,
        fetcher: &dyn ResourceFetcher,
    ) -> Result<&FontVariant, RenderError> {
        let style = style.unwrap_or_default();
        let weight = weight.unwrap_or_default();
        let entry = self
            .families
            .get_mut(family)
            .ok_or_else(|| RenderError::FamilyNotFound {
                family: family.to_string(),
            })?;
        let variant = entry
            .find_mut(style, weight)
            .ok_or_else(|| RenderError::VariantNotFound {
                family: family.to_string(),
                style,
                weight: weight.value(),
            })?;

        if variant.data.is_none() {
            log::debug!("Fetching font file '{}' for family '{}'", variant.source, family);
            let data = fetcher.fetch(&variant.source).await?;
            variant.data = Some(data);
        }
        Ok(variant)
    }

    /// The writer-facing name of a variant, e.g. `Sans-normal-400`.
    pub fn get_font_name(
        family: &str,
        style: Option<FontStyle>,
        weight: Option<FontWeight>,
    ) -> String {
        format!(
            "{}-{}-{}",
            family,
            style.unwrap_or_default(),
            weight.unwrap_or_default()
        )
    }

    pub fn family(&self, name: &str) -> Option<&FontFamily> {
        self.families.get(name)
    }

    pub fn families(&self) -> impl Iterator<Item = &FontFamily> {
        self.families.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpage_traits::{InMemoryFetcher, ResourceError};

    fn sans() -> Vec<FontDefinition> {
        vec![
            FontDefinition::new("fonts/sans.ttf"),
            FontDefinition::new("fonts/sans-bold.ttf").with_weight(FontWeight::BOLD),
        ]
    }

    #[test]
    fn defaults_fill_in_style_and_weight() {
        let mut registry = FontRegistry::new();
        registry.register_font("Sans", sans());
        let family = registry.family("Sans").unwrap();
        let regular = family.find(FontStyle::Normal, FontWeight::NORMAL).unwrap();
        assert_eq!(regular.source(), "fonts/sans.ttf");
        assert!(regular.bytes().is_none());
    }

    #[test]
    fn upsert_overwrites_existing_variant() {
        let mut registry = FontRegistry::new();
        registry.register_font("Sans", sans());
        registry.register_font(
            "Sans",
            vec![FontDefinition::new("fonts/other-bold.ttf").with_weight("bold".parse().unwrap())],
        );
        let family = registry.family("Sans").unwrap();
        assert_eq!(family.variants().len(), 2);
        assert_eq!(
            family.find(FontStyle::Normal, FontWeight::BOLD).unwrap().source(),
            "fonts/other-bold.ttf"
        );
    }

    #[test]
    fn duplicate_definitions_collapse() {
        let mut registry = FontRegistry::new();
        registry.register_font(
            "Sans",
            vec![
                FontDefinition::new("a.ttf").with_weight(FontWeight::numeric(700)),
                FontDefinition::new("b.ttf").with_weight(FontWeight::BOLD),
            ],
        );
        let family = registry.family("Sans").unwrap();
        assert_eq!(family.variants().len(), 1);
        assert_eq!(family.variants()[0].source(), "b.ttf");
    }

    #[test]
    fn font_names_are_stable() {
        assert_eq!(FontRegistry::get_font_name("Sans", None, None), "Sans-normal-400");
        assert_eq!(
            FontRegistry::get_font_name("Sans", Some(FontStyle::Italic), Some(FontWeight::BOLD)),
            "Sans-italic-700"
        );
        assert_eq!(
            FontRegistry::get_font_name("Sans", None, Some(FontWeight::NORMAL)),
            FontRegistry::get_font_name("Sans", Some(FontStyle::Normal), None)
        );
    }

    #[tokio::test]
    async fn variant_is_fetched_once() {
        let fetcher = InMemoryFetcher::new().with("fonts/sans.ttf", b"font-bytes".to_vec());
        let mut registry = FontRegistry::new();
        registry.register_font("Sans", sans());

        for _ in 0..2 {
            let variant = registry
                .get_font_file("Sans", None, None, &fetcher)
                .await
                .unwrap();
            assert_eq!(variant.bytes().map(|b| b.as_slice()), Some(&b"font-bytes"[..]));
        }
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn replaced_source_is_fetched_again() {
        let fetcher = InMemoryFetcher::new()
            .with("fonts/sans.ttf", b"old".to_vec())
            .with("fonts/sans-v2.ttf", b"new".to_vec());
        let mut registry = FontRegistry::new();
        registry.register_font("Sans", sans());
        registry.get_font_file("Sans", None, None, &fetcher).await.unwrap();

        registry.register_font("Sans", vec![FontDefinition::new("fonts/sans-v2.ttf")]);
        let variant = registry.get_font_file("Sans", None, None, &fetcher).await.unwrap();
        assert_eq!(variant.bytes().map(|b| b.as_slice()), Some(&b"new"[..]));
        assert_eq!(variant.writer_name("Sans-normal-400"), "Sans-normal-400-r1");
        assert_eq!(fetcher.fetch_count(), 2);
    }

    #[test]
    fn same_source_keeps_writer_name() {
        let mut registry = FontRegistry::new();
        registry.register_font("Sans", sans());
        registry.register_font("Sans", vec![FontDefinition::new("fonts/sans.ttf")]);
        let regular = registry
            .family("Sans")
            .unwrap()
            .find(FontStyle::Normal, FontWeight::NORMAL)
            .unwrap();
        assert_eq!(regular.revision(), 0);
        assert_eq!(regular.writer_name("Sans-normal-400"), "Sans-normal-400");
    }

    #[tokio::test]
    async fn lookup_failures() {
        let fetcher = InMemoryFetcher::new();
        let mut registry = FontRegistry::new();

        let err = registry.get_font_file("Serif", None, None, &fetcher).await.unwrap_err();
        assert!(matches!(err, RenderError::FamilyNotFound { ref family } if family == "Serif"));

        registry.register_font("Sans", sans());
        let err = registry
            .get_font_file("Sans", Some(FontStyle::Italic), None, &fetcher)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Font not found: Sans italic 400");

        let err = registry.get_font_file("Sans", None, None, &fetcher).await.unwrap_err();
        assert!(matches!(
            err,
            RenderError::Resource(ResourceError::NotFound(ref src)) if src == "fonts/sans.ttf"
        ));
        assert!(registry.family("Sans").unwrap().variants()[0].bytes().is_none());
    }
}
