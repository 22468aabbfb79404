//! Elements pinned to every page: recorded when first drawn and redrawn at
//! the same spot each time a page starts.

use crate::drawing::{self, DrawContext, FontSelector};
use crate::error::RenderError;
use crate::options::{ImageOptions, TextOptions};
use inkpage_types::Point;

#[derive(Debug, Clone, PartialEq)]
pub enum FixedElement {
    Text {
        content: String,
        font: Option<FontSelector>,
        options: TextOptions,
        before: Point,
        after: Point,
    },
    Image {
        source: String,
        options: ImageOptions,
        before: Point,
        after: Point,
    },
}

impl FixedElement {
    /// Cursor position just before the element was first drawn.
    pub fn before(&self) -> Point {
        match self {
            FixedElement::Text { before, .. } | FixedElement::Image { before, .. } => *before,
        }
    }

    /// Cursor position just after the element was first drawn.
    pub fn after(&self) -> Point {
        match self {
            FixedElement::Text { after, .. } | FixedElement::Image { after, .. } => *after,
        }
    }
}

/// Fixed elements ordered by where they left the cursor, top to bottom then
/// left to right.
#[derive(Debug, Default)]
pub struct FixedElementTracker {
    elements: Vec<FixedElement>,
}

impl FixedElementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, element: FixedElement) {
        self.elements.push(element);
        // Stable, so ties keep registration order.
        self.elements.sort_by(|a, b| {
            let (a, b) = (a.after(), b.after());
            a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
        });
    }

    pub fn elements(&self) -> &[FixedElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Redraws every element from its recorded `before` position, then puts
    /// the cursor back at the first element's `before`. Nothing is
    /// registered while replaying.
    pub async fn replay(&self, ctx: &mut DrawContext) -> Result<(), RenderError> {
        if self.elements.is_empty() {
            return Ok(());
        }
        log::debug!("Replaying {} fixed element(s)", self.elements.len());
        for element in &self.elements {
            ctx.writer.set_position(element.before());
            match element {
                // Still marked fixed, so replayed text never paginates.
                FixedElement::Text {
                    content,
                    font,
                    options,
                    ..
                } => {
                    drawing::draw_text(ctx, content, font.as_ref(), options).await?;
                }
                FixedElement::Image {
                    source, options, ..
                } => {
                    drawing::draw_image(ctx, source, options).await?;
                }
            }
        }
        if let Some(first) = self.elements.first() {
            ctx.writer.set_position(first.before());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_at(content: &str, after: Point) -> FixedElement {
        FixedElement::Text {
            content: content.to_string(),
            font: None,
            options: TextOptions::default(),
            before: Point::new(after.x, after.y - 14.0),
            after,
        }
    }

    fn contents(tracker: &FixedElementTracker) -> Vec<&str> {
        tracker
            .elements()
            .iter()
            .map(|e| match e {
                FixedElement::Text { content, .. } => content.as_str(),
                FixedElement::Image { source, .. } => source.as_str(),
            })
            .collect()
    }

    #[test]
    fn sorted_by_after_position() {
        let mut tracker = FixedElementTracker::new();
        tracker.register(text_at("footer", Point::new(72.0, 740.0)));
        tracker.register(text_at("header-right", Point::new(400.0, 86.0)));
        tracker.register(text_at("header-left", Point::new(72.0, 86.0)));
        assert_eq!(contents(&tracker), vec!["header-left", "header-right", "footer"]);
    }

    #[test]
    fn ties_keep_registration_order() {
        let mut tracker = FixedElementTracker::new();
        tracker.register(text_at("first", Point::new(72.0, 100.0)));
        tracker.register(FixedElement::Image {
            source: "second.png".into(),
            options: ImageOptions::default(),
            before: Point::new(72.0, 50.0),
            after: Point::new(72.0, 100.0),
        });
        assert_eq!(contents(&tracker), vec!["first", "second.png"]);
    }
}
