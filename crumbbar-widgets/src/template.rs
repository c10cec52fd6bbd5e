// SPDX-License-Identifier: LGPL-3.0-only
use nalgebra::Vector2;
use std::fmt::Display;
use std::sync::Arc;
use taffy::{AvailableSpace, Size};

/// Identity of an [ItemTemplate], used to key the recycle pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId(u64);

impl TemplateId {
    /// Generate a new unique template ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TemplateId {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders breadcrumb content. Only measurement matters to the layout.
pub trait ItemTemplate<T>: Send + Sync {
    /// Identity shared by every element created from this template.
    fn template_id(&self) -> TemplateId;

    /// Desired size of `content` under `constraints`.
    fn measure(&self, content: &T, constraints: Size<AvailableSpace>) -> Vector2<f32>;
}

/// Default template: a single line of text from the content's [Display] output.
///
/// Text is not shaped; the width is estimated from the character count.
#[derive(Debug, Clone)]
pub struct LabelTemplate {
    id: TemplateId,
    font_size: f32,
    char_width: f32,
    padding: Vector2<f32>,
}

impl LabelTemplate {
    /// Create a label template with a 14pt font.
    pub fn new() -> Self {
        Self {
            id: TemplateId::new(),
            font_size: 14.0,
            char_width: 0.5,
            padding: Vector2::new(8.0, 4.0),
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the average glyph advance as a fraction of the font size.
    pub fn with_char_width(mut self, char_width: f32) -> Self {
        self.char_width = char_width;
        self
    }

    /// Set horizontal and vertical padding, applied on both sides.
    pub fn with_padding(mut self, horizontal: f32, vertical: f32) -> Self {
        self.padding = Vector2::new(horizontal, vertical);
        self
    }

    /// Size of `text` rendered with this template.
    pub fn measure_text(&self, text: &str) -> Vector2<f32> {
        let glyphs = text.chars().count() as f32;
        Vector2::new(
            glyphs * self.font_size * self.char_width + self.padding.x * 2.0,
            self.font_size * 1.2 + self.padding.y * 2.0,
        )
    }
}

impl Default for LabelTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Display> ItemTemplate<T> for LabelTemplate {
    fn template_id(&self) -> TemplateId {
        self.id
    }

    fn measure(&self, content: &T, _constraints: Size<AvailableSpace>) -> Vector2<f32> {
        self.measure_text(&content.to_string())
    }
}

/// A template measuring content with a closure.
pub struct FnTemplate<T> {
    id: TemplateId,
    measure: Arc<dyn Fn(&T, Size<AvailableSpace>) -> Vector2<f32> + Send + Sync>,
}

impl<T> FnTemplate<T> {
    /// Create a new template from the given measure function.
    pub fn new<F>(measure: F) -> Self
    where
        F: Fn(&T, Size<AvailableSpace>) -> Vector2<f32> + Send + Sync + 'static,
    {
        Self {
            id: TemplateId::new(),
            measure: Arc::new(measure),
        }
    }
}

impl<T> Clone for FnTemplate<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            measure: self.measure.clone(),
        }
    }
}

impl<T> std::fmt::Debug for FnTemplate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTemplate").field("id", &self.id).finish()
    }
}

impl<T> ItemTemplate<T> for FnTemplate<T> {
    fn template_id(&self) -> TemplateId {
        self.id
    }

    fn measure(&self, content: &T, constraints: Size<AvailableSpace>) -> Vector2<f32> {
        (self.measure)(content, constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbbar_core::layout::unbounded_constraints;

    #[test]
    fn test_label_template_width() {
        let template = LabelTemplate::new().with_padding(0.0, 0.0).with_char_width(0.5);
        let size = ItemTemplate::<&str>::measure(&template, &"Home", unbounded_constraints());
        assert_eq!(size.x, 28.0);
    }

    #[test]
    fn test_template_ids_are_unique() {
        let a = LabelTemplate::new();
        let b = LabelTemplate::new();
        assert_ne!(
            ItemTemplate::<String>::template_id(&a),
            ItemTemplate::<String>::template_id(&b)
        );
    }

    #[test]
    fn test_fn_template() {
        let template = FnTemplate::new(|width: &f32, _| Vector2::new(*width, 10.0));
        assert_eq!(template.measure(&42.0, unbounded_constraints()).x, 42.0);
    }
}
