// SPDX-License-Identifier: LGPL-3.0-only
use crate::template::{ItemTemplate, TemplateId};
use bitflags::bitflags;
use crumbbar_core::layout::LayoutElement;
use nalgebra::Vector2;
use std::sync::Arc;
use taffy::{AvailableSpace, Size};
use vello::kurbo::Rect;

bitflags! {
    /// Per-element flags of a realized breadcrumb visual.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// The element shows the last logical item.
        const LAST = 0b0001;
        /// The element is the ellipsis indicator.
        const ELLIPSIS = 0b0010;
        /// The element is an entry of the overflow flyout.
        const ELLIPSIS_DROPDOWN = 0b0100;
        /// The element was created by the element factory and may be pooled.
        const CREATED_BY_FACTORY = 0b1000;
        /// Flags describing the item currently shown, cleared on recycle.
        const TRANSIENT = Self::LAST.bits() | Self::ELLIPSIS.bits() | Self::ELLIPSIS_DROPDOWN.bits();
    }
}

/// A realized breadcrumb visual.
///
/// Elements are pooled and reused for different logical items, so everything
/// describing the shown item is cleared by [reset](Self::reset).
pub struct BreadcrumbBarItem<T> {
    content: Option<T>,
    index: Option<usize>,
    flags: ItemFlags,
    template: Option<Arc<dyn ItemTemplate<T>>>,
    fixed_size: Vector2<f32>,
    desired_size: Vector2<f32>,
    rect: Rect,
}

impl<T> BreadcrumbBarItem<T> {
    /// Create an element rendering content through `template`.
    pub fn new(template: Arc<dyn ItemTemplate<T>>) -> Self {
        Self {
            content: None,
            index: None,
            flags: ItemFlags::empty(),
            template: Some(template),
            fixed_size: Vector2::zeros(),
            desired_size: Vector2::zeros(),
            rect: Rect::ZERO,
        }
    }

    /// Create the ellipsis indicator with a fixed size.
    pub fn ellipsis(size: Vector2<f32>) -> Self {
        Self {
            content: None,
            index: None,
            flags: ItemFlags::ELLIPSIS,
            template: None,
            fixed_size: size,
            desired_size: Vector2::zeros(),
            rect: Rect::ZERO,
        }
    }

    pub(crate) fn with_factory_flag(mut self) -> Self {
        self.flags.insert(ItemFlags::CREATED_BY_FACTORY);
        self
    }

    /// The shown content.
    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }

    /// Set the shown content.
    pub fn set_content(&mut self, content: Option<T>) {
        self.content = content;
    }

    /// Logical index of the shown item.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Set the logical index of the shown item.
    pub fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    /// Current flags.
    pub fn flags(&self) -> ItemFlags {
        self.flags
    }

    /// Set or clear `flags`.
    pub fn set_flags(&mut self, flags: ItemFlags, value: bool) {
        self.flags.set(flags, value);
    }

    /// Whether the element shows the last logical item.
    pub fn is_last(&self) -> bool {
        self.flags.contains(ItemFlags::LAST)
    }

    /// Whether the element is the ellipsis indicator.
    pub fn is_ellipsis(&self) -> bool {
        self.flags.contains(ItemFlags::ELLIPSIS)
    }

    /// Whether the element is a flyout entry.
    pub fn is_ellipsis_dropdown(&self) -> bool {
        self.flags.contains(ItemFlags::ELLIPSIS_DROPDOWN)
    }

    /// Whether the element came from the element factory.
    pub fn is_created_by_factory(&self) -> bool {
        self.flags.contains(ItemFlags::CREATED_BY_FACTORY)
    }

    /// Template the element renders with, `None` for the ellipsis.
    pub fn template_id(&self) -> Option<TemplateId> {
        self.template.as_ref().map(|template| template.template_id())
    }

    /// Desired width of the last measure.
    pub fn desired_width(&self) -> f32 {
        self.desired_size.x
    }

    /// Clear the shown item and every transient flag, and hide the element.
    pub fn reset(&mut self) {
        self.content = None;
        self.index = None;
        self.flags.remove(ItemFlags::TRANSIENT);
        self.desired_size = Vector2::zeros();
        self.rect = Rect::ZERO;
    }
}

impl<T> LayoutElement for BreadcrumbBarItem<T> {
    fn measure(&mut self, constraints: Size<AvailableSpace>) -> Vector2<f32> {
        self.desired_size = if self.is_ellipsis() {
            self.fixed_size
        } else {
            match (&self.template, &self.content) {
                (Some(template), Some(content)) => template.measure(content, constraints),
                _ => Vector2::zeros(),
            }
        };
        self.desired_size
    }

    fn desired_size(&self) -> Vector2<f32> {
        self.desired_size
    }

    fn arrange(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn arranged_rect(&self) -> Rect {
        self.rect
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for BreadcrumbBarItem<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadcrumbBarItem")
            .field("content", &self.content)
            .field("index", &self.index)
            .field("flags", &self.flags)
            .field("desired_size", &self.desired_size)
            .field("rect", &self.rect)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::LabelTemplate;
    use crumbbar_core::layout::unbounded_constraints;

    #[test]
    fn test_reset_clears_transient_flags() {
        let mut item: BreadcrumbBarItem<String> =
            BreadcrumbBarItem::new(Arc::new(LabelTemplate::new())).with_factory_flag();
        item.set_content(Some("Home".to_string()));
        item.set_index(Some(3));
        item.set_flags(ItemFlags::LAST | ItemFlags::ELLIPSIS_DROPDOWN, true);
        item.measure(unbounded_constraints());
        item.arrange(Rect::new(0.0, 0.0, 40.0, 20.0));

        item.reset();

        assert_eq!(item.flags(), ItemFlags::CREATED_BY_FACTORY);
        assert_eq!(item.content(), None);
        assert_eq!(item.index(), None);
        assert!(!item.is_arranged_visible());
    }

    #[test]
    fn test_ellipsis_has_fixed_size() {
        let mut ellipsis: BreadcrumbBarItem<String> = BreadcrumbBarItem::ellipsis(Vector2::new(20.0, 18.0));
        assert_eq!(ellipsis.measure(unbounded_constraints()), Vector2::new(20.0, 18.0));
        assert!(ellipsis.is_ellipsis());
        assert_eq!(ellipsis.template_id(), None);
    }
}
