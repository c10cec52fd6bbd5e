// SPDX-License-Identifier: LGPL-3.0-only
//! Breadcrumb bar that collapses its oldest items behind an ellipsis.
//!
//! The bar owns an [ItemDataProvider] partitioning the items into the inline
//! primary list and the overflow list, and runs the [OverflowEngine] on every
//! measure. Primary items are realized on demand through a
//! [BreadcrumbElementFactory]; items leaving the primary list are recycled.
//! Clicking the ellipsis opens an [OverflowFlyout] with the collapsed items.
//!
//! ### Usage Examples
//!
//! ```rust
//! use crumbbar_core::items::ItemsSource;
//! use crumbbar_core::layout::width_constraints;
//! use crumbbar_widgets::breadcrumb_bar::BreadcrumbBar;
//!
//! let path = ItemsSource::new(vec!["Home", "Documents", "Projects", "MyApp"]);
//! let mut bar = BreadcrumbBar::new()
//!     .with_items_source(path.clone())
//!     .with_on_item_clicked(|clicked| {
//!         println!("Navigate to {} ({})", clicked.item, clicked.index);
//!     });
//!
//! bar.measure(width_constraints(160.0));
//! path.push("src");
//! bar.measure(width_constraints(160.0));
//! ```

use crate::breadcrumb_item::{BreadcrumbBarItem, ItemFlags};
use crate::element_factory::BreadcrumbElementFactory;
use crate::flyout::{ItemClicked, OverflowFlyout};
use crate::template::{ItemTemplate, LabelTemplate};
use crumbbar_core::config::BreadcrumbConfig;
use crumbbar_core::engine::{ElementHost, OverflowEngine};
use crumbbar_core::items::ItemsSource;
use crumbbar_core::layout::LayoutElement;
use crumbbar_core::provider::ItemDataProvider;
use nalgebra::Vector2;
use std::fmt::Display;
use std::sync::Arc;
use taffy::{AvailableSpace, Size};
use vello::kurbo::{Point, Rect};

/// Callback invoked with every [ItemClicked] event.
pub type ItemClickedHandler<T> = Arc<dyn Fn(&ItemClicked<T>) + Send + Sync>;

/// A horizontal breadcrumb bar with overflow handling.
///
/// Items are laid out left to right: the ellipsis first (while any item is
/// collapsed), followed by the primary items in logical order.
pub struct BreadcrumbBar<T: Clone + 'static> {
    provider: ItemDataProvider<T>,
    engine: OverflowEngine,
    factory: BreadcrumbElementFactory<T>,
    ellipsis: BreadcrumbBarItem<T>,
    elements: Vec<BreadcrumbBarItem<T>>,
    flyout: OverflowFlyout<T>,
    on_item_clicked: Option<ItemClickedHandler<T>>,
    desired_size: Vector2<f32>,
}

impl<T: Clone + Display + 'static> BreadcrumbBar<T> {
    /// Create a bar rendering items as text labels.
    pub fn new() -> Self {
        Self::with_template(LabelTemplate::new())
    }
}

impl<T: Clone + Display + 'static> Default for BreadcrumbBar<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> BreadcrumbBar<T> {
    /// Create a bar rendering items with `template`.
    pub fn with_template(template: impl ItemTemplate<T> + 'static) -> Self {
        let ellipsis_size = LabelTemplate::new().measure_text("\u{2026}");
        Self {
            provider: ItemDataProvider::new(),
            engine: OverflowEngine::new(),
            factory: BreadcrumbElementFactory::new(Arc::new(template)),
            ellipsis: BreadcrumbBarItem::ellipsis(ellipsis_size),
            elements: Vec::new(),
            flyout: OverflowFlyout::new(),
            on_item_clicked: None,
            desired_size: Vector2::zeros(),
        }
    }

    /// Set the items source.
    pub fn with_items_source(mut self, source: ItemsSource<T>) -> Self {
        self.set_items_source(Some(source));
        self
    }

    /// Set the configuration of the overflow engine.
    pub fn with_config(mut self, config: BreadcrumbConfig) -> Self {
        self.engine.set_config(config);
        self
    }

    /// Set the size of the ellipsis indicator.
    pub fn with_ellipsis_size(mut self, size: Vector2<f32>) -> Self {
        self.ellipsis = BreadcrumbBarItem::ellipsis(size);
        self
    }

    /// Set the callback for when a breadcrumb item is clicked.
    pub fn with_on_item_clicked<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ItemClicked<T>) + Send + Sync + 'static,
    {
        self.on_item_clicked = Some(Arc::new(callback));
        self
    }

    /// Replace the items source. `None` shows an empty bar.
    pub fn set_items_source(&mut self, source: Option<ItemsSource<T>>) {
        self.provider.set_source(source);
        self.items_changed();
    }

    /// Replace the item template. Realized elements are recycled and every
    /// item is measured again with the new template.
    pub fn set_item_template(&mut self, template: impl ItemTemplate<T> + 'static) {
        self.clear_elements();
        self.factory.set_template(Arc::new(template));
        self.provider.refresh();
        self.items_changed();
    }

    fn items_changed(&mut self) {
        self.clear_elements();
        self.flyout.close();
        self.engine.reset(&self.provider);
    }

    fn clear_elements(&mut self) {
        for mut element in std::mem::take(&mut self.elements) {
            clear_element(&mut element);
            self.factory.recycle_element(element);
        }
    }

    /// Measure the bar and update which items are collapsed.
    ///
    /// Returns the desired size of the row.
    pub fn measure(&mut self, constraints: Size<AvailableSpace>) -> Vector2<f32> {
        if let Some(change) = self.provider.take_pending_change() {
            log::debug!("Breadcrumb items changed ({:?}), re-deriving", change);
            self.provider.refresh();
            self.items_changed();
        }

        // Items report their natural width; only the engine sees the limit.
        let item_constraints = Size {
            width: AvailableSpace::MaxContent,
            height: constraints.height,
        };
        let ellipsis_width = self.ellipsis.measure(item_constraints).x;
        for element in &mut self.elements {
            element.measure(item_constraints);
        }

        let mut host = RealizedElements {
            factory: &mut self.factory,
            elements: &mut self.elements,
            ellipsis_width,
            constraints: item_constraints,
        };
        let outcome = self
            .engine
            .measure(&mut self.provider, &mut host, constraints.width);
        log::trace!("Breadcrumb bar measure: {:?}", outcome);

        self.sync_elements(item_constraints);
        self.desired_size = self.row_size();
        self.desired_size
    }

    /// Bring the realized elements in line with the primary list.
    fn sync_elements(&mut self, constraints: Size<AvailableSpace>) {
        let size = self.provider.size();
        let mut realized = std::mem::take(&mut self.elements);
        let mut ordered = Vec::with_capacity(self.provider.primary_list_size());

        for &index in self.provider.primary_indices() {
            let element = match realized
                .iter()
                .position(|element| element.index() == Some(index))
            {
                Some(position) => Some(realized.swap_remove(position)),
                None => realize(&mut self.factory, &self.provider, index, constraints),
            };
            if let Some(mut element) = element {
                prepare_element(&mut element, index, size);
                ordered.push(element);
            }
        }

        for mut stale in realized {
            clear_element(&mut stale);
            self.factory.recycle_element(stale);
        }

        self.elements = ordered;
        self.ellipsis.set_flags(ItemFlags::ELLIPSIS, true);
    }

    fn row_size(&self) -> Vector2<f32> {
        let mut size = Vector2::zeros();
        if self.engine.is_ellipsis_visible() {
            size = self.ellipsis.desired_size();
        }
        for element in &self.elements {
            let desired = element.desired_size();
            size.x += desired.x;
            size.y = size.y.max(desired.y);
        }
        size
    }

    /// Place the ellipsis and the primary items inside `bounds`.
    pub fn arrange(&mut self, bounds: Rect) -> Vector2<f32> {
        let mut x = bounds.x0;

        if self.engine.is_ellipsis_visible() {
            x = place(&mut self.ellipsis, x, bounds);
        } else {
            self.ellipsis.arrange(Rect::ZERO);
        }

        for element in &mut self.elements {
            x = place(element, x, bounds);
        }

        Vector2::new(bounds.width() as f32, bounds.height() as f32)
    }

    /// Dispatch a click at `point`. Clicking the ellipsis opens the flyout.
    pub fn click_at(&mut self, point: Point) -> Option<ItemClicked<T>> {
        if self.engine.is_ellipsis_visible() && self.ellipsis.arranged_rect().contains(point) {
            self.click_ellipsis();
            return None;
        }
        let position = self.elements.iter().position(|element| {
            element.is_arranged_visible() && element.arranged_rect().contains(point)
        })?;
        self.click_primary(position)
    }

    /// Click the primary item at `position`.
    pub fn click_primary(&mut self, position: usize) -> Option<ItemClicked<T>> {
        let index = match self.provider.convert_primary_index_to_index(position) {
            Ok(index) => index,
            Err(err) => {
                log::warn!("Ignoring breadcrumb click: {}", err);
                return None;
            },
        };
        let clicked = ItemClicked {
            index,
            item: self.provider.item(index)?.clone(),
        };
        self.raise_item_clicked(&clicked);
        Some(clicked)
    }

    /// Click the ellipsis. Opens the flyout if any item is collapsed.
    pub fn click_ellipsis(&mut self) -> bool {
        if !self.engine.is_ellipsis_visible() {
            return false;
        }
        match self.flyout.open(&self.provider, self.ellipsis.arranged_rect()) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Cannot open overflow flyout: {}", err);
                false
            },
        }
    }

    /// Click the flyout entry at display `position`.
    pub fn click_overflow(&mut self, position: usize) -> Option<ItemClicked<T>> {
        let clicked = self.flyout.click(position)?;
        self.raise_item_clicked(&clicked);
        Some(clicked)
    }

    fn raise_item_clicked(&self, clicked: &ItemClicked<T>) {
        log::debug!("Breadcrumb item {} clicked", clicked.index);
        if let Some(callback) = &self.on_item_clicked {
            callback(clicked);
        }
    }

    /// Realization hook: `element` is about to show logical `index`.
    pub fn element_prepared(&self, element: &mut BreadcrumbBarItem<T>, index: usize) {
        prepare_element(element, index, self.provider.size());
    }

    /// Realization hook: `element` now shows logical `new_index`.
    pub fn element_index_changed(&self, element: &mut BreadcrumbBarItem<T>, new_index: usize) {
        prepare_element(element, new_index, self.provider.size());
    }

    /// Realization hook: `element` is being cleared for reuse.
    pub fn element_clearing(&self, element: &mut BreadcrumbBarItem<T>) {
        clear_element(element);
    }

    /// Items rendered inline, in logical order.
    pub fn primary_items(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.provider.primary_items()
    }

    /// Items collapsed behind the ellipsis, in logical order.
    pub fn overflow_items(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.provider.overflow_items()
    }

    /// Whether the ellipsis is part of the row.
    pub fn is_ellipsis_visible(&self) -> bool {
        self.engine.is_ellipsis_visible()
    }

    /// Logical index of the last item, `None` for an empty bar.
    pub fn last_item_index(&self) -> Option<usize> {
        self.provider.size().checked_sub(1)
    }

    /// The overflow flyout.
    pub fn flyout(&self) -> &OverflowFlyout<T> {
        &self.flyout
    }

    /// Close the overflow flyout.
    pub fn close_flyout(&mut self) {
        self.flyout.close();
    }

    /// The item data provider.
    pub fn provider(&self) -> &ItemDataProvider<T> {
        &self.provider
    }

    /// Realized primary elements in primary order.
    pub fn elements(&self) -> &[BreadcrumbBarItem<T>] {
        &self.elements
    }

    /// The ellipsis element.
    pub fn ellipsis_element(&self) -> &BreadcrumbBarItem<T> {
        &self.ellipsis
    }

    /// Desired size of the last measure.
    pub fn desired_size(&self) -> Vector2<f32> {
        self.desired_size
    }

    /// Configuration of the overflow engine.
    pub fn config(&self) -> &BreadcrumbConfig {
        self.engine.config()
    }
}

impl<T: Clone + std::fmt::Debug + 'static> std::fmt::Debug for BreadcrumbBar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadcrumbBar")
            .field("provider", &self.provider)
            .field("ellipsis_visible", &self.engine.is_ellipsis_visible())
            .field("elements", &self.elements.len())
            .field("flyout_open", &self.flyout.is_open())
            .finish()
    }
}

/// Realizes primary elements while the engine asks for their widths.
struct RealizedElements<'a, T> {
    factory: &'a mut BreadcrumbElementFactory<T>,
    elements: &'a mut Vec<BreadcrumbBarItem<T>>,
    ellipsis_width: f32,
    constraints: Size<AvailableSpace>,
}

impl<T: Clone + 'static> ElementHost<T> for RealizedElements<'_, T> {
    fn primary_element_width(
        &mut self,
        provider: &ItemDataProvider<T>,
        primary_position: usize,
    ) -> Option<f32> {
        let index = *provider.primary_indices().get(primary_position)?;
        if let Some(element) = self
            .elements
            .iter()
            .find(|element| element.index() == Some(index))
        {
            return Some(element.desired_width());
        }

        let element = realize(self.factory, provider, index, self.constraints)?;
        let width = element.desired_width();
        self.elements.push(element);
        Some(width)
    }

    fn ellipsis_width(&mut self) -> f32 {
        self.ellipsis_width
    }
}

fn realize<T: Clone + 'static>(
    factory: &mut BreadcrumbElementFactory<T>,
    provider: &ItemDataProvider<T>,
    index: usize,
    constraints: Size<AvailableSpace>,
) -> Option<BreadcrumbBarItem<T>> {
    let item = provider.item(index)?.clone();
    let mut element = factory.get_element(item, index);
    prepare_element(&mut element, index, provider.size());
    element.measure(constraints);
    log::trace!(
        "Realized breadcrumb item {} ({} wide)",
        index,
        element.desired_width()
    );
    Some(element)
}

fn prepare_element<T>(element: &mut BreadcrumbBarItem<T>, index: usize, size: usize) {
    element.set_index(Some(index));
    element.set_flags(ItemFlags::LAST, index + 1 == size);
    element.set_flags(ItemFlags::ELLIPSIS_DROPDOWN, false);
}

fn clear_element<T>(element: &mut BreadcrumbBarItem<T>) {
    element.set_flags(ItemFlags::TRANSIENT, false);
}

fn place<T>(element: &mut BreadcrumbBarItem<T>, x: f64, bounds: Rect) -> f64 {
    let width = element.desired_width() as f64;
    element.arrange(Rect::new(x, bounds.y0, x + width, bounds.y1));
    x + width
}
