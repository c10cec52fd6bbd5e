// SPDX-License-Identifier: LGPL-3.0-only
use crate::breadcrumb_item::BreadcrumbBarItem;
use crate::template::{ItemTemplate, TemplateId};
use indexmap::IndexMap;
use std::sync::Arc;

/// Creates breadcrumb elements from the current item template and keeps a
/// recycle pool per template.
pub struct BreadcrumbElementFactory<T> {
    template: Arc<dyn ItemTemplate<T>>,
    pool: IndexMap<TemplateId, Vec<BreadcrumbBarItem<T>>>,
}

impl<T: Clone> BreadcrumbElementFactory<T> {
    /// Create a factory for the given template.
    pub fn new(template: Arc<dyn ItemTemplate<T>>) -> Self {
        Self {
            template,
            pool: IndexMap::new(),
        }
    }

    /// The current template.
    pub fn template(&self) -> &Arc<dyn ItemTemplate<T>> {
        &self.template
    }

    /// Replace the template. Pooled elements of other templates are dropped.
    pub fn set_template(&mut self, template: Arc<dyn ItemTemplate<T>>) {
        let id = template.template_id();
        self.pool.retain(|pooled, _| *pooled == id);
        self.template = template;
    }

    /// Get an element showing `content` at logical `index`, reusing a pooled
    /// element when one is available.
    pub fn get_element(&mut self, content: T, index: usize) -> BreadcrumbBarItem<T> {
        let id = self.template.template_id();
        let mut element = match self.pool.get_mut(&id).and_then(Vec::pop) {
            Some(element) => {
                log::trace!("Reusing pooled breadcrumb element for item {}", index);
                element
            },
            None => BreadcrumbBarItem::new(self.template.clone()).with_factory_flag(),
        };
        element.set_content(Some(content));
        element.set_index(Some(index));
        element
    }

    /// Return an element to the pool. The element is always reset first;
    /// elements not created by the factory are dropped afterwards.
    pub fn recycle_element(&mut self, mut element: BreadcrumbBarItem<T>) {
        element.reset();
        if !element.is_created_by_factory() {
            return;
        }
        if let Some(id) = element.template_id() {
            self.pool.entry(id).or_default().push(element);
        }
    }

    /// Number of pooled elements for `id`.
    pub fn pooled_count(&self, id: TemplateId) -> usize {
        self.pool.get(&id).map_or(0, Vec::len)
    }
}
