// SPDX-License-Identifier: LGPL-3.0-only
#![warn(missing_docs)]

//! Breadcrumb widgets for crumbbar.
//!
//! Contains the realized breadcrumb visuals, the element factory and the
//! widgets hosting the overflow engine.

/// Contains the [breadcrumb_bar::BreadcrumbBar] widget.
pub mod breadcrumb_bar;

/// Contains the [breadcrumb_item::BreadcrumbBarItem] visual.
pub mod breadcrumb_item;

/// Contains the [collapsed_row::CollapsedBreadcrumbRow] widget.
pub mod collapsed_row;

/// Contains the [element_factory::BreadcrumbElementFactory] recycle pool.
pub mod element_factory;

/// Contains the [flyout::OverflowFlyout] presentation controller.
pub mod flyout;

/// Contains the item templates.
pub mod template;

pub use breadcrumb_bar::BreadcrumbBar;
pub use breadcrumb_item::{BreadcrumbBarItem, ItemFlags};
pub use collapsed_row::CollapsedBreadcrumbRow;
pub use flyout::{ItemClicked, OverflowFlyout};
pub use template::{FnTemplate, ItemTemplate, LabelTemplate, TemplateId};
