#![warn(missing_docs)]

//! Breadcrumb bars that collapse their oldest items behind an ellipsis.

pub use nalgebra as math;
pub use taffy;
pub use vello::kurbo;

pub use crumbbar_core as core;

/// Widgets module re-exporting the breadcrumb widgets.
pub mod widgets {
    pub use crumbbar_widgets::*;
}

/// A "prelude" for users of crumbbar.
///
/// Importing this module brings into scope the most common types
/// needed to host a breadcrumb bar.
///
/// ```rust
/// use crumbbar::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::config::{BreadcrumbConfig, RetentionPolicy};
    pub use crate::core::engine::{MeasureOutcome, OverflowAction, OverflowEngine, OverflowRegime};
    pub use crate::core::error::{BreadcrumbError, BreadcrumbResult};
    pub use crate::core::items::{CollectionChange, ItemsSource};
    pub use crate::core::layout::*;
    pub use crate::core::provider::ItemDataProvider;

    // Math
    pub use nalgebra::Vector2;

    // Geometry
    pub use vello::kurbo::{Point, Rect};

    // Widgets
    pub use crate::widgets::{
        BreadcrumbBar, BreadcrumbBarItem, CollapsedBreadcrumbRow, FnTemplate, ItemClicked,
        ItemTemplate, LabelTemplate, OverflowFlyout,
    };
}
