// SPDX-License-Identifier: LGPL-3.0-only
//! Layout primitives shared by the breadcrumb rows.

use nalgebra::Vector2;
use taffy::{AvailableSpace, Size};
use vello::kurbo::Rect;

/// Contains the arrange-time collapse strategy.
pub mod collapse;

pub use collapse::CollapseLayout;

/// An element the host toolkit can measure and arrange.
///
/// Arranging into [Rect::ZERO] hides the element without destroying it.
pub trait LayoutElement {
    /// Measure the element under the given constraints and cache the result as its desired size.
    fn measure(&mut self, constraints: Size<AvailableSpace>) -> Vector2<f32>;

    /// The size computed by the last [`measure`](Self::measure).
    fn desired_size(&self) -> Vector2<f32>;

    /// Place the element in its final rectangle.
    fn arrange(&mut self, rect: Rect);

    /// The rectangle of the last [`arrange`](Self::arrange).
    fn arranged_rect(&self) -> Rect;

    /// Whether the last arrange left the element visible.
    fn is_arranged_visible(&self) -> bool {
        let rect = self.arranged_rect();
        rect.width() > 0.0 && rect.height() > 0.0
    }
}

/// Constraints with an unbounded width and height. Breadcrumb rows never collapse under these.
pub fn unbounded_constraints() -> Size<AvailableSpace> {
    Size {
        width: AvailableSpace::MaxContent,
        height: AvailableSpace::MaxContent,
    }
}

/// Constraints with a definite width and an unbounded height.
pub fn width_constraints(width: f32) -> Size<AvailableSpace> {
    Size {
        width: AvailableSpace::Definite(width),
        height: AvailableSpace::MaxContent,
    }
}

/// The finite available width, or `None` when the width is unbounded.
///
/// `MinContent` is treated as zero width.
pub fn finite_width(space: AvailableSpace) -> Option<f32> {
    match space {
        AvailableSpace::Definite(width) if width.is_finite() => Some(width.max(0.0)),
        AvailableSpace::Definite(_) | AvailableSpace::MaxContent => None,
        AvailableSpace::MinContent => Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_width() {
        assert_eq!(finite_width(AvailableSpace::Definite(120.0)), Some(120.0));
        assert_eq!(finite_width(AvailableSpace::Definite(f32::INFINITY)), None);
        assert_eq!(finite_width(AvailableSpace::MaxContent), None);
        assert_eq!(finite_width(AvailableSpace::MinContent), Some(0.0));
        assert_eq!(finite_width(AvailableSpace::Definite(-3.0)), Some(0.0));
    }
}
