// SPDX-License-Identifier: LGPL-3.0-only
//! The overflow decision engine.
//!
//! Invoked once per measure pass with the available width, the engine decides
//! which items move between the primary and overflow lists of an
//! [ItemDataProvider]. Items leave the primary list from the front (oldest
//! first) when shrinking and come back from the most recent overflowed item
//! when growing. A grace margin keeps the bar from flapping between the
//! collapsed and expanded states at the threshold width.

use crate::config::{BreadcrumbConfig, RetentionPolicy};
use crate::layout::finite_width;
use crate::provider::ItemDataProvider;
use taffy::AvailableSpace;

/// Measure passes per layout cycle: the regular pass plus one re-arrange.
pub const MAX_LAYOUT_PASSES: usize = 2;

/// The engine's view of the realized visuals.
///
/// Realized visuals belong to the rendering surface; the engine only asks for
/// their widths during a pass and never keeps them.
pub trait ElementHost<T: Clone + 'static> {
    /// Desired width of the realized element at `primary_position`, or `None`
    /// if the surface has not realized it.
    fn primary_element_width(
        &mut self,
        provider: &ItemDataProvider<T>,
        primary_position: usize,
    ) -> Option<f32>;

    /// Desired width of the ellipsis indicator.
    fn ellipsis_width(&mut self) -> f32;
}

/// Layout regime at the start of a measure pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowRegime {
    /// Available width is infinite.
    Unbounded,
    /// Every item is in the primary list.
    NoOverflow,
    /// At least one item is collapsed.
    HasOverflow,
}

/// Membership change performed by a measure pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverflowAction {
    /// Nothing moved.
    Unchanged,
    /// Items were moved out of the primary list.
    Shrunk {
        /// Logical indices that were collapsed.
        removed: Vec<usize>,
    },
    /// Some overflowed items were moved back without a full recovery.
    Recovered {
        /// Logical indices that were restored.
        restored: Vec<usize>,
    },
    /// The primary list was reset to every item and then collapsed again as needed.
    Rearranged {
        /// Logical indices collapsed after the reset.
        removed: Vec<usize>,
    },
}

/// Result of [OverflowEngine::measure].
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureOutcome {
    /// Regime the pass started in.
    pub regime: OverflowRegime,
    /// What changed.
    pub action: OverflowAction,
    /// Passes used, never more than the configured cap.
    pub passes: usize,
}

/// Measure-time overflow algorithm.
#[derive(Debug, Clone, Default)]
pub struct OverflowEngine {
    config: BreadcrumbConfig,
    ellipsis_visible: bool,
    layout_initialized: bool,
}

impl OverflowEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: BreadcrumbConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &BreadcrumbConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next pass.
    pub fn set_config(&mut self, config: BreadcrumbConfig) {
        self.config = config;
    }

    /// Whether the ellipsis indicator takes part in the row.
    ///
    /// After every pass this equals `provider.has_overflow()`.
    pub fn is_ellipsis_visible(&self) -> bool {
        self.ellipsis_visible
    }

    /// Whether at least one bounded measure pass has run.
    pub fn is_layout_initialized(&self) -> bool {
        self.layout_initialized
    }

    /// Run one measure pass for `available` width.
    pub fn measure<T, H>(
        &mut self,
        provider: &mut ItemDataProvider<T>,
        host: &mut H,
        available: AvailableSpace,
    ) -> MeasureOutcome
    where
        T: Clone + 'static,
        H: ElementHost<T> + ?Sized,
    {
        let Some(available) = finite_width(available) else {
            provider.move_all_items_to_primary_list();
            self.sync_ellipsis(provider);
            return MeasureOutcome {
                regime: OverflowRegime::Unbounded,
                action: OverflowAction::Unchanged,
                passes: 1,
            };
        };

        let regime = if provider.has_overflow() {
            OverflowRegime::HasOverflow
        } else {
            OverflowRegime::NoOverflow
        };

        let mut action = OverflowAction::Unchanged;
        let mut rearrange = false;
        let mut passes = 0;

        while passes < MAX_LAYOUT_PASSES {
            passes += 1;

            if rearrange {
                let removed = self.arrange_items(provider, host, available);
                action = OverflowAction::Rearranged { removed };
                break;
            }

            let desired = self.row_width(provider, host);
            match regime {
                OverflowRegime::HasOverflow if desired > available => {
                    log::debug!(
                        "Breadcrumb row {} wider than {}, shrinking",
                        desired,
                        available
                    );
                    let removed = self.shrink(provider, host, desired, available);
                    action = OverflowAction::Shrunk { removed };
                }
                OverflowRegime::HasOverflow if desired < available => {
                    let recovery = provider.width_required_to_recovery_all_items_to_primary();
                    if available >= desired + recovery + self.config.recovery_grace_width {
                        log::debug!(
                            "Full recovery possible ({} >= {} + {} + {})",
                            available,
                            desired,
                            recovery,
                            self.config.recovery_grace_width
                        );
                        provider.move_all_items_to_primary_list();
                        rearrange = true;
                        continue;
                    }
                    let restored = self.find_movable_items_recover_to_primary_list(
                        provider,
                        available - desired,
                    );
                    provider.move_items_to_primary_list(&restored);
                    if !restored.is_empty() {
                        action = OverflowAction::Recovered { restored };
                    }
                }
                OverflowRegime::NoOverflow if desired > available => {
                    rearrange = true;
                    continue;
                }
                _ => {}
            }
            break;
        }

        self.layout_initialized = true;
        self.sync_ellipsis(provider);

        MeasureOutcome {
            regime,
            action,
            passes,
        }
    }

    /// Desired width of the whole row: the ellipsis (when visible) plus every
    /// realized primary item.
    pub fn row_width<T, H>(&self, provider: &ItemDataProvider<T>, host: &mut H) -> f32
    where
        T: Clone + 'static,
        H: ElementHost<T> + ?Sized,
    {
        let ellipsis = if self.ellipsis_visible {
            host.ellipsis_width()
        } else {
            0.0
        };
        ellipsis + Self::items_width(provider, host)
    }

    fn items_width<T, H>(provider: &ItemDataProvider<T>, host: &mut H) -> f32
    where
        T: Clone + 'static,
        H: ElementHost<T> + ?Sized,
    {
        (0..provider.primary_list_size())
            .filter_map(|position| host.primary_element_width(provider, position))
            .sum()
    }

    /// Measure once without and once with the ellipsis, and shrink if the
    /// items do not fit next to it.
    fn arrange_items<T, H>(
        &mut self,
        provider: &mut ItemDataProvider<T>,
        host: &mut H,
        available: f32,
    ) -> Vec<usize>
    where
        T: Clone + 'static,
        H: ElementHost<T> + ?Sized,
    {
        self.ellipsis_visible = false;
        let desired = self.row_width(provider, host);
        if desired < available {
            return Vec::new();
        }

        self.ellipsis_visible = true;
        let desired_with_ellipsis = self.row_width(provider, host);
        provider.set_overflow_button_width(desired_with_ellipsis - desired);

        self.shrink(provider, host, desired_with_ellipsis, available)
    }

    fn shrink<T, H>(
        &mut self,
        provider: &mut ItemDataProvider<T>,
        host: &mut H,
        desired_including_ellipsis: f32,
        available: f32,
    ) -> Vec<usize>
    where
        T: Clone + 'static,
        H: ElementHost<T> + ?Sized,
    {
        self.update_width_cache(provider, host);

        let budget =
            Self::items_width(provider, host) - (desired_including_ellipsis - available);
        if budget < 0.0 {
            log::debug!(
                "Ellipsis alone exceeds {} (budget {}), nothing collapsed",
                available,
                budget
            );
            return Vec::new();
        }

        let mut removed = self.find_movable_items_beyond_available_width(provider, host, budget);
        self.keep_at_least_one_item_in_primary_list(provider, &mut removed);
        provider.move_items_out_of_primary_list(&removed);
        removed
    }

    /// Snapshot the widths of the realized primary items, stopping at the
    /// first unrealized one.
    fn update_width_cache<T, H>(&self, provider: &mut ItemDataProvider<T>, host: &mut H)
    where
        T: Clone + 'static,
        H: ElementHost<T> + ?Sized,
    {
        for position in 0..provider.primary_list_size() {
            match host.primary_element_width(provider, position) {
                Some(width) => provider.update_width_for_primary_item(position, width),
                None => break,
            }
        }
    }

    /// Scan the primary list from its end and collect every item that no
    /// longer fits into `budget`. The result is ordered by descending position
    /// and maps to a prefix of the primary list.
    fn find_movable_items_beyond_available_width<T, H>(
        &self,
        provider: &ItemDataProvider<T>,
        host: &mut H,
        budget: f32,
    ) -> Vec<usize>
    where
        T: Clone + 'static,
        H: ElementHost<T> + ?Sized,
    {
        let primary = provider.primary_indices();
        let mut required = 0.0;
        let mut removed = Vec::new();

        for position in (0..primary.len()).rev() {
            let mut should_move = true;
            if required <= budget {
                // Unrealized items fall back to their cached width.
                let width = host
                    .primary_element_width(provider, position)
                    .or_else(|| provider.width_for_item(primary[position]))
                    .unwrap_or(0.0);
                required += width;
                should_move = required > budget;
            }
            log::trace!(
                "Shrink scan: position {} required {} budget {} move {}",
                position,
                required,
                budget,
                should_move
            );
            if should_move {
                removed.push(primary[position]);
            }
        }

        removed
    }

    fn keep_at_least_one_item_in_primary_list<T: Clone + 'static>(
        &self,
        provider: &ItemDataProvider<T>,
        removed: &mut Vec<usize>,
    ) {
        if removed.is_empty() || removed.len() != provider.primary_list_size() {
            return;
        }
        // `removed` runs from the most recent item down to the oldest.
        let kept = match self.config.retention {
            RetentionPolicy::KeepFirst => removed.pop(),
            RetentionPolicy::KeepLast => Some(removed.remove(0)),
        };
        log::debug!("Keeping item {:?} in the primary list", kept);
    }

    /// Greedily restore overflowed items from the most recent one down while
    /// their cached widths fit into `available`. Stops at the first item that
    /// does not fit.
    ///
    /// A scan that would restore every overflowed item gives back its last
    /// pick: a full recovery only happens through the grace-checked reset.
    pub fn find_movable_items_recover_to_primary_list<T: Clone + 'static>(
        &self,
        provider: &ItemDataProvider<T>,
        available: f32,
    ) -> Vec<usize> {
        let mut remaining = available;
        let mut restored = Vec::new();

        for &index in provider.overflow_indices().iter().rev() {
            if remaining <= 0.0 {
                break;
            }
            let width = provider.width_for_item(index).unwrap_or_else(|| {
                log::warn!("Overflowed item {} was never measured, assuming 0", index);
                0.0
            });
            if remaining >= width {
                restored.push(index);
                remaining -= width;
            } else {
                break;
            }
        }

        if !restored.is_empty() && restored.len() == provider.overflow_list_size() {
            restored.pop();
        }

        restored
    }

    /// Collect primary items from the front until at least `width` would be
    /// freed by removing them.
    pub fn items_to_remove_for_width<T: Clone + 'static>(
        &self,
        provider: &ItemDataProvider<T>,
        width: f32,
    ) -> Vec<usize> {
        let mut remaining = width;
        let mut removed = Vec::new();
        for &index in provider.primary_indices() {
            if remaining <= 0.0 {
                break;
            }
            removed.push(index);
            remaining -= provider.width_for_item(index).unwrap_or(0.0);
        }
        removed
    }

    fn sync_ellipsis<T: Clone + 'static>(&mut self, provider: &ItemDataProvider<T>) {
        self.ellipsis_visible = provider.has_overflow();
    }

    /// Forget the ellipsis state, e.g. after the items were re-derived.
    pub fn reset<T: Clone + 'static>(&mut self, provider: &ItemDataProvider<T>) {
        self.sync_ellipsis(provider);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemsSource;

    /// Every item realized with a fixed width per logical index.
    struct Widths {
        widths: Vec<f32>,
        ellipsis: f32,
    }

    impl ElementHost<usize> for Widths {
        fn primary_element_width(
            &mut self,
            provider: &ItemDataProvider<usize>,
            primary_position: usize,
        ) -> Option<f32> {
            let index = provider.convert_primary_index_to_index(primary_position).ok()?;
            self.widths.get(index).copied()
        }

        fn ellipsis_width(&mut self) -> f32 {
            self.ellipsis
        }
    }

    fn setup(widths: &[f32]) -> (ItemDataProvider<usize>, Widths) {
        let mut provider = ItemDataProvider::new();
        provider.set_source(Some(ItemsSource::new((0..widths.len()).collect())));
        (
            provider,
            Widths {
                widths: widths.to_vec(),
                ellipsis: 20.0,
            },
        )
    }

    #[test]
    fn test_unbounded_restores_everything() {
        let (mut provider, mut host) = setup(&[50.0; 4]);
        let mut engine = OverflowEngine::new();
        engine.measure(&mut provider, &mut host, AvailableSpace::Definite(120.0));
        assert!(provider.has_overflow());

        let outcome = engine.measure(&mut provider, &mut host, AvailableSpace::MaxContent);
        assert_eq!(outcome.regime, OverflowRegime::Unbounded);
        assert_eq!(provider.primary_list_size(), 4);
        assert!(!engine.is_ellipsis_visible());
    }

    #[test]
    fn test_shrink_collapses_prefix() {
        let (mut provider, mut host) = setup(&[50.0; 4]);
        let mut engine = OverflowEngine::new();

        let outcome = engine.measure(&mut provider, &mut host, AvailableSpace::Definite(120.0));
        assert_eq!(outcome.regime, OverflowRegime::NoOverflow);
        assert_eq!(outcome.action, OverflowAction::Rearranged { removed: vec![1, 0] });
        assert_eq!(outcome.passes, MAX_LAYOUT_PASSES);
        assert_eq!(provider.primary_indices(), &[2, 3]);
        assert_eq!(provider.overflow_button_width(), 20.0);
        assert!(engine.is_ellipsis_visible());
    }

    #[test]
    fn test_exact_fit_is_stable() {
        let (mut provider, mut host) = setup(&[50.0; 4]);
        let mut engine = OverflowEngine::new();
        engine.measure(&mut provider, &mut host, AvailableSpace::Definite(120.0));

        let outcome = engine.measure(&mut provider, &mut host, AvailableSpace::Definite(120.0));
        assert_eq!(outcome.regime, OverflowRegime::HasOverflow);
        assert_eq!(outcome.action, OverflowAction::Unchanged);
        assert_eq!(outcome.passes, 1);
    }

    #[test]
    fn test_shrink_while_overflowed() {
        let (mut provider, mut host) = setup(&[50.0; 4]);
        let mut engine = OverflowEngine::new();
        engine.measure(&mut provider, &mut host, AvailableSpace::Definite(120.0));

        let outcome = engine.measure(&mut provider, &mut host, AvailableSpace::Definite(80.0));
        assert_eq!(outcome.action, OverflowAction::Shrunk { removed: vec![2] });
        assert_eq!(provider.primary_indices(), &[3]);
    }

    #[test]
    fn test_partial_recovery_keeps_one_collapsed() {
        let (mut provider, mut host) = setup(&[50.0; 4]);
        let mut engine = OverflowEngine::new();
        engine.measure(&mut provider, &mut host, AvailableSpace::Definite(120.0));

        // Row is 120 wide; 100 of slack would restore both, which the guard prevents.
        let outcome = engine.measure(&mut provider, &mut host, AvailableSpace::Definite(220.0));
        assert_eq!(outcome.action, OverflowAction::Recovered { restored: vec![1] });
        assert_eq!(provider.overflow_indices(), &[0]);
        assert!(engine.is_ellipsis_visible());
    }

    #[test]
    fn test_keep_first_retains_oldest() {
        let (mut provider, mut host) = setup(&[100.0, 100.0]);
        let mut engine = OverflowEngine::new();
        engine.measure(&mut provider, &mut host, AvailableSpace::Definite(50.0));
        assert_eq!(provider.primary_indices(), &[0]);
    }

    #[test]
    fn test_keep_last_retains_most_recent() {
        let (mut provider, mut host) = setup(&[100.0, 100.0]);
        let mut engine = OverflowEngine::with_config(BreadcrumbConfig {
            retention: RetentionPolicy::KeepLast,
            ..BreadcrumbConfig::default()
        });
        engine.measure(&mut provider, &mut host, AvailableSpace::Definite(50.0));
        assert_eq!(provider.primary_indices(), &[1]);
    }

    #[test]
    fn test_ellipsis_wider_than_available() {
        let (mut provider, mut host) = setup(&[50.0, 50.0]);
        let mut engine = OverflowEngine::new();
        let outcome = engine.measure(&mut provider, &mut host, AvailableSpace::Definite(10.0));
        assert_eq!(outcome.action, OverflowAction::Rearranged { removed: vec![] });
        assert!(!provider.has_overflow());
        assert!(!engine.is_ellipsis_visible());
    }

    #[test]
    fn test_items_to_remove_for_width() {
        let (mut provider, mut host) = setup(&[30.0, 40.0, 50.0]);
        let engine = OverflowEngine::new();
        engine.update_width_cache(&mut provider, &mut host);
        assert_eq!(engine.items_to_remove_for_width(&provider, 60.0), vec![0, 1]);
        assert_eq!(engine.items_to_remove_for_width(&provider, 0.0), Vec::<usize>::new());
    }

    #[test]
    fn test_recovery_with_unknown_widths_keeps_one() {
        let (mut provider, _) = setup(&[50.0; 3]);
        provider.move_items_out_of_primary_list(&[0, 1]);
        let engine = OverflowEngine::new();
        assert_eq!(
            engine.find_movable_items_recover_to_primary_list(&provider, 10.0),
            vec![1]
        );
    }
}
