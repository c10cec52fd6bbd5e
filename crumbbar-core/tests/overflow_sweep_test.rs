//! Width sweeps over the overflow engine.

use crumbbar_core::{
    BreadcrumbConfig, ElementHost, ItemDataProvider, ItemsSource, OverflowAction, OverflowEngine,
    RetentionPolicy,
};
use taffy::AvailableSpace;

struct FixedWidths {
    widths: Vec<f32>,
    ellipsis: f32,
}

impl ElementHost<usize> for FixedWidths {
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

fn setup(widths: &[f32]) -> (ItemDataProvider<usize>, FixedWidths) {
    let mut provider = ItemDataProvider::new();
    provider.set_source(Some(ItemsSource::new((0..widths.len()).collect())));
    let host = FixedWidths {
        widths: widths.to_vec(),
        ellipsis: 20.0,
    };
    (provider, host)
}

fn measure(
    engine: &mut OverflowEngine,
    provider: &mut ItemDataProvider<usize>,
    host: &mut FixedWidths,
    width: f32,
) {
    let outcome = engine.measure(provider, host, AvailableSpace::Definite(width));
    assert!(outcome.passes <= 2, "pass cap exceeded at {width}");
}

fn assert_overflow_is_prefix(provider: &ItemDataProvider<usize>, width: f32) {
    let overflow = provider.overflow_indices();
    let expected: Vec<usize> = (0..overflow.len()).collect();
    assert_eq!(overflow, &expected[..], "overflow not a prefix at width {width}");
}

fn assert_partition(provider: &ItemDataProvider<usize>) {
    assert_eq!(
        provider.primary_list_size() + provider.overflow_list_size(),
        provider.size()
    );
    assert!(provider.primary_list_size() >= 1);
    for index in 0..provider.size() {
        let in_primary = provider.primary_indices().contains(&index);
        let in_overflow = provider.overflow_indices().contains(&index);
        assert!(in_primary ^ in_overflow, "item {index} in both or neither list");
    }
}

#[test]
fn test_growing_to_full_width_recovers_everything() {
    let (mut provider, mut host) = setup(&[50.0; 4]);
    let mut engine = OverflowEngine::new();

    measure(&mut engine, &mut provider, &mut host, 120.0);
    assert_eq!(provider.overflow_indices(), &[0, 1]);

    let outcome = engine.measure(&mut provider, &mut host, AvailableSpace::Definite(300.0));
    assert_eq!(outcome.action, OverflowAction::Rearranged { removed: vec![] });
    assert!(!provider.has_overflow());
    assert!(!engine.is_ellipsis_visible());
}

#[test]
fn test_hysteresis_at_threshold() {
    let (mut provider, mut host) = setup(&[50.0; 4]);
    let mut engine = OverflowEngine::new();
    measure(&mut engine, &mut provider, &mut host, 120.0);

    // Exactly the recovery width is not enough because of the grace margin.
    measure(&mut engine, &mut provider, &mut host, 220.0);
    assert_eq!(provider.overflow_indices(), &[0]);
    measure(&mut engine, &mut provider, &mut host, 220.0);
    assert_eq!(provider.overflow_indices(), &[0]);

    // 170 + 50 + 5 fits.
    measure(&mut engine, &mut provider, &mut host, 225.0);
    assert!(!provider.has_overflow());
}

#[test]
fn test_repeated_measure_is_idempotent() {
    for width in [60.0, 120.0, 130.0, 175.0, 199.0, 200.0, 250.0] {
        let (mut provider, mut host) = setup(&[50.0; 4]);
        let mut engine = OverflowEngine::new();

        measure(&mut engine, &mut provider, &mut host, width);
        let primary = provider.primary_indices().to_vec();
        let ellipsis = engine.is_ellipsis_visible();

        measure(&mut engine, &mut provider, &mut host, width);
        assert_eq!(provider.primary_indices(), &primary[..], "width {width}");
        assert_eq!(engine.is_ellipsis_visible(), ellipsis, "width {width}");
    }
}

#[test]
fn test_shrinking_sweep_keeps_prefix() {
    let widths = [80.0, 35.0, 60.0, 45.0, 70.0, 25.0];
    let (mut provider, mut host) = setup(&widths);
    let mut engine = OverflowEngine::new();

    let mut width = 400.0;
    while width >= 90.0 {
        measure(&mut engine, &mut provider, &mut host, width);
        assert_partition(&provider);
        assert_overflow_is_prefix(&provider, width);
        assert_eq!(engine.is_ellipsis_visible(), provider.has_overflow());
        width -= 7.0;
    }
}

#[test]
fn test_oscillating_sweep_keeps_prefix() {
    let widths = [80.0, 35.0, 60.0, 45.0, 70.0, 25.0];
    let (mut provider, mut host) = setup(&widths);
    let mut engine = OverflowEngine::with_config(BreadcrumbConfig {
        retention: RetentionPolicy::KeepLast,
        ..BreadcrumbConfig::default()
    });

    for step in 0..120 {
        let width = 20.0 + ((step * 37) % 400) as f32;
        measure(&mut engine, &mut provider, &mut host, width);
        assert_partition(&provider);
        assert_overflow_is_prefix(&provider, width);
        assert_eq!(engine.is_ellipsis_visible(), provider.has_overflow());
    }
}

#[test]
fn test_items_change_resets_partition() {
    let source = ItemsSource::new(vec![0usize, 1, 2, 3]);
    let mut provider = ItemDataProvider::new();
    provider.set_source(Some(source.clone()));
    let mut host = FixedWidths {
        widths: vec![50.0; 6],
        ellipsis: 20.0,
    };
    let mut engine = OverflowEngine::new();

    measure(&mut engine, &mut provider, &mut host, 120.0);
    assert!(provider.has_overflow());

    source.push(4);
    assert!(provider.take_pending_change().is_some());
    provider.refresh();
    engine.reset(&provider);
    assert_eq!(provider.size(), 5);
    assert!(!provider.has_overflow());
    assert!(!engine.is_ellipsis_visible());

    measure(&mut engine, &mut provider, &mut host, 120.0);
    assert_eq!(provider.overflow_indices(), &[0, 1, 2]);
}

#[test]
fn test_empty_and_absent_sources() {
    let mut provider: ItemDataProvider<usize> = ItemDataProvider::new();
    let mut host = FixedWidths {
        widths: Vec::new(),
        ellipsis: 20.0,
    };
    let mut engine = OverflowEngine::new();

    let outcome = engine.measure(&mut provider, &mut host, AvailableSpace::Definite(100.0));
    assert_eq!(outcome.action, OverflowAction::Unchanged);
    assert_eq!(provider.size(), 0);

    provider.set_source(Some(ItemsSource::new(Vec::new())));
    engine.measure(&mut provider, &mut host, AvailableSpace::Definite(0.0));
    assert!(!engine.is_ellipsis_visible());
}
