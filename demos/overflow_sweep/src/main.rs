use crumbbar::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => BreadcrumbConfig::load(path)?,
        None => BreadcrumbConfig::default(),
    }
    .with_env_overrides()?;

    let path = ItemsSource::new(
        ["Home", "user", "Documents", "Projects", "crumbbar", "src"]
            .into_iter()
            .map(String::from)
            .collect(),
    );

    let mut bar = BreadcrumbBar::new()
        .with_config(config)
        .with_items_source(path.clone())
        .with_on_item_clicked(|clicked| {
            log::info!("Navigate to {} (item {})", clicked.item, clicked.index);
        });

    for width in [480.0, 320.0, 200.0, 120.0, 60.0, 200.0, 330.0, 480.0, f32::INFINITY] {
        let desired = bar.measure(width_constraints(width));
        bar.arrange(Rect::new(0.0, 0.0, width.min(desired.x) as f64, desired.y as f64));

        let shown: Vec<&str> = bar.primary_items().map(String::as_str).collect();
        let hidden: Vec<&str> = bar.overflow_items().map(String::as_str).collect();
        println!(
            "{:>6} | {}{}   (collapsed: {:?})",
            width,
            if bar.is_ellipsis_visible() { "\u{2026} > " } else { "" },
            shown.join(" > "),
            hidden
        );
    }

    bar.measure(width_constraints(160.0));
    bar.arrange(Rect::new(0.0, 0.0, 160.0, 24.0));
    if bar.click_ellipsis() {
        for entry in bar.flyout().entries() {
            println!("  flyout: {} ({})", entry.item, entry.index);
        }
        bar.click_overflow(0);
    }
    bar.click_at(Point::new(150.0, 10.0));

    path.pop();
    bar.measure(width_constraints(160.0));
    println!("after navigating up: {:?}", bar.primary_items().collect::<Vec<_>>());

    Ok(())
}
