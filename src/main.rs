use anyhow::Result;
use chrono::Utc;

use weartrack::cache::CollectionCache;
use weartrack::config::Config;
use weartrack::logging::{json_log, json_warn, obj, v_bool, v_num, v_str};
use weartrack::prefs::load_preferences;
use weartrack::render::{render, DisplayModel, SortKey, ViewMode, ViewState};
use weartrack::session::{days_since, load_last_session, save_session};
use weartrack::source::DataSource;
use weartrack::stats::aggregate;
use weartrack::store::KvStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    json_log(
        "startup",
        obj(&[
            ("data_path", v_str(&cfg.data_path)),
            ("sqlite_path", v_str(&cfg.sqlite_path)),
            ("category", v_str(&cfg.category)),
            ("sort", v_str(&cfg.sort)),
        ]),
    );

    let mut store = KvStore::open(&cfg.sqlite_path)?;
    store.init()?;

    let prefs = load_preferences(&store);
    json_log(
        "prefs",
        obj(&[
            ("alert_threshold", v_num(prefs.alert_threshold as f64)),
            ("dark_mode", v_bool(prefs.dark_mode)),
            ("notifications", v_bool(prefs.notifications)),
            ("default_view", v_str(&prefs.default_view)),
        ]),
    );

    if let Some(last) = load_last_session(&store) {
        if let Some(days) = days_since(&last, Utc::now()) {
            json_log(
                "session",
                obj(&[
                    ("event", v_str("returning_visitor")),
                    ("days_since", v_num(days as f64)),
                    ("last_view", v_str(&last.view)),
                ]),
            );
        }
    }

    let mut cache = CollectionCache::new();
    let source = DataSource::for_path(&cfg.data_path, cfg.http_timeout_secs)?;
    let result = source.load(&cfg.data_path, &mut cache, &mut store).await;

    let stats = aggregate(&result.components);
    let view = ViewState {
        category: cfg.category.clone(),
        sort: SortKey::parse(&cfg.sort),
        view_mode: ViewMode::Grid,
        alert_threshold: prefs.alert_threshold,
        top_n: cfg.top_n,
    };
    let model = render(&result.components, &stats, &view);

    json_log(
        "metrics",
        obj(&[
            ("origin", v_str(result.origin.as_str())),
            ("components", v_num(result.components.len() as f64)),
            ("overall_health", v_num(stats.overall_health as f64)),
            ("critical_items", v_num(stats.critical_items as f64)),
            ("maintenance_due", v_num(stats.maintenance_due as f64)),
            ("total_cost", v_num(stats.total_cost)),
        ]),
    );

    print_dashboard(&model);

    if !save_session(&mut store, &prefs.default_view) {
        json_warn("session", obj(&[("event", v_str("session_save_failed"))]));
    }

    Ok(())
}

fn print_dashboard(model: &DisplayModel) {
    println!();
    for tile in &model.tiles {
        if tile.class.is_empty() {
            println!("{:<16} {}", tile.label, tile.value);
        } else {
            println!("{:<16} {} ({})", tile.label, tile.value, tile.class);
        }
    }

    println!();
    println!(
        "{:<4} {:<24} {:<12} {:>6} {:<8} {:>8}  {}",
        "id", "name", "category", "wear", "level", "cost", "urgency"
    );
    for row in &model.rows {
        let flag = if row.flagged { " !" } else { "" };
        println!(
            "{:<4} {:<24} {:<12} {:>6} {:<8} {:>8}  {}{}",
            row.id, row.name, row.category, row.wear, row.level, row.cost, row.urgency, flag
        );
    }

    println!();
    println!("wear distribution:");
    for bucket in &model.buckets {
        println!("  {:<8} {}", bucket.label, "#".repeat(bucket.count));
    }

    if !model.top_critical.is_empty() {
        println!();
        println!("most worn critical components:");
        for row in &model.top_critical {
            println!("  {} ({})", row.name, row.wear);
        }
    }
}
