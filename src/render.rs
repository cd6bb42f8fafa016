//! Render pipeline: maps the loaded collection plus derived statistics into
//! a `DisplayModel` of rows, labels, and values for the host UI. Pure
//! mapping; no network or storage access happens here.

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::model::{Component, CriticalLevel};
use crate::stats::{top_critical, WearStats};

pub const CATEGORY_ALL: &str = "all";

pub const WEAR_BUCKET_LABELS: [&str; 5] = ["0-20%", "21-40%", "41-60%", "61-80%", "81-100%"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    WearHigh,
    WearLow,
    CostHigh,
    CostLow,
    Name,
    /// Unrecognized key: keep collection order.
    Original,
}

impl SortKey {
    pub fn parse(s: &str) -> Self {
        match s {
            "wear-high" => SortKey::WearHigh,
            "wear-low" => SortKey::WearLow,
            "cost-high" => SortKey::CostHigh,
            "cost-low" => SortKey::CostLow,
            "name" => SortKey::Name,
            _ => SortKey::Original,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Grid,
    List,
}

impl ViewMode {
    pub fn parse(s: &str) -> Self {
        match s {
            "list" => ViewMode::List,
            _ => ViewMode::Grid,
        }
    }
}

/// Rendering parameters, assembled by the host from preferences and config.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub category: String,
    pub sort: SortKey,
    pub view_mode: ViewMode,
    pub alert_threshold: u32,
    pub top_n: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            category: CATEGORY_ALL.to_string(),
            sort: SortKey::WearHigh,
            view_mode: ViewMode::Grid,
            alert_threshold: 60,
            top_n: 3,
        }
    }
}

/// Identity for the "all" sentinel, exact match otherwise. Returns a new
/// vector; the input is untouched.
pub fn filter_by_category(components: &[Component], category: &str) -> Vec<Component> {
    components
        .iter()
        .filter(|c| category == CATEGORY_ALL || c.category == category)
        .cloned()
        .collect()
}

/// Stable, non-mutating sort into a new vector. Ties keep collection order.
pub fn sort_components(components: &[Component], key: SortKey) -> Vec<Component> {
    let mut sorted = components.to_vec();
    let cmp_f64 = |a: f64, b: f64| a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
    match key {
        SortKey::WearHigh => sorted.sort_by(|a, b| cmp_f64(b.current_wear, a.current_wear)),
        SortKey::WearLow => sorted.sort_by(|a, b| cmp_f64(a.current_wear, b.current_wear)),
        SortKey::CostHigh => sorted.sort_by(|a, b| cmp_f64(b.replacement_cost, a.replacement_cost)),
        SortKey::CostLow => sorted.sort_by(|a, b| cmp_f64(a.replacement_cost, b.replacement_cost)),
        SortKey::Name => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Original => {}
    }
    sorted
}

/// Count components into five closed wear ranges. Boundaries at 20/40/60/80
/// land in the lower bucket; out-of-domain values clamp into the edge
/// buckets, so the counts always sum to the collection size.
pub fn wear_buckets(components: &[Component]) -> [usize; 5] {
    let mut buckets = [0usize; 5];
    for component in components {
        let wear = component.current_wear;
        let idx = if wear <= 20.0 {
            0
        } else if wear <= 40.0 {
            1
        } else if wear <= 60.0 {
            2
        } else if wear <= 80.0 {
            3
        } else {
            4
        };
        buckets[idx] += 1;
    }
    buckets
}

/// Severity class for a health-style percentage, as worn by stat tiles and
/// badges in the host UI.
pub fn health_class(value: i64) -> &'static str {
    if value >= 70 {
        "good"
    } else if value >= 50 {
        "medium"
    } else {
        "poor"
    }
}

/// Random selection of up to `n` components from the medium/high tiers, for
/// the spotlight panel. Selection order is not part of the contract.
pub fn spotlight(components: &[Component], n: usize) -> Vec<Component> {
    let mut candidates: Vec<Component> = components
        .iter()
        .filter(|c| {
            c.critical_level == CriticalLevel::High || c.critical_level == CriticalLevel::Medium
        })
        .cloned()
        .collect();
    candidates.shuffle(&mut rand::thread_rng());
    candidates.truncate(n);
    candidates
}

#[derive(Debug, Clone, Serialize)]
pub struct StatTile {
    pub label: String,
    pub value: String,
    pub class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub wear: String,
    pub level: String,
    pub cost: String,
    pub urgency: String,
    /// Wear exceeds the user's alert threshold.
    pub flagged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketBar {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCost {
    pub category: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayModel {
    pub view_mode: ViewMode,
    pub tiles: Vec<StatTile>,
    pub rows: Vec<Row>,
    pub buckets: Vec<BucketBar>,
    pub category_costs: Vec<CategoryCost>,
    pub top_critical: Vec<Row>,
}

fn fmt_pct(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

fn fmt_cost(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("${:.0}", value)
    } else {
        format!("${:.2}", value)
    }
}

fn make_row(component: &Component, alert_threshold: u32) -> Row {
    Row {
        id: component.id,
        name: component.name.clone(),
        category: component.category.clone(),
        wear: fmt_pct(component.current_wear),
        level: component.critical_level.as_str().to_string(),
        cost: fmt_cost(component.replacement_cost),
        urgency: component.urgency.clone(),
        flagged: component.current_wear > alert_threshold as f64,
    }
}

/// Build the full display model for one view of the collection. Degenerate
/// inputs produce empty rows, never errors.
pub fn render(components: &[Component], stats: &WearStats, view: &ViewState) -> DisplayModel {
    let filtered = filter_by_category(components, &view.category);
    let sorted = sort_components(&filtered, view.sort);

    let rows: Vec<Row> = sorted.iter().map(|c| make_row(c, view.alert_threshold)).collect();

    let counts = wear_buckets(&sorted);
    let buckets = WEAR_BUCKET_LABELS
        .iter()
        .zip(counts.iter())
        .map(|(label, count)| BucketBar { label: label.to_string(), count: *count })
        .collect();

    let tiles = vec![
        StatTile {
            label: "Overall Health".to_string(),
            value: format!("{}%", stats.overall_health),
            class: health_class(stats.overall_health).to_string(),
        },
        StatTile {
            label: "Critical Items".to_string(),
            value: stats.critical_items.to_string(),
            class: String::new(),
        },
        StatTile {
            label: "Maintenance Due".to_string(),
            value: stats.maintenance_due.to_string(),
            class: String::new(),
        },
        StatTile {
            label: "Total Cost".to_string(),
            value: fmt_cost(stats.total_cost),
            class: String::new(),
        },
    ];

    let category_costs = stats
        .by_category
        .iter()
        .map(|s| CategoryCost { category: s.category.clone(), total_cost: s.total_cost })
        .collect();

    let top = top_critical(components, view.top_n)
        .iter()
        .map(|c| make_row(c, view.alert_threshold))
        .collect();

    DisplayModel {
        view_mode: view.view_mode,
        tiles,
        rows,
        buckets,
        category_costs,
        top_critical: top,
    }
}
