//! Summary statistics over a loaded collection. Everything here is a pure
//! function recomputed in full on each call; nothing is incrementally
//! maintained.

use serde::Serialize;

use crate::model::{Component, CriticalLevel};

/// Wear above this is due for maintenance.
pub const MAINTENANCE_WEAR_CUTOFF: f64 = 70.0;
/// Wear above this contributes the component's replacement cost to the total.
pub const COST_WEAR_CUTOFF: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub count: usize,
    pub total_wear: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WearStats {
    pub overall_health: i64,
    pub critical_items: usize,
    pub maintenance_due: usize,
    pub total_cost: f64,
    pub by_category: Vec<CategoryStat>,
}

/// Derive summary statistics from a collection. An empty collection returns
/// the all-zero `WearStats` rather than failing, which also keeps the health
/// average away from a zero divisor.
pub fn aggregate(components: &[Component]) -> WearStats {
    if components.is_empty() {
        return WearStats::default();
    }

    let total_wear: f64 = components.iter().map(|c| c.current_wear).sum();
    let overall_health = (100.0 - total_wear / components.len() as f64).round() as i64;

    let critical_items =
        components.iter().filter(|c| c.critical_level == CriticalLevel::High).count();
    let maintenance_due =
        components.iter().filter(|c| c.current_wear > MAINTENANCE_WEAR_CUTOFF).count();
    let total_cost: f64 = components
        .iter()
        .filter(|c| c.current_wear > COST_WEAR_CUTOFF)
        .map(|c| c.replacement_cost)
        .sum();

    // First-seen category order is preserved; collections are small enough
    // that the linear scan beats hashing.
    let mut by_category: Vec<CategoryStat> = Vec::new();
    for component in components {
        match by_category.iter_mut().find(|s| s.category == component.category) {
            Some(stat) => {
                stat.count += 1;
                stat.total_wear += component.current_wear;
                stat.total_cost += component.replacement_cost;
            }
            None => by_category.push(CategoryStat {
                category: component.category.clone(),
                count: 1,
                total_wear: component.current_wear,
                total_cost: component.replacement_cost,
            }),
        }
    }

    WearStats { overall_health, critical_items, maintenance_due, total_cost, by_category }
}

/// The `n` most worn high-criticality components, descending by wear. The
/// sort is stable: equal wear keeps original collection order.
pub fn top_critical(components: &[Component], n: usize) -> Vec<Component> {
    let mut critical: Vec<Component> = components
        .iter()
        .filter(|c| c.critical_level == CriticalLevel::High)
        .cloned()
        .collect();
    critical.sort_by(|a, b| {
        b.current_wear.partial_cmp(&a.current_wear).unwrap_or(std::cmp::Ordering::Equal)
    });
    critical.truncate(n);
    critical
}
