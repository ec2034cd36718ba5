// Group-by cost aggregation and the derived savings KPIs.
//
// "Undefined" is a first-class outcome here: a category with no valued
// records is simply absent from the aggregate map, and every KPI built on
// top of it stays `None`. Nothing in this module turns missing data into a
// zero.
use crate::error::EngineError;
use crate::types::{CostCategory, VehicleRecord};
use crate::util::mean;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Mean of `value` per `category`. Records where `value` yields `None` do
/// not count toward any category; categories left with no valued records
/// are absent from the result.
pub fn mean_by_category<C, F, G>(records: &[VehicleRecord], category: F, value: G) -> HashMap<C, f64>
where
    C: Eq + Hash,
    F: Fn(&VehicleRecord) -> C,
    G: Fn(&VehicleRecord) -> Option<f64>,
{
    let mut groups: HashMap<C, Vec<f64>> = HashMap::new();
    for r in records {
        if let Some(v) = value(r) {
            groups.entry(category(r)).or_default().push(v);
        }
    }
    groups
        .into_iter()
        .filter_map(|(c, vs)| mean(&vs).map(|m| (c, m)))
        .collect()
}

/// Sum variant of [`mean_by_category`], same absence semantics.
pub fn sum_by_category<C, F, G>(records: &[VehicleRecord], category: F, value: G) -> HashMap<C, f64>
where
    C: Eq + Hash,
    F: Fn(&VehicleRecord) -> C,
    G: Fn(&VehicleRecord) -> Option<f64>,
{
    let mut sums: HashMap<C, f64> = HashMap::new();
    for r in records {
        if let Some(v) = value(r) {
            *sums.entry(category(r)).or_insert(0.0) += v;
        }
    }
    sums
}

/// Per-category vehicle counts, for report display.
pub fn count_by_category<C, F>(records: &[VehicleRecord], category: F) -> HashMap<C, usize>
where
    C: Eq + Hash,
    F: Fn(&VehicleRecord) -> C,
{
    let mut counts: HashMap<C, usize> = HashMap::new();
    for r in records {
        *counts.entry(category(r)).or_insert(0) += 1;
    }
    counts
}

/// mean(baseline) - mean(comparison). `None` when either mean is undefined.
/// A result of exactly 0.0 is a defined value, not "no data".
pub fn reduction<C: Eq + Hash>(means: &HashMap<C, f64>, baseline: C, comparison: C) -> Option<f64> {
    let base = means.get(&baseline)?;
    let cmp = means.get(&comparison)?;
    Some(base - cmp)
}

/// reduction / mean(baseline) * 100. Undefined when the reduction is, and
/// also when the baseline mean is zero: that ratio has no meaning, so it is
/// withheld rather than reported as infinity.
pub fn percent_savings<C: Eq + Hash + Copy>(
    means: &HashMap<C, f64>,
    baseline: C,
    comparison: C,
) -> Option<f64> {
    let red = reduction(means, baseline, comparison)?;
    let base = *means.get(&baseline)?;
    if base == 0.0 {
        return None;
    }
    Some(red / base * 100.0)
}

/// Look up one category's aggregate or fail with the explicit no-data
/// marker. Used where a report needs a baseline to exist.
pub fn require_aggregate<C: Eq + Hash + Display>(
    aggregates: &HashMap<C, f64>,
    category: C,
) -> Result<f64, EngineError> {
    aggregates
        .get(&category)
        .copied()
        .ok_or_else(|| EngineError::UndefinedAggregate(category.to_string()))
}

/// Sum-based ratio KPI: total cost of the electric and hybrid groups as a
/// percentage of the conventional total. Fails when the conventional total
/// is zero or absent, since the ratio is then undefined.
pub fn savings_ratio(sums: &HashMap<CostCategory, f64>) -> Result<f64, EngineError> {
    let conventional = sums
        .get(&CostCategory::Conventional)
        .copied()
        .unwrap_or(0.0);
    if conventional == 0.0 {
        return Err(EngineError::DivisionByZero("savings ratio"));
    }
    let alternative = sums.get(&CostCategory::Electric).copied().unwrap_or(0.0)
        + sums.get(&CostCategory::Hybrid).copied().unwrap_or(0.0);
    Ok(alternative / conventional * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::cost_category;

    fn record(fuel: &str, cost: Option<f64>) -> VehicleRecord {
        VehicleRecord {
            manufacturer: "Acme".into(),
            model: "One".into(),
            year: None,
            fuel_type: fuel.into(),
            alt_fuel: None,
            cost,
            mpg: None,
            co2_per_mile: None,
            fuel_cost: None,
        }
    }

    fn means_for(records: &[VehicleRecord]) -> HashMap<CostCategory, f64> {
        mean_by_category(records, |r| cost_category(&r.fuel_type), |r| r.cost)
    }

    #[test]
    fn empty_category_is_absent_not_zero() {
        let records = vec![record("Diesel", Some(1000.0))];
        let means = means_for(&records);
        assert_eq!(means.get(&CostCategory::Conventional), Some(&1000.0));
        assert!(!means.contains_key(&CostCategory::Electric));
        assert_eq!(
            reduction(&means, CostCategory::Conventional, CostCategory::Electric),
            None
        );
    }

    #[test]
    fn records_without_cost_do_not_count() {
        let records = vec![record("Electricity", None), record("Diesel", Some(500.0))];
        let means = means_for(&records);
        // The electric record has no cost, so the category stays undefined.
        assert!(!means.contains_key(&CostCategory::Electric));
    }

    #[test]
    fn reduction_and_percent_savings_example() {
        let records = vec![
            record("Diesel", Some(1000.0)),
            record("Electricity", Some(700.0)),
        ];
        let means = means_for(&records);
        let red = reduction(&means, CostCategory::Conventional, CostCategory::Electric);
        assert_eq!(red, Some(300.0));
        let pct = percent_savings(&means, CostCategory::Conventional, CostCategory::Electric);
        assert_eq!(pct, Some(30.0));
    }

    #[test]
    fn zero_reduction_is_defined() {
        let records = vec![
            record("Diesel", Some(800.0)),
            record("Electricity", Some(800.0)),
        ];
        let means = means_for(&records);
        assert_eq!(
            reduction(&means, CostCategory::Conventional, CostCategory::Electric),
            Some(0.0)
        );
    }

    #[test]
    fn percent_savings_undefined_on_zero_baseline() {
        let records = vec![
            record("Diesel", Some(0.0)),
            record("Electricity", Some(700.0)),
        ];
        let means = means_for(&records);
        // The reduction itself exists...
        assert_eq!(
            reduction(&means, CostCategory::Conventional, CostCategory::Electric),
            Some(-700.0)
        );
        // ...but the percentage does not.
        assert_eq!(
            percent_savings(&means, CostCategory::Conventional, CostCategory::Electric),
            None
        );
    }

    #[test]
    fn kpis_over_a_category_narrowed_subset() {
        // The cost report lets the user narrow to one vehicle type before
        // aggregating. Narrowing to Electric leaves no conventional
        // baseline, so the comparison KPIs stay undefined instead of
        // comparing against a phantom zero.
        let mut records = vec![
            record("Diesel", Some(1000.0)),
            record("Electricity", Some(700.0)),
            record("Electricity", Some(500.0)),
        ];
        records.retain(|r| cost_category(&r.fuel_type) == CostCategory::Electric);
        let means = means_for(&records);
        assert_eq!(means.get(&CostCategory::Electric), Some(&600.0));
        assert!(!means.contains_key(&CostCategory::Conventional));
        assert_eq!(
            reduction(&means, CostCategory::Conventional, CostCategory::Electric),
            None
        );
        assert_eq!(
            percent_savings(&means, CostCategory::Conventional, CostCategory::Electric),
            None
        );
    }

    #[test]
    fn require_aggregate_reports_missing_category() {
        let means = means_for(&[record("Electricity", Some(700.0))]);
        let err = require_aggregate(&means, CostCategory::Conventional).unwrap_err();
        assert_eq!(
            err,
            EngineError::UndefinedAggregate("Conventional".to_string())
        );
    }

    #[test]
    fn savings_ratio_of_totals() {
        let records = vec![
            record("Diesel", Some(600.0)),
            record("Petrol", Some(400.0)),
            record("Electricity", Some(300.0)),
            record("Hybrid", Some(200.0)),
        ];
        let sums = sum_by_category(&records, |r| cost_category(&r.fuel_type), |r| r.cost);
        assert_eq!(savings_ratio(&sums), Ok(50.0));
    }

    #[test]
    fn savings_ratio_fails_without_conventional_total() {
        let records = vec![record("Electricity", Some(300.0))];
        let sums = sum_by_category(&records, |r| cost_category(&r.fuel_type), |r| r.cost);
        assert_eq!(
            savings_ratio(&sums),
            Err(EngineError::DivisionByZero("savings ratio"))
        );
    }
}
