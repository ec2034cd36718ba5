// Recommendation selector: filter, rank, truncate.
//
// Filters are independently optional and conjunctive. Ranking is either by
// cost (descending, so the head of the list is the most expensive vehicle
// still inside the budget) or by an injected scoring model applied to
// feature columns standardized within the filtered subset. The selector
// never constructs the model; it only calls it.
use crate::error::EngineError;
use crate::types::VehicleRecord;
use crate::util::{mean, population_std};
use std::cmp::Ordering;

/// Feature columns fed to the predictor, in training order:
/// year, mpg, CO2 per mile, fuel cost.
pub const FEATURE_COUNT: usize = 4;

pub type FeatureRow = [f64; FEATURE_COUNT];

/// Black-box efficiency scorer. One score per input row, order-preserving;
/// the selector owns neither the model nor its validation.
pub trait EfficiencyPredictor {
    fn predict(&self, features: &[FeatureRow]) -> Vec<f64>;
}

/// User-supplied filter values. `None` means the predicate is skipped
/// entirely (the "All" choice in the menus), not matched as a wildcard.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub manufacturer: Option<String>,
    pub year: Option<i32>,
    pub fuel_type: Option<String>,
    /// Upper cost bound. Records without a cost can never satisfy it.
    pub budget: Option<f64>,
}

impl Filters {
    fn matches(&self, r: &VehicleRecord) -> bool {
        if let Some(m) = &self.manufacturer {
            if r.manufacturer != *m {
                return false;
            }
        }
        if let Some(y) = self.year {
            if r.year != Some(y) {
                return false;
            }
        }
        if let Some(f) = &self.fuel_type {
            if r.fuel_type != *f {
                return false;
            }
        }
        if let Some(b) = self.budget {
            match r.cost {
                Some(c) if c <= b => {}
                _ => return false,
            }
        }
        true
    }
}

pub enum Ranking<'a> {
    /// Sort by cost, highest first. Records without a cost are dropped from
    /// the ranking: they cannot be ordered against the rest.
    CostDescending,
    /// Standardize features within the filtered subset, score with the
    /// model, sort by score, highest first.
    ByPredictor(&'a dyn EfficiencyPredictor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    Matched,
    /// Filters matched nothing. Callers report "no matching vehicles";
    /// this is an outcome, not an error.
    NoMatch,
}

#[derive(Debug, Clone)]
pub struct Recommendation {
    pub record: VehicleRecord,
    /// Model score, present only for predictor-based rankings.
    pub score: Option<f64>,
}

/// Result of one filter/rank/truncate pass. Replaced wholesale on every
/// recomputation; never mutated in place.
#[derive(Debug, Clone)]
pub struct Selection {
    pub vehicles: Vec<Recommendation>,
    pub status: SelectionStatus,
}

impl Selection {
    fn empty() -> Selection {
        Selection {
            vehicles: Vec::new(),
            status: SelectionStatus::NoMatch,
        }
    }
}

/// The staged recommendation interaction, passed by value between stages.
/// There is no ambient "last recommendation" state anywhere else.
#[derive(Debug, Clone)]
pub enum Session {
    NoSelection,
    Recommended(Selection),
    VehicleChosen { vehicle: VehicleRecord },
}

/// Apply `filters`, rank the survivors, keep the first `limit`.
///
/// An empty result (nothing matched, or nothing rankable) comes back as an
/// empty `Selection` flagged `NoMatch`. Errors are reserved for records the
/// predictor cannot score and for a model that breaks its one-score-per-row
/// contract.
pub fn select(
    records: &[VehicleRecord],
    filters: &Filters,
    ranking: Ranking,
    limit: usize,
) -> Result<Selection, EngineError> {
    let subset: Vec<&VehicleRecord> = records.iter().filter(|r| filters.matches(r)).collect();
    if subset.is_empty() {
        return Ok(Selection::empty());
    }

    let mut ranked: Vec<Recommendation> = match ranking {
        Ranking::CostDescending => {
            let mut with_cost: Vec<Recommendation> = subset
                .iter()
                .filter(|r| r.cost.is_some())
                .map(|r| Recommendation {
                    record: (*r).clone(),
                    score: None,
                })
                .collect();
            with_cost.sort_by(|a, b| {
                b.record
                    .cost
                    .partial_cmp(&a.record.cost)
                    .unwrap_or(Ordering::Equal)
            });
            with_cost
        }
        Ranking::ByPredictor(model) => {
            let features = feature_matrix(&subset)?;
            let standardized = standardize(features);
            let scores = model.predict(&standardized);
            if scores.len() != subset.len() {
                return Err(EngineError::InvalidInput(format!(
                    "predictor returned {} scores for {} rows",
                    scores.len(),
                    subset.len()
                )));
            }
            let mut scored: Vec<Recommendation> = subset
                .iter()
                .zip(scores)
                .map(|(r, s)| Recommendation {
                    record: (*r).clone(),
                    score: Some(s),
                })
                .collect();
            scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
            scored
        }
    };

    ranked.truncate(limit);
    if ranked.is_empty() {
        return Ok(Selection::empty());
    }
    Ok(Selection {
        vehicles: ranked,
        status: SelectionStatus::Matched,
    })
}

/// Pull the four feature columns out of each record. Every record must
/// carry all four; a record that does not cannot be scored and fails the
/// whole selection. The efficiency load window pre-drops such rows.
fn feature_matrix(subset: &[&VehicleRecord]) -> Result<Vec<FeatureRow>, EngineError> {
    let mut rows = Vec::with_capacity(subset.len());
    for r in subset {
        let missing = |field: &str| {
            EngineError::InvalidInput(format!("'{}' has no {}", r.display_name(), field))
        };
        rows.push([
            r.year.ok_or_else(|| missing("model year"))? as f64,
            r.mpg.ok_or_else(|| missing("mpg figure"))?,
            r.co2_per_mile.ok_or_else(|| missing("CO2 figure"))?,
            r.fuel_cost.ok_or_else(|| missing("fuel cost"))?,
        ]);
    }
    Ok(rows)
}

/// Zero-mean/unit-variance scaling, column by column, computed over the
/// rows given (the filtered subset, not the whole dataset). Scores are
/// therefore relative to the current filter population. A constant column
/// standardizes to all zeros.
fn standardize(mut rows: Vec<FeatureRow>) -> Vec<FeatureRow> {
    for col in 0..FEATURE_COUNT {
        let column: Vec<f64> = rows.iter().map(|r| r[col]).collect();
        let (Some(m), Some(sd)) = (mean(&column), population_std(&column)) else {
            continue;
        };
        let scale = if sd == 0.0 { 1.0 } else { sd };
        for row in rows.iter_mut() {
            row[col] = (row[col] - m) / scale;
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn costed(manuf: &str, fuel: &str, cost: f64) -> VehicleRecord {
        VehicleRecord {
            manufacturer: manuf.into(),
            model: "X".into(),
            year: Some(2015),
            fuel_type: fuel.into(),
            alt_fuel: None,
            cost: Some(cost),
            mpg: None,
            co2_per_mile: None,
            fuel_cost: None,
        }
    }

    fn efficient(manuf: &str, year: i32, mpg: f64, co2: f64, fuel_cost: f64) -> VehicleRecord {
        VehicleRecord {
            manufacturer: manuf.into(),
            model: "Y".into(),
            year: Some(year),
            fuel_type: "Gasoline".into(),
            alt_fuel: Some("No".into()),
            cost: None,
            mpg: Some(mpg),
            co2_per_mile: Some(co2),
            fuel_cost: Some(fuel_cost),
        }
    }

    /// Scores each row with its standardized mpg column, so tests can see
    /// exactly what the selector fed the model.
    struct MpgColumn;
    impl EfficiencyPredictor for MpgColumn {
        fn predict(&self, features: &[FeatureRow]) -> Vec<f64> {
            features.iter().map(|f| f[1]).collect()
        }
    }

    struct BrokenModel;
    impl EfficiencyPredictor for BrokenModel {
        fn predict(&self, _features: &[FeatureRow]) -> Vec<f64> {
            vec![1.0]
        }
    }

    #[test]
    fn budget_keeps_affordable_sorted_descending() {
        let records = vec![
            costed("A", "Petrol", 4000.0),
            costed("B", "Petrol", 6000.0),
            costed("C", "Petrol", 4999.0),
            costed("D", "Petrol", 5000.0),
        ];
        let filters = Filters {
            budget: Some(5000.0),
            ..Filters::default()
        };
        let sel = select(&records, &filters, Ranking::CostDescending, 5).unwrap();
        let costs: Vec<f64> = sel.vehicles.iter().filter_map(|v| v.record.cost).collect();
        assert_eq!(costs, vec![5000.0, 4999.0, 4000.0]);
        assert_eq!(sel.status, SelectionStatus::Matched);

        // Truncation applies after ranking.
        let sel = select(&records, &filters, Ranking::CostDescending, 2).unwrap();
        let costs: Vec<f64> = sel.vehicles.iter().filter_map(|v| v.record.cost).collect();
        assert_eq!(costs, vec![5000.0, 4999.0]);
    }

    #[test]
    fn unset_filters_are_skipped_entirely() {
        let records = vec![costed("A", "Petrol", 100.0), costed("B", "Diesel", 200.0)];
        let sel = select(&records, &Filters::default(), Ranking::CostDescending, 10).unwrap();
        assert_eq!(sel.vehicles.len(), 2);
    }

    #[test]
    fn filters_are_conjunctive() {
        let records = vec![
            costed("A", "Petrol", 100.0),
            costed("A", "Diesel", 200.0),
            costed("B", "Petrol", 300.0),
        ];
        let filters = Filters {
            manufacturer: Some("A".into()),
            fuel_type: Some("Petrol".into()),
            ..Filters::default()
        };
        let sel = select(&records, &filters, Ranking::CostDescending, 10).unwrap();
        assert_eq!(sel.vehicles.len(), 1);
        assert_eq!(sel.vehicles[0].record.manufacturer, "A");
        assert_eq!(sel.vehicles[0].record.fuel_type, "Petrol");
    }

    #[test]
    fn nothing_matched_is_a_status_not_an_error() {
        let records = vec![costed("A", "Petrol", 100.0)];
        let filters = Filters {
            manufacturer: Some("Z".into()),
            ..Filters::default()
        };
        let sel = select(&records, &filters, Ranking::CostDescending, 5).unwrap();
        assert!(sel.vehicles.is_empty());
        assert_eq!(sel.status, SelectionStatus::NoMatch);
    }

    #[test]
    fn predictor_ranking_sorts_by_score_descending() {
        let records = vec![
            efficient("A", 2015, 10.0, 300.0, 3.0),
            efficient("B", 2016, 30.0, 100.0, 2.0),
            efficient("C", 2017, 20.0, 200.0, 2.5),
        ];
        let sel = select(
            &records,
            &Filters::default(),
            Ranking::ByPredictor(&MpgColumn),
            5,
        )
        .unwrap();
        let order: Vec<&str> = sel
            .vehicles
            .iter()
            .map(|v| v.record.manufacturer.as_str())
            .collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert!(sel.vehicles.iter().all(|v| v.score.is_some()));
    }

    #[test]
    fn standardization_is_relative_to_the_filtered_subset() {
        let records = vec![
            efficient("A", 2015, 10.0, 300.0, 3.0),
            efficient("A", 2015, 20.0, 300.0, 3.0),
            efficient("B", 2015, 90.0, 300.0, 3.0),
        ];
        // Within {A}: mpg values 10 and 20, mean 15, std 5 -> scores -1, +1.
        // Had the scaling been global, B's 90 mpg would have pulled the
        // mean far above both and the two scores would both be negative.
        let filters = Filters {
            manufacturer: Some("A".into()),
            ..Filters::default()
        };
        let sel = select(&records, &filters, Ranking::ByPredictor(&MpgColumn), 5).unwrap();
        assert_eq!(sel.vehicles[0].score, Some(1.0));
        assert_eq!(sel.vehicles[1].score, Some(-1.0));
    }

    #[test]
    fn constant_feature_column_standardizes_to_zero() {
        let records = vec![
            efficient("A", 2015, 25.0, 300.0, 3.0),
            efficient("B", 2015, 25.0, 100.0, 2.0),
        ];
        let sel = select(
            &records,
            &Filters::default(),
            Ranking::ByPredictor(&MpgColumn),
            5,
        )
        .unwrap();
        // mpg is constant across the subset, so every standardized mpg
        // value (and with this stub, every score) is exactly zero.
        assert!(sel.vehicles.iter().all(|v| v.score == Some(0.0)));
    }

    #[test]
    fn record_missing_a_feature_is_invalid_input() {
        let mut bad = efficient("A", 2015, 25.0, 300.0, 3.0);
        bad.mpg = None;
        let err = select(
            &[bad],
            &Filters::default(),
            Ranking::ByPredictor(&MpgColumn),
            5,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn predictor_breaking_row_contract_is_invalid_input() {
        let records = vec![
            efficient("A", 2015, 10.0, 300.0, 3.0),
            efficient("B", 2016, 30.0, 100.0, 2.0),
        ];
        let err = select(
            &records,
            &Filters::default(),
            Ranking::ByPredictor(&BrokenModel),
            5,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
}
