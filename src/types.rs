use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// A vehicle row normalized through a `schema::Schema`.
///
/// Records are immutable inputs: the engine derives categories and builds
/// new subsets, it never rewrites source fields. Fields a dataset does not
/// carry stay `None` and the operations that need them fail explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRecord {
    pub manufacturer: String,
    pub model: String,
    pub year: Option<i32>,
    /// Primary fuel-type string, as spelled in the dataset.
    pub fuel_type: String,
    /// Secondary/alternative-fuel string ("Electricity", "E85", "No", ...).
    pub alt_fuel: Option<String>,
    /// Cost column (total operating cost or resale price, currency as given).
    pub cost: Option<f64>,
    pub mpg: Option<f64>,
    /// CO2 emissions in grams per mile.
    pub co2_per_mile: Option<f64>,
    /// Fuel cost per gallon.
    pub fuel_cost: Option<f64>,
}

impl VehicleRecord {
    /// "Manufacturer Model Year" identity string used in menus and tables.
    pub fn display_name(&self) -> String {
        match self.year {
            Some(y) => format!("{} {} {}", self.manufacturer, self.model, y),
            None => format!("{} {}", self.manufacturer, self.model),
        }
    }
}

/// 3-way powertrain category used by the cost-analysis datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostCategory {
    Conventional,
    Electric,
    Hybrid,
}

impl CostCategory {
    pub const ALL: [CostCategory; 3] = [
        CostCategory::Conventional,
        CostCategory::Electric,
        CostCategory::Hybrid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Conventional => "Conventional",
            CostCategory::Electric => "Electric",
            CostCategory::Hybrid => "Hybrid",
        }
    }

    /// Parse a user-facing label, case-insensitively. `None` for anything
    /// that is not one of the three category names.
    pub fn parse(s: &str) -> Option<CostCategory> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conventional" => Some(CostCategory::Conventional),
            "electric" => Some(CostCategory::Electric),
            "hybrid" => Some(CostCategory::Hybrid),
            _ => None,
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 4-way powertrain category used by the efficiency dataset. The rule set
/// that produces it is order-sensitive; see `classify::efficiency_category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EfficiencyCategory {
    Hybrid,
    Electric,
    Conventional,
    Gas,
}

impl EfficiencyCategory {
    pub fn label(self) -> &'static str {
        match self {
            EfficiencyCategory::Hybrid => "Hybrid",
            EfficiencyCategory::Electric => "Electric",
            EfficiencyCategory::Conventional => "Conventional",
            EfficiencyCategory::Gas => "Gas",
        }
    }
}

impl fmt::Display for EfficiencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CategoryCostRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Vehicles")]
    #[tabled(rename = "Vehicles")]
    pub vehicles: usize,
    #[serde(rename = "AvgCost")]
    #[tabled(rename = "AvgCost")]
    pub avg_cost: String,
    #[serde(rename = "ReductionVsConventional")]
    #[tabled(rename = "ReductionVsConventional")]
    pub reduction: String,
    #[serde(rename = "PctSavings")]
    #[tabled(rename = "PctSavings")]
    pub pct_savings: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RecommendationRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Vehicle")]
    #[tabled(rename = "Vehicle")]
    pub vehicle: String,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
}

#[derive(Debug, Serialize)]
pub struct KpiSummary {
    pub total_vehicles: usize,
    pub categories_present: usize,
    pub avg_cost_conventional: Option<f64>,
    pub reduction_electric: Option<f64>,
    pub pct_savings_electric: Option<f64>,
    pub reduction_hybrid: Option<f64>,
    pub pct_savings_hybrid: Option<f64>,
    pub savings_ratio_pct: Option<f64>,
}
