// Powertrain classification policies.
//
// Two rule sets ship because two dataset families spell their fuel columns
// differently and draw the category lines differently. Both are total, pure
// functions over the fields they inspect: unknown fuel strings fall through
// to the documented default instead of failing.
use crate::types::{CostCategory, EfficiencyCategory};

/// 3-way policy for the operating-cost and resale datasets.
///
/// Diesel/Petrol/Petrol/LPG are conventional, "Electricity" (or the
/// "Electric" spelling some exports use) is electric, and everything else,
/// including blank or unknown strings, is treated as hybrid.
pub fn cost_category(fuel_type: &str) -> CostCategory {
    match fuel_type {
        "Diesel" | "Petrol" | "Petrol/LPG" => CostCategory::Conventional,
        "Electricity" | "Electric" => CostCategory::Electric,
        _ => CostCategory::Hybrid,
    }
}

/// 4-way policy for the efficiency dataset. First match wins, and the order
/// matters: an electric alternative fuel marks a hybrid even when the
/// primary fuel is also electric.
pub fn efficiency_category(
    fuel: &str,
    alternative_fuel: Option<&str>,
    co2_per_mile: f64,
) -> EfficiencyCategory {
    if alternative_fuel == Some("Electricity") {
        return EfficiencyCategory::Hybrid;
    }
    if fuel == "Electricity" {
        return EfficiencyCategory::Electric;
    }
    if matches!(alternative_fuel, Some("E85") | Some("No"))
        && fuel != "Natural Gas"
        && co2_per_mile > 0.0
    {
        return EfficiencyCategory::Conventional;
    }
    EfficiencyCategory::Gas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_policy_maps_known_fuels() {
        assert_eq!(cost_category("Diesel"), CostCategory::Conventional);
        assert_eq!(cost_category("Petrol"), CostCategory::Conventional);
        assert_eq!(cost_category("Petrol/LPG"), CostCategory::Conventional);
        assert_eq!(cost_category("Electricity"), CostCategory::Electric);
        assert_eq!(cost_category("Electric"), CostCategory::Electric);
    }

    #[test]
    fn cost_policy_defaults_unknown_fuels_to_hybrid() {
        assert_eq!(cost_category("CNG"), CostCategory::Hybrid);
        assert_eq!(cost_category(""), CostCategory::Hybrid);
        assert_eq!(cost_category("Hybrid"), CostCategory::Hybrid);
    }

    #[test]
    fn efficiency_policy_alt_electric_wins_over_primary_electric() {
        // Rule 1 outranks rule 2: both fields electric means hybrid.
        assert_eq!(
            efficiency_category("Electricity", Some("Electricity"), 0.0),
            EfficiencyCategory::Hybrid
        );
        assert_eq!(
            efficiency_category("Electricity", Some("No"), 0.0),
            EfficiencyCategory::Electric
        );
    }

    #[test]
    fn efficiency_policy_conventional_needs_all_three_conditions() {
        assert_eq!(
            efficiency_category("Gasoline", Some("E85"), 180.0),
            EfficiencyCategory::Conventional
        );
        assert_eq!(
            efficiency_category("Gasoline", Some("No"), 180.0),
            EfficiencyCategory::Conventional
        );
        // Natural Gas primary fuel blocks the conventional rule.
        assert_eq!(
            efficiency_category("Natural Gas", Some("No"), 180.0),
            EfficiencyCategory::Gas
        );
        // Zero CO2 blocks it too.
        assert_eq!(
            efficiency_category("Gasoline", Some("No"), 0.0),
            EfficiencyCategory::Gas
        );
        // Unlisted alternative fuel falls to the catch-all.
        assert_eq!(
            efficiency_category("Gasoline", Some("Propane"), 180.0),
            EfficiencyCategory::Gas
        );
        assert_eq!(
            efficiency_category("Gasoline", None, 180.0),
            EfficiencyCategory::Gas
        );
    }

    #[test]
    fn classification_is_deterministic() {
        // Pure functions: same fields, same answer, every time.
        for _ in 0..3 {
            assert_eq!(cost_category("Diesel"), CostCategory::Conventional);
            assert_eq!(
                efficiency_category("Gasoline", Some("E85"), 150.0),
                EfficiencyCategory::Conventional
            );
        }
    }
}
