// Entry point and high-level CLI flow.
//
// The binary mirrors the dashboard pages it replaces:
// - Option [1] loads the three vehicle datasets, printing diagnostics.
// - Option [2] builds the operating-cost report (per-category means,
//   reduction/savings KPIs, savings ratio) and exports CSV + JSON.
// - Option [3] runs the model-scored efficiency recommendation flow,
//   including the per-vehicle consumption projection.
// - Option [4] recommends a vehicle within a budget from the resale data.
mod aggregate;
mod classify;
mod error;
mod loader;
mod model;
mod output;
mod project;
mod schema;
mod select;
mod types;
mod util;

use classify::{cost_category, efficiency_category};
use model::LinearModel;
use once_cell::sync::Lazy;
use schema::Schema;
use select::{Filters, Ranking, Selection, SelectionStatus, Session};
use std::io::{self, Write};
use std::sync::Mutex;
use types::{CategoryCostRow, CostCategory, KpiSummary, RecommendationRow, VehicleRecord};
use util::{format_int, format_number, parse_f64_safe, parse_i32_safe};

const COSTS_PATH: &str = "data/vehicle_operating_costs.csv";
const EFFICIENCY_PATH: &str = "data/vehicle_efficiency.csv";
const RESALE_PATH: &str = "data/car_resale_prices.csv";
const MODEL_PATH: &str = "models/efficiency_model.json";

// Simple in-memory app state so we only load the CSVs once but can run the
// reports and recommendation flows multiple times in a single session. The
// datasets are read-only once loaded; recommendation state deliberately
// lives in a `Session` value threaded through the stages, not here.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        costs: None,
        efficiency: None,
        resale: None,
    })
});

struct AppState {
    costs: Option<Vec<VehicleRecord>>,
    efficiency: Option<Vec<VehicleRecord>>,
    resale: Option<Vec<VehicleRecord>>,
}

/// Read a single line of input after printing the common "Enter choice:"
/// prompt used by the main menu.
fn read_choice() -> String {
    prompt("Enter choice")
}

/// Print `label: ` and read one trimmed line from stdin.
fn prompt(label: &str) -> String {
    print!("{}: ", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the selection menu after a report or
/// recommendation flow. Returns `true` for `Y`, `false` for `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt("Back to Selection Menu (Y/N)").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// An "All" answer (or an empty one) means "do not filter on this".
fn optional_filter(answer: &str) -> Option<String> {
    let trimmed = answer.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Handle option [1]: load the three datasets.
fn handle_load() {
    let mut state = APP_STATE.lock().unwrap();
    let jobs: [(&str, Schema, fn(Vec<VehicleRecord>) -> Vec<VehicleRecord>); 3] = [
        (COSTS_PATH, Schema::operating_cost(), |r| r),
        (EFFICIENCY_PATH, Schema::efficiency(), loader::efficiency_window),
        (RESALE_PATH, Schema::resale(), |r| r),
    ];
    for (path, schema, window) in jobs {
        match loader::load_records(path, &schema) {
            Ok((records, report)) => {
                let records = window(records);
                println!(
                    "{}: {} rows read, {} loaded, {} usable after filtering ({} incomplete, {} unreadable).",
                    path,
                    format_int(report.total_rows as i64),
                    format_int(report.loaded_rows as i64),
                    format_int(records.len() as i64),
                    format_int(report.incomplete_rows as i64),
                    format_int(report.parse_errors as i64)
                );
                match path {
                    COSTS_PATH => state.costs = Some(records),
                    EFFICIENCY_PATH => state.efficiency = Some(records),
                    _ => state.resale = Some(records),
                }
            }
            Err(e) => eprintln!("Failed to load {}: {}", path, e),
        }
    }
    println!();
}

fn format_opt(value: Option<f64>, prefix: &str, suffix: &str) -> String {
    match value {
        Some(v) => format!("{}{}{}", prefix, format_number(v, 2), suffix),
        None => "n/a".to_string(),
    }
}

/// Handle option [2]: the operating-cost comparison report.
///
/// Per-category mean costs with reduction and percentage savings against
/// the conventional baseline, plus the sum-based savings ratio. A defined
/// reduction of $0.00 is shown as such; only genuinely undefined KPIs are
/// rendered as "n/a".
fn handle_cost_report() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.costs.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the datasets first (option 1).\n");
        return;
    };

    let manufacturer = optional_filter(&prompt("Manufacturer (or All)"));
    let vehicle_type = match optional_filter(&prompt(
        "Vehicle type (All/Conventional/Electric/Hybrid)",
    )) {
        Some(s) => match CostCategory::parse(&s) {
            Some(cat) => Some(cat),
            None => {
                println!("'{}' is not a vehicle type.\n", s);
                return;
            }
        },
        None => None,
    };

    let mut filtered: Vec<VehicleRecord> = match &manufacturer {
        Some(m) => data.iter().filter(|r| &r.manufacturer == m).cloned().collect(),
        None => data,
    };
    if let Some(cat) = vehicle_type {
        filtered.retain(|r| cost_category(&r.fuel_type) == cat);
    }
    if filtered.is_empty() {
        println!("No vehicles match those filters.\n");
        return;
    }

    let category = |r: &VehicleRecord| cost_category(&r.fuel_type);
    let means = aggregate::mean_by_category(&filtered, category, |r| r.cost);
    let counts = aggregate::count_by_category(&filtered, category);
    let sums = aggregate::sum_by_category(&filtered, category, |r| r.cost);

    if let Err(e) = aggregate::require_aggregate(&means, CostCategory::Conventional) {
        println!("Note: {}; savings KPIs cannot be compared.", e);
    }

    let baseline = CostCategory::Conventional;
    let rows: Vec<CategoryCostRow> = CostCategory::ALL
        .iter()
        .map(|&cat| {
            let (reduction, pct) = if cat == baseline {
                (None, None)
            } else {
                (
                    aggregate::reduction(&means, baseline, cat),
                    aggregate::percent_savings(&means, baseline, cat),
                )
            };
            CategoryCostRow {
                category: cat.label().to_string(),
                vehicles: counts.get(&cat).copied().unwrap_or(0),
                avg_cost: format_opt(means.get(&cat).copied(), "$", ""),
                reduction: if cat == baseline {
                    "-".to_string()
                } else {
                    format_opt(reduction, "$", "")
                },
                pct_savings: if cat == baseline {
                    "-".to_string()
                } else {
                    format_opt(pct, "", "%")
                },
            }
        })
        .collect();

    println!("\nOperating Cost by Powertrain Category");
    if let Some(m) = &manufacturer {
        println!("(Manufacturer: {})\n", m);
    } else {
        println!("(All manufacturers)\n");
    }
    output::preview_table_rows(&rows, rows.len());

    let ratio = aggregate::savings_ratio(&sums);
    match &ratio {
        Ok(v) => println!(
            "Electric/Hybrid total cost vs Conventional: {}%",
            format_number(*v, 2)
        ),
        Err(e) => println!("Savings ratio not available: {}", e),
    }

    let summary = KpiSummary {
        total_vehicles: filtered.len(),
        categories_present: means.len(),
        avg_cost_conventional: means.get(&CostCategory::Conventional).copied(),
        reduction_electric: aggregate::reduction(&means, baseline, CostCategory::Electric),
        pct_savings_electric: aggregate::percent_savings(&means, baseline, CostCategory::Electric),
        reduction_hybrid: aggregate::reduction(&means, baseline, CostCategory::Hybrid),
        pct_savings_hybrid: aggregate::percent_savings(&means, baseline, CostCategory::Hybrid),
        savings_ratio_pct: ratio.ok(),
    };
    let file = "category_cost_report.csv";
    if let Err(e) = output::write_csv(file, &rows) {
        eprintln!("Write error: {}", e);
    }
    if let Err(e) = output::write_json("kpi_summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("(Full table exported to {}, KPIs to kpi_summary.json)\n", file);
}

/// Handle option [3]: model-scored efficiency recommendations followed by
/// the optional per-vehicle consumption projection. The interaction is a
/// small state machine passed by value between the stages.
fn handle_efficiency_recommendations() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.efficiency.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the datasets first (option 1).\n");
        return;
    };
    let model = match LinearModel::load(MODEL_PATH) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to load the efficiency model from {}: {}\n", MODEL_PATH, e);
            return;
        }
    };

    let session = recommend_stage(&data, &model);
    let session = choose_stage(session);
    project_stage(session);
}

/// Distinguish "All"/empty (no filter) from an answer that fails to parse
/// as a year: a typo is reported back as `Err` instead of silently turning
/// into the widest filter.
fn year_filter(answer: &str) -> Result<Option<i32>, String> {
    match optional_filter(answer) {
        None => Ok(None),
        Some(s) => parse_i32_safe(Some(&s)).map(Some).ok_or(s),
    }
}

fn recommend_stage(data: &[VehicleRecord], model: &LinearModel) -> Session {
    let manufacturer = optional_filter(&prompt("Manufacturer (or All)"));
    let year = match year_filter(&prompt("Model year (or All)")) {
        Ok(y) => y,
        Err(bad) => {
            println!("'{}' is not a model year.\n", bad);
            return Session::NoSelection;
        }
    };
    let filters = Filters {
        manufacturer,
        year,
        ..Filters::default()
    };

    let selection = match select::select(data, &filters, Ranking::ByPredictor(model), 5) {
        Ok(sel) => sel,
        Err(e) => {
            println!("Could not score the filtered vehicles: {}\n", e);
            return Session::NoSelection;
        }
    };
    if selection.status == SelectionStatus::NoMatch {
        println!("No vehicles matched the selected filters.\n");
        return Session::NoSelection;
    }

    println!("\nThe most energy-efficient vehicles for this selection:\n");
    let rows: Vec<RecommendationRow> = selection
        .vehicles
        .iter()
        .enumerate()
        .map(|(idx, v)| RecommendationRow {
            rank: idx + 1,
            vehicle: v.record.display_name(),
            category: efficiency_category(
                &v.record.fuel_type,
                v.record.alt_fuel.as_deref(),
                v.record.co2_per_mile.unwrap_or(0.0),
            )
            .label()
            .to_string(),
            score: format_opt(v.score, "", ""),
        })
        .collect();
    output::preview_table_rows(&rows, rows.len());
    Session::Recommended(selection)
}

fn choose_stage(session: Session) -> Session {
    let selection = match session {
        Session::Recommended(sel) => sel,
        other => return other,
    };
    let answer = prompt(&format!(
        "Choose a vehicle [1-{}] for a consumption projection, or 0 to skip",
        selection.vehicles.len()
    ));
    match answer.parse::<usize>() {
        Ok(n) if n >= 1 && n <= selection.vehicles.len() => {
            let vehicle = selection.vehicles[n - 1].record.clone();
            print_vehicle_details(&vehicle);
            Session::VehicleChosen { vehicle }
        }
        _ => {
            println!("No vehicle chosen.\n");
            Session::Recommended(selection)
        }
    }
}

fn print_vehicle_details(vehicle: &VehicleRecord) {
    println!("\nVehicle details");
    println!("Selected vehicle: {}", vehicle.display_name());
    if let Some(fc) = vehicle.fuel_cost {
        println!("Fuel cost per gallon: ${}", format_number(fc, 2));
    }
    if let Some(co2) = vehicle.co2_per_mile {
        println!("CO2 emissions per mile: {} g/mile", format_number(co2, 2));
    }
    if let Some(mpg) = vehicle.mpg {
        println!("Miles per gallon: {} mpg", format_number(mpg, 2));
    }
    println!(
        "Powertrain category: {}",
        efficiency_category(
            &vehicle.fuel_type,
            vehicle.alt_fuel.as_deref(),
            vehicle.co2_per_mile.unwrap_or(0.0)
        )
    );
}

fn project_stage(session: Session) {
    let Session::VehicleChosen { vehicle } = session else {
        return;
    };
    println!("\nEnergy consumption by distance");
    let Some(distance_km) = parse_f64_safe(Some(&prompt("Distance in kilometers"))) else {
        println!("Invalid distance.\n");
        return;
    };
    match project::project_record(&vehicle, distance_km) {
        Ok(p) => {
            println!(
                "Over {} km, the {} will use:",
                format_number(distance_km, 0),
                vehicle.display_name()
            );
            println!(
                "- {} liters of fuel (at {} km per liter)",
                format_number(p.fuel_used_liters, 2),
                format_number(p.km_per_liter, 2)
            );
            println!("- a total fuel cost of ${}", format_number(p.fuel_cost_total, 2));
            println!(
                "- emitting a total of {} grams of CO2\n",
                format_number(p.co2_total_grams, 2)
            );
        }
        Err(e) => println!("Cannot project consumption: {}\n", e),
    }
}

/// Handle option [4]: recommend a resale vehicle within a budget. The
/// head of the cost-descending ranking is the priciest affordable option.
fn handle_budget_recommendation() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.resale.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the datasets first (option 1).\n");
        return;
    };

    let Some(budget) = parse_f64_safe(Some(&prompt("Your budget (USD)"))) else {
        println!("Invalid budget.\n");
        return;
    };
    let filters = Filters {
        fuel_type: optional_filter(&prompt("Fuel type (or All)")),
        budget: Some(budget),
        ..Filters::default()
    };

    let selection: Selection = match select::select(&data, &filters, Ranking::CostDescending, 1) {
        Ok(sel) => sel,
        Err(e) => {
            println!("Recommendation failed: {}\n", e);
            return;
        }
    };
    if selection.status == SelectionStatus::NoMatch {
        println!(
            "No vehicles found within a budget of ${}.\n",
            format_number(budget, 2)
        );
        return;
    }

    let best = &selection.vehicles[0].record;
    println!("\nRecommended vehicle within ${}:", format_number(budget, 2));
    println!("- {}", best.display_name());
    if let Some(y) = best.year {
        println!("- Registered year: {}", y);
    }
    println!("- Fuel type: {}", best.fuel_type);
    println!("- Powertrain category: {}", cost_category(&best.fuel_type));
    if let Some(price) = best.cost {
        println!("- Resale price: ${}\n", format_number(price, 2));
    }
}

fn main() {
    loop {
        println!("Vehicle Cost & Efficiency Reports:");
        println!("[1] Load the datasets");
        println!("[2] Operating cost report");
        println!("[3] Efficiency recommendations");
        println!("[4] Budget recommendation\n");
        match read_choice().as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_cost_report();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!();
                handle_efficiency_recommendations();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "4" => {
                println!();
                handle_budget_recommendation();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter a number from 1 to 4.\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_filter_treats_all_and_blank_as_no_filter() {
        assert_eq!(optional_filter("All"), None);
        assert_eq!(optional_filter("all"), None);
        assert_eq!(optional_filter("  "), None);
        assert_eq!(optional_filter("Toyota"), Some("Toyota".to_string()));
    }

    #[test]
    fn year_filter_rejects_typos_instead_of_widening() {
        assert_eq!(year_filter("All"), Ok(None));
        assert_eq!(year_filter(""), Ok(None));
        assert_eq!(year_filter("2015"), Ok(Some(2015)));
        assert_eq!(year_filter("20x5"), Err("20x5".to_string()));
    }
}
