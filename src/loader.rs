use crate::schema::Schema;
use crate::types::VehicleRecord;
use crate::util::{parse_f64_safe, parse_i32_safe};
use csv::ReaderBuilder;
use std::error::Error;
use std::io;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows kept despite one or more configured numeric columns failing to
    /// parse; the affected fields stay `None`.
    pub incomplete_rows: usize,
    /// Rows the CSV reader could not decode at all. These are skipped.
    pub parse_errors: usize,
}

/// Load a dataset from `path`, resolving columns through `schema`.
pub fn load_records(path: &str, schema: &Schema) -> Result<(Vec<VehicleRecord>, LoadReport), Box<dyn Error>> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    read_records(rdr, schema)
}

fn read_records<R: io::Read>(
    mut rdr: csv::Reader<R>,
    schema: &Schema,
) -> Result<(Vec<VehicleRecord>, LoadReport), Box<dyn Error>> {
    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    // The identity and fuel columns are mandatory; a dataset that lacks them
    // cannot be classified at all.
    let manuf_idx = position(schema.manufacturer)
        .ok_or_else(|| format!("missing column '{}'", schema.manufacturer))?;
    let fuel_idx = position(schema.fuel_type)
        .ok_or_else(|| format!("missing column '{}'", schema.fuel_type))?;
    let model_idx = schema.model.and_then(position);
    let year_idx = schema.year.and_then(position);
    let alt_fuel_idx = schema.alt_fuel.and_then(position);
    let cost_idx = schema.cost.and_then(position);
    let mpg_idx = schema.mpg.and_then(position);
    let co2_idx = schema.co2_per_mile.and_then(position);
    let fuel_cost_idx = schema.fuel_cost.and_then(position);

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut incomplete_rows = 0usize;
    let mut records: Vec<VehicleRecord> = Vec::new();

    for result in rdr.records() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        let field = |idx: Option<usize>| idx.and_then(|i| row.get(i));

        let mut incomplete = false;
        let mut numeric = |idx: Option<usize>| -> Option<f64> {
            let raw = field(idx)?;
            let v = parse_f64_safe(Some(raw));
            if v.is_none() && !raw.trim().is_empty() {
                incomplete = true;
            }
            v
        };

        let cost = numeric(cost_idx);
        let mpg = numeric(mpg_idx);
        let co2_per_mile = numeric(co2_idx);
        let fuel_cost = numeric(fuel_cost_idx);

        let manufacturer = row
            .get(manuf_idx)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let model = field(model_idx)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let fuel_type = row
            .get(fuel_idx)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let alt_fuel = field(alt_fuel_idx)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let year = parse_i32_safe(field(year_idx));

        if incomplete {
            incomplete_rows += 1;
        }
        records.push(VehicleRecord {
            manufacturer,
            model,
            year,
            fuel_type,
            alt_fuel,
            cost,
            mpg,
            co2_per_mile,
            fuel_cost,
        });
    }

    let loaded_rows = records.len();
    let report = LoadReport {
        total_rows,
        loaded_rows,
        incomplete_rows,
        parse_errors,
    };
    Ok((records, report))
}

/// Row window applied to the efficiency dataset before any analysis:
/// model years 2011 and newer, a sane (non-negative) CO2 reading, and the
/// remaining scoring figures (mpg, fuel cost) present. Rows that could
/// never be scored are dropped here instead of failing a later selection.
pub fn efficiency_window(records: Vec<VehicleRecord>) -> Vec<VehicleRecord> {
    records
        .into_iter()
        .filter(|r| matches!(r.year, Some(y) if y > 2010))
        .filter(|r| matches!(r.co2_per_mile, Some(c) if c >= 0.0))
        .filter(|r| r.mpg.is_some() && r.fuel_cost.is_some())
        .collect()
}
