// Per-vehicle consumption projection over a user-supplied distance.
//
// The conversion constants are fixed for output compatibility with the
// figures the dashboards have always shown; do not "improve" their
// precision.
use crate::error::EngineError;
use crate::types::VehicleRecord;

/// Kilometers per liter obtained from one mile per US gallon.
pub const KM_PER_LITER_PER_MPG: f64 = 0.425144;
/// Miles in a kilometer's worth of CO2 conversion.
pub const MILES_PER_KM: f64 = 1.60934;

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub km_per_liter: f64,
    pub fuel_used_liters: f64,
    pub fuel_cost_total: f64,
    pub co2_total_grams: f64,
}

/// Project fuel use, fuel cost, and CO2 emissions for `distance_km`.
///
/// Fails explicitly instead of leaking Infinity or NaN: a zero-mpg vehicle
/// cannot be projected (`DivisionByZero`), and negative distances or
/// negative efficiency figures are rejected as `InvalidInput`.
pub fn project(
    mpg: f64,
    co2_per_mile: f64,
    fuel_cost: f64,
    distance_km: f64,
) -> Result<Projection, EngineError> {
    if distance_km < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "distance must be >= 0 km, got {}",
            distance_km
        )));
    }
    if mpg < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "mpg must be >= 0, got {}",
            mpg
        )));
    }
    if mpg == 0.0 {
        return Err(EngineError::DivisionByZero("fuel use of a zero-mpg vehicle"));
    }
    let km_per_liter = mpg * KM_PER_LITER_PER_MPG;
    let co2_per_km = co2_per_mile / MILES_PER_KM;
    let fuel_used_liters = distance_km / km_per_liter;
    Ok(Projection {
        km_per_liter,
        fuel_used_liters,
        fuel_cost_total: fuel_used_liters * fuel_cost,
        co2_total_grams: distance_km * co2_per_km,
    })
}

/// [`project`] applied to a record; missing figures on the record are
/// `InvalidInput`.
pub fn project_record(record: &VehicleRecord, distance_km: f64) -> Result<Projection, EngineError> {
    let missing = |field: &str| {
        EngineError::InvalidInput(format!("'{}' has no {}", record.display_name(), field))
    };
    let mpg = record.mpg.ok_or_else(|| missing("mpg figure"))?;
    let co2 = record.co2_per_mile.ok_or_else(|| missing("CO2 figure"))?;
    let fuel_cost = record.fuel_cost.ok_or_else(|| missing("fuel cost"))?;
    project(mpg, co2, fuel_cost, distance_km)
}
