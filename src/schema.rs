// Field-name configuration for the datasets.
//
// Column names vary per dataset (`Manuf` vs `Manufacturer`, `Total_Cost` vs
// `Resale_Price`), so the loader resolves them at runtime from a `Schema`
// instead of baking one set of headers into the record type.

/// Maps the engine's logical fields to the column names of one dataset.
/// Columns the dataset does not carry are `None`; the corresponding record
/// fields stay unset.
#[derive(Debug, Clone)]
pub struct Schema {
    pub manufacturer: &'static str,
    pub model: Option<&'static str>,
    pub year: Option<&'static str>,
    pub fuel_type: &'static str,
    pub alt_fuel: Option<&'static str>,
    pub cost: Option<&'static str>,
    pub mpg: Option<&'static str>,
    pub co2_per_mile: Option<&'static str>,
    pub fuel_cost: Option<&'static str>,
}

impl Schema {
    /// Operating-cost dataset (`costo_operacional_vehiculos`).
    pub fn operating_cost() -> Schema {
        Schema {
            manufacturer: "Manuf",
            model: Some("Model"),
            year: None,
            fuel_type: "Fuel_Type",
            alt_fuel: None,
            cost: Some("Total_Cost"),
            mpg: None,
            co2_per_mile: None,
            fuel_cost: Some("Fuel_Cost"),
        }
    }

    /// Federal efficiency dataset (`Df_vfed`).
    pub fn efficiency() -> Schema {
        Schema {
            manufacturer: "Manufacturer",
            model: Some("Model"),
            year: Some("Year"),
            fuel_type: "Fuel",
            alt_fuel: Some("Alternative Fuel"),
            cost: None,
            mpg: Some("Miles per gallon (mpg)"),
            co2_per_mile: Some("CO2 (p/mile)"),
            fuel_cost: Some("FuelCost"),
        }
    }

    /// Resale-price dataset (`car_resale_prices`). `Full_Name` already
    /// contains make and model, so it doubles as the manufacturer field.
    pub fn resale() -> Schema {
        Schema {
            manufacturer: "Full_Name",
            model: None,
            year: Some("Registered_Year"),
            fuel_type: "Fuel_Type",
            alt_fuel: None,
            cost: Some("Resale_Price"),
            mpg: None,
            co2_per_mile: None,
            fuel_cost: None,
        }
    }
}
