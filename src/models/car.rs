use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Fractional digits stored for `engine_capacity` (`NUMERIC(2,1)`).
pub const ENGINE_CAPACITY_SCALE: u32 = 1;
/// Fractional digits stored for `price` (`NUMERIC(12,2)`).
pub const PRICE_SCALE: u32 = 2;
/// Integer digits left for `engine_capacity` once the scale is taken.
pub const ENGINE_CAPACITY_INTEGER_DIGITS: u32 = 1;
/// Integer digits left for `price` once the scale is taken.
pub const PRICE_INTEGER_DIGITS: u32 = 10;

/// A car inventory record, mapped onto the `cars` table.
///
/// The same shape is used on the wire (camelCase JSON) and as the row type.
/// Integer attributes default to `0` when omitted from a payload, every other
/// optional attribute defaults to `null`, so an update always carries a full
/// replacement of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_decimal_precision"))]
pub struct Car {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(length(max = 100))]
    pub brand: String,
    #[validate(length(max = 100))]
    pub model: String,
    pub model_year: i32,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[serde(default)]
    #[validate(length(max = 15))]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub odometer: i32,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub fuel_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub transmission: Option<String>,
    #[serde(default)]
    pub horse_power: i32,
    #[serde(default)]
    pub engine_capacity: Option<Decimal>,
    #[serde(default)]
    pub number_of_doors: i32,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub body_type: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub owner: Option<String>,
}

impl Car {
    /// Minimal record with only the required attributes set.
    pub fn new(brand: impl Into<String>, model: impl Into<String>, model_year: i32) -> Self {
        Self {
            id: None,
            brand: brand.into(),
            model: model.into(),
            model_year,
            color: None,
            license_plate: None,
            odometer: 0,
            fuel_type: None,
            transmission: None,
            horse_power: 0,
            engine_capacity: None,
            number_of_doors: 0,
            body_type: None,
            price: None,
            manufacture_date: None,
            owner: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Rescales the decimal attributes to the precision the table stores.
    pub fn normalized(mut self) -> Self {
        self.engine_capacity = self
            .engine_capacity
            .map(|value| rescaled(value, ENGINE_CAPACITY_SCALE));
        self.price = self.price.map(|value| rescaled(value, PRICE_SCALE));
        self
    }

    /// First decimal attribute that would not fit its column after rescaling.
    pub fn out_of_range_field(&self) -> Option<&'static str> {
        let overflows = |value: Option<Decimal>, scale: u32, integer_digits: u32| {
            value.is_some_and(|value| {
                rescaled(value, scale).abs() >= Decimal::from(10_i64.pow(integer_digits))
            })
        };

        if overflows(
            self.engine_capacity,
            ENGINE_CAPACITY_SCALE,
            ENGINE_CAPACITY_INTEGER_DIGITS,
        ) {
            Some("engine_capacity")
        } else if overflows(self.price, PRICE_SCALE, PRICE_INTEGER_DIGITS) {
            Some("price")
        } else {
            None
        }
    }
}

fn rescaled(mut value: Decimal, scale: u32) -> Decimal {
    value.rescale(scale);
    value
}

fn validate_decimal_precision(car: &Car) -> Result<(), ValidationError> {
    match car.out_of_range_field() {
        Some(field) => {
            let mut error = ValidationError::new("decimal_precision");
            error.message = Some(format!("{field} exceeds the stored precision").into());
            Err(error)
        }
        None => Ok(()),
    }
}
