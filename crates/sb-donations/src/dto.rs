use super::*;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct NewDonation {
    pub food_item: String,
    pub description: Option<String>,
    pub quantity: String,
    pub images: Option<Vec<String>>,
    pub pickup_location_lat: f64,
    pub pickup_location_lon: f64,
    pub preferred_pickup_time: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "allergens")]
    pub allergens: Option<Vec<String>>,
    #[serde(default)]
    pub is_perishable: bool,
}

impl NewDonation {
    pub fn validate(&self) -> Result<(), DonationError> {
        text(&self.food_item, "food_item must not be empty")?;
        text(&self.quantity, "quantity must not be empty")?;
        coordinates(self.pickup_location_lat, self.pickup_location_lon)
    }
}

/// Partial update; absent fields keep their stored value. Nullable
/// fields distinguish absent (`None`) from an explicit `null`
/// (`Some(None)`), which clears them.
#[derive(Debug, Default, Deserialize)]
pub struct DonationPatch {
    pub food_item: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub quantity: Option<String>,
    pub images: Option<Vec<String>>,
    pub pickup_location_lat: Option<f64>,
    pub pickup_location_lon: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub preferred_pickup_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_timestamp")]
    pub expiration_date: Option<Option<OffsetDateTime>>,
    #[serde(default, deserialize_with = "allergens")]
    pub allergens: Option<Vec<String>>,
    pub is_perishable: Option<bool>,
    pub status: Option<Status>,
}

impl DonationPatch {
    pub fn validate(&self) -> Result<(), DonationError> {
        if let Some(ref food_item) = self.food_item {
            text(food_item, "food_item must not be empty")?;
        }
        if let Some(ref quantity) = self.quantity {
            text(quantity, "quantity must not be empty")?;
        }
        coordinates(
            self.pickup_location_lat.unwrap_or_default(),
            self.pickup_location_lon.unwrap_or_default(),
        )
    }
}

/// Offset pagination; `limit` is clamped to `1..=MAX_PAGE`.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "Page::max")]
    pub limit: i64,
}

pub const MAX_PAGE: i64 = 100;

impl Page {
    fn max() -> i64 {
        MAX_PAGE
    }
    pub fn skip(&self) -> i64 {
        self.skip.max(0)
    }
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: MAX_PAGE,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Upload {
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Uploaded {
    pub url: String,
    pub filename: String,
}

fn text(value: &str, reason: &'static str) -> Result<(), DonationError> {
    match value.trim().is_empty() {
        true => Err(DonationError::Invalid(reason)),
        false => Ok(()),
    }
}

fn coordinates(lat: f64, lon: f64) -> Result<(), DonationError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(DonationError::Invalid("pickup_location_lat out of range"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(DonationError::Invalid("pickup_location_lon out of range"));
    }
    Ok(())
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn nullable_timestamp<'de, D>(deserializer: D) -> Result<Option<Option<OffsetDateTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);
    nullable::<D, Timestamp>(deserializer).map(|t| t.map(|t| t.map(|Timestamp(at)| at)))
}

/// Allergens arrive either as a JSON list or as one comma-joined string.
fn allergens<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Allergens {
        List(Vec<String>),
        Joined(String),
    }
    Ok(Option::<Allergens>::deserialize(deserializer)?.map(|allergens| match allergens {
        Allergens::List(list) => list,
        Allergens::Joined(joined) => split(&joined),
    }))
}
