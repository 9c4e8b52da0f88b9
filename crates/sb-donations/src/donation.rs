use super::*;
use sb_auth::Member;
use sb_core::ID;
use sb_core::Unique;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

/// Lifecycle of a listing. Only `Available` listings can be claimed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Available,
    Claimed,
    PickedUp,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Claimed => "claimed",
            Self::PickedUp => "picked_up",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = DonationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "claimed" => Ok(Self::Claimed),
            "picked_up" => Ok(Self::PickedUp),
            other => Err(DonationError::Corrupt(format!("unknown donation status {}", other))),
        }
    }
}

/// A food listing offered by a donor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Donation {
    pub id: ID<Self>,
    pub food_item: String,
    pub description: Option<String>,
    pub quantity: String,
    pub images: Vec<String>,
    pub pickup_location_lat: f64,
    pub pickup_location_lon: f64,
    pub preferred_pickup_time: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    pub allergens: Vec<String>,
    pub is_perishable: bool,
    pub status: Status,
    pub donor_id: ID<Member>,
    pub claimant_id: Option<ID<Member>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Unique for Donation {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Donation {
    pub fn new(donor: ID<Member>, listing: NewDonation, now: OffsetDateTime) -> Self {
        Self {
            id: ID::default(),
            food_item: listing.food_item,
            description: listing.description,
            quantity: listing.quantity,
            images: listing.images.unwrap_or_default(),
            pickup_location_lat: listing.pickup_location_lat,
            pickup_location_lon: listing.pickup_location_lon,
            preferred_pickup_time: listing.preferred_pickup_time,
            expiration_date: listing.expiration_date,
            allergens: listing.allergens.unwrap_or_default(),
            is_perishable: listing.is_perishable,
            status: Status::Available,
            donor_id: donor,
            claimant_id: None,
            created_at: now,
            updated_at: None,
        }
    }

    /// Applies only the fields present in the patch.
    pub fn patch(self, patch: DonationPatch, now: OffsetDateTime) -> Self {
        Self {
            food_item: patch.food_item.unwrap_or(self.food_item),
            description: patch.description.unwrap_or(self.description),
            quantity: patch.quantity.unwrap_or(self.quantity),
            images: patch.images.unwrap_or(self.images),
            pickup_location_lat: patch.pickup_location_lat.unwrap_or(self.pickup_location_lat),
            pickup_location_lon: patch.pickup_location_lon.unwrap_or(self.pickup_location_lon),
            preferred_pickup_time: patch.preferred_pickup_time.unwrap_or(self.preferred_pickup_time),
            expiration_date: patch.expiration_date.unwrap_or(self.expiration_date),
            allergens: patch.allergens.unwrap_or(self.allergens),
            is_perishable: patch.is_perishable.unwrap_or(self.is_perishable),
            status: patch.status.unwrap_or(self.status),
            updated_at: Some(now),
            ..self
        }
    }

    pub fn owned_by(&self, member: ID<Member>) -> bool {
        self.donor_id == member
    }
}

/// Splits the stored comma-joined form, tolerating a `{a,b}` wrapper.
pub fn split(joined: &str) -> Vec<String> {
    joined
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use sb_pg::*;

    impl Schema for Donation {
        fn name() -> &'static str {
            DONATIONS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                DONATIONS,
                " (
                    id                    UUID PRIMARY KEY,
                    food_item             TEXT NOT NULL,
                    description           TEXT,
                    quantity              TEXT NOT NULL,
                    images                TEXT,
                    pickup_location_lat   DOUBLE PRECISION NOT NULL,
                    pickup_location_lon   DOUBLE PRECISION NOT NULL,
                    preferred_pickup_time TEXT,
                    expiration_date       TIMESTAMPTZ,
                    allergens             TEXT,
                    is_perishable         BOOLEAN NOT NULL DEFAULT FALSE,
                    status                VARCHAR(16) NOT NULL DEFAULT 'available',
                    donor_id              UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    claimant_id           UUID REFERENCES ",
                USERS,
                "(id) ON DELETE SET NULL,
                    created_at            TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at            TIMESTAMPTZ
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_donations_food_item ON ",
                DONATIONS,
                " (food_item);
                 CREATE INDEX IF NOT EXISTS idx_donations_donor ON ",
                DONATIONS,
                " (donor_id);
                 CREATE INDEX IF NOT EXISTS idx_donations_claimant ON ",
                DONATIONS,
                " (claimant_id) WHERE claimant_id IS NOT NULL;"
            )
        }
    }
}
