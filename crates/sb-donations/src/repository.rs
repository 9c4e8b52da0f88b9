use super::*;
use sb_auth::Member;
use sb_core::ID;
use time::OffsetDateTime;

/// Persistence seam for donation listings.
#[async_trait::async_trait]
pub trait Donations: Send + Sync {
    async fn insert(&self, donation: &Donation) -> Result<(), DonationError>;
    async fn find(&self, id: ID<Donation>) -> Result<Option<Donation>, DonationError>;
    async fn list(&self, page: &Page) -> Result<Vec<Donation>, DonationError>;
    async fn donated_by(&self, donor: ID<Member>, page: &Page) -> Result<Vec<Donation>, DonationError>;
    async fn claimed_by(&self, claimant: ID<Member>, page: &Page) -> Result<Vec<Donation>, DonationError>;
    /// Writes the editable fields of a listing whose status is still
    /// `read`. Returns `None` when the row is gone or its status moved on,
    /// so a concurrent claim is never overwritten. The claimant is never
    /// written here.
    async fn update(&self, donation: &Donation, read: Status) -> Result<Option<Donation>, DonationError>;
    async fn delete(&self, id: ID<Donation>) -> Result<Option<Donation>, DonationError>;
    /// Moves an available listing to claimed in one step. Returns `None`
    /// when the listing is missing or was no longer available.
    async fn claim(
        &self,
        id: ID<Donation>,
        claimant: ID<Member>,
        at: OffsetDateTime,
    ) -> Result<Option<Donation>, DonationError>;
}

#[cfg(feature = "database")]
mod postgres {
    use super::*;
    use sb_core::Unique;
    use sb_pg::*;
    use std::sync::Arc;
    use tokio_postgres::Client;
    use tokio_postgres::Row;

    const COLUMNS: &str = "id, food_item, description, quantity, images, \
        pickup_location_lat, pickup_location_lon, preferred_pickup_time, expiration_date, \
        allergens, is_perishable, status, donor_id, claimant_id, created_at, updated_at";

    fn donation(row: &Row) -> Result<Donation, DonationError> {
        Ok(Donation {
            id: ID::from(row.get::<_, uuid::Uuid>(0)),
            food_item: row.get(1),
            description: row.get(2),
            quantity: row.get(3),
            images: row
                .get::<_, Option<String>>(4)
                .map(|joined| split(&joined))
                .unwrap_or_default(),
            pickup_location_lat: row.get(5),
            pickup_location_lon: row.get(6),
            preferred_pickup_time: row.get(7),
            expiration_date: row.get(8),
            allergens: row
                .get::<_, Option<String>>(9)
                .map(|joined| split(&joined))
                .unwrap_or_default(),
            is_perishable: row.get(10),
            status: row.get::<_, &str>(11).parse()?,
            donor_id: ID::from(row.get::<_, uuid::Uuid>(12)),
            claimant_id: row.get::<_, Option<uuid::Uuid>>(13).map(ID::from),
            created_at: row.get(14),
            updated_at: row.get(15),
        })
    }

    fn donations(rows: Vec<Row>) -> Result<Vec<Donation>, DonationError> {
        rows.iter().map(donation).collect()
    }

    /// Lists are stored comma-joined; an empty list is stored as NULL.
    fn join(items: &[String]) -> Option<String> {
        match items.is_empty() {
            true => None,
            false => Some(items.join(",")),
        }
    }

    #[async_trait::async_trait]
    impl Donations for Arc<Client> {
        async fn insert(&self, donation: &Donation) -> Result<(), DonationError> {
            self.execute(
                const_format::concatcp!(
                    "INSERT INTO ",
                    DONATIONS,
                    " (",
                    COLUMNS,
                    ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
                ),
                &[
                    &donation.id().inner(),
                    &donation.food_item,
                    &donation.description,
                    &donation.quantity,
                    &join(&donation.images),
                    &donation.pickup_location_lat,
                    &donation.pickup_location_lon,
                    &donation.preferred_pickup_time,
                    &donation.expiration_date,
                    &join(&donation.allergens),
                    &donation.is_perishable,
                    &donation.status.as_str(),
                    &donation.donor_id.inner(),
                    &donation.claimant_id.map(|id| id.inner()),
                    &donation.created_at,
                    &donation.updated_at,
                ],
            )
            .await?;
            Ok(())
        }

        async fn find(&self, id: ID<Donation>) -> Result<Option<Donation>, DonationError> {
            self.query_opt(
                const_format::concatcp!("SELECT ", COLUMNS, " FROM ", DONATIONS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await?
            .as_ref()
            .map(donation)
            .transpose()
        }

        async fn list(&self, page: &Page) -> Result<Vec<Donation>, DonationError> {
            donations(
                self.query(
                    const_format::concatcp!(
                        "SELECT ",
                        COLUMNS,
                        " FROM ",
                        DONATIONS,
                        " ORDER BY created_at, id OFFSET $1 LIMIT $2"
                    ),
                    &[&page.skip(), &page.limit()],
                )
                .await?,
            )
        }

        async fn donated_by(&self, donor: ID<Member>, page: &Page) -> Result<Vec<Donation>, DonationError> {
            donations(
                self.query(
                    const_format::concatcp!(
                        "SELECT ",
                        COLUMNS,
                        " FROM ",
                        DONATIONS,
                        " WHERE donor_id = $1 ORDER BY created_at, id OFFSET $2 LIMIT $3"
                    ),
                    &[&donor.inner(), &page.skip(), &page.limit()],
                )
                .await?,
            )
        }

        async fn claimed_by(&self, claimant: ID<Member>, page: &Page) -> Result<Vec<Donation>, DonationError> {
            donations(
                self.query(
                    const_format::concatcp!(
                        "SELECT ",
                        COLUMNS,
                        " FROM ",
                        DONATIONS,
                        " WHERE claimant_id = $1 ORDER BY created_at, id OFFSET $2 LIMIT $3"
                    ),
                    &[&claimant.inner(), &page.skip(), &page.limit()],
                )
                .await?,
            )
        }

        async fn update(&self, listing: &Donation, read: Status) -> Result<Option<Donation>, DonationError> {
            self.query_opt(
                const_format::concatcp!(
                    "UPDATE ",
                    DONATIONS,
                    " SET food_item = $3, description = $4, quantity = $5, images = $6,
                          pickup_location_lat = $7, pickup_location_lon = $8,
                          preferred_pickup_time = $9, expiration_date = $10, allergens = $11,
                          is_perishable = $12, status = $13, updated_at = $14
                      WHERE id = $1 AND status = $2
                      RETURNING ",
                    COLUMNS
                ),
                &[
                    &listing.id().inner(),
                    &read.as_str(),
                    &listing.food_item,
                    &listing.description,
                    &listing.quantity,
                    &join(&listing.images),
                    &listing.pickup_location_lat,
                    &listing.pickup_location_lon,
                    &listing.preferred_pickup_time,
                    &listing.expiration_date,
                    &join(&listing.allergens),
                    &listing.is_perishable,
                    &listing.status.as_str(),
                    &listing.updated_at,
                ],
            )
            .await?
            .as_ref()
            .map(donation)
            .transpose()
        }

        async fn delete(&self, id: ID<Donation>) -> Result<Option<Donation>, DonationError> {
            self.query_opt(
                const_format::concatcp!(
                    "DELETE FROM ",
                    DONATIONS,
                    " WHERE id = $1 RETURNING ",
                    COLUMNS
                ),
                &[&id.inner()],
            )
            .await?
            .as_ref()
            .map(donation)
            .transpose()
        }

        async fn claim(
            &self,
            id: ID<Donation>,
            claimant: ID<Member>,
            at: OffsetDateTime,
        ) -> Result<Option<Donation>, DonationError> {
            self.query_opt(
                const_format::concatcp!(
                    "UPDATE ",
                    DONATIONS,
                    " SET claimant_id = $2, status = 'claimed', updated_at = $3
                      WHERE id = $1 AND status = 'available'
                      RETURNING ",
                    COLUMNS
                ),
                &[&id.inner(), &claimant.inner(), &at],
            )
            .await?
            .as_ref()
            .map(donation)
            .transpose()
        }
    }
}
