use super::*;
use sb_auth::Member;
use sb_core::ID;
use sb_core::Unique;
use std::collections::BTreeMap;
use std::sync::RwLock;
use time::OffsetDateTime;

/// In-process [`Donations`] store for tests and local runs without PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryDonations {
    rows: RwLock<BTreeMap<ID<Donation>, Donation>>,
}

impl MemoryDonations {
    fn page<F>(&self, page: &Page, keep: F) -> Vec<Donation>
    where
        F: Fn(&Donation) -> bool,
    {
        let mut rows = self
            .rows
            .read()
            .expect("donations lock")
            .values()
            .filter(|d| keep(d))
            .cloned()
            .collect::<Vec<_>>();
        rows.sort_by_key(|d| (d.created_at, d.id()));
        rows.into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .collect()
    }
}

#[async_trait::async_trait]
impl Donations for MemoryDonations {
    async fn insert(&self, donation: &Donation) -> Result<(), DonationError> {
        self.rows
            .write()
            .expect("donations lock")
            .insert(donation.id(), donation.clone());
        Ok(())
    }
    async fn find(&self, id: ID<Donation>) -> Result<Option<Donation>, DonationError> {
        Ok(self.rows.read().expect("donations lock").get(&id).cloned())
    }
    async fn list(&self, page: &Page) -> Result<Vec<Donation>, DonationError> {
        Ok(self.page(page, |_| true))
    }
    async fn donated_by(&self, donor: ID<Member>, page: &Page) -> Result<Vec<Donation>, DonationError> {
        Ok(self.page(page, |d| d.donor_id == donor))
    }
    async fn claimed_by(&self, claimant: ID<Member>, page: &Page) -> Result<Vec<Donation>, DonationError> {
        Ok(self.page(page, |d| d.claimant_id == Some(claimant)))
    }
    async fn update(&self, donation: &Donation, read: Status) -> Result<Option<Donation>, DonationError> {
        let mut rows = self.rows.write().expect("donations lock");
        Ok(rows
            .get_mut(&donation.id())
            .filter(|d| d.status == read)
            .map(|d| {
                *d = Donation {
                    claimant_id: d.claimant_id,
                    ..donation.clone()
                };
                d.clone()
            }))
    }
    async fn delete(&self, id: ID<Donation>) -> Result<Option<Donation>, DonationError> {
        Ok(self.rows.write().expect("donations lock").remove(&id))
    }
    async fn claim(
        &self,
        id: ID<Donation>,
        claimant: ID<Member>,
        at: OffsetDateTime,
    ) -> Result<Option<Donation>, DonationError> {
        let mut rows = self.rows.write().expect("donations lock");
        Ok(rows
            .get_mut(&id)
            .filter(|d| d.status == Status::Available)
            .map(|d| {
                d.status = Status::Claimed;
                d.claimant_id = Some(claimant);
                d.updated_at = Some(at);
                d.clone()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(donor: ID<Member>) -> Donation {
        let listing = serde_json::from_value(serde_json::json!({
            "food_item": "apples",
            "quantity": "5kg",
            "pickup_location_lat": 1.0,
            "pickup_location_lon": 2.0,
        }))
        .unwrap();
        Donation::new(donor, listing, OffsetDateTime::now_utc())
    }

    #[tokio::test]
    async fn claim_happens_once() {
        let store = MemoryDonations::default();
        let donation = listing(ID::default());
        store.insert(&donation).await.unwrap();
        let first = ID::default();
        let claimed = store
            .claim(donation.id(), first, OffsetDateTime::now_utc())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(claimed.status, Status::Claimed);
        assert_eq!(claimed.claimant_id, Some(first));
        let second = store
            .claim(donation.id(), ID::default(), OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert_eq!(second, None);
        assert_eq!(store.claimed_by(first, &Page::default()).await.unwrap(), vec![claimed]);
    }

    #[tokio::test]
    async fn stale_edit_does_not_undo_a_claim() {
        let store = MemoryDonations::default();
        let donation = listing(ID::default());
        store.insert(&donation).await.unwrap();
        let stale = store.find(donation.id()).await.unwrap().unwrap();
        let claimant = ID::default();
        store
            .claim(donation.id(), claimant, OffsetDateTime::now_utc())
            .await
            .unwrap()
            .unwrap();
        let patch = DonationPatch {
            quantity: Some("2kg".into()),
            ..DonationPatch::default()
        };
        let edited = stale.clone().patch(patch, OffsetDateTime::now_utc());
        assert_eq!(store.update(&edited, stale.status).await.unwrap(), None);
        let stored = store.find(donation.id()).await.unwrap().unwrap();
        assert_eq!(stored.status, Status::Claimed);
        assert_eq!(stored.claimant_id, Some(claimant));
        assert_eq!(stored.quantity, "5kg");
    }

    #[tokio::test]
    async fn edit_keeps_the_claimant() {
        let store = MemoryDonations::default();
        let donation = listing(ID::default());
        store.insert(&donation).await.unwrap();
        let claimant = ID::default();
        let claimed = store
            .claim(donation.id(), claimant, OffsetDateTime::now_utc())
            .await
            .unwrap()
            .unwrap();
        let patch = DonationPatch {
            status: Some(Status::PickedUp),
            ..DonationPatch::default()
        };
        let mut edited = claimed.clone().patch(patch, OffsetDateTime::now_utc());
        edited.claimant_id = None;
        let stored = store.update(&edited, claimed.status).await.unwrap().unwrap();
        assert_eq!(stored.status, Status::PickedUp);
        assert_eq!(stored.claimant_id, Some(claimant));
    }

    #[tokio::test]
    async fn pages_filter_by_donor() {
        let store = MemoryDonations::default();
        let donor = ID::default();
        for _ in 0..3 {
            store.insert(&listing(donor)).await.unwrap();
        }
        store.insert(&listing(ID::default())).await.unwrap();
        assert_eq!(store.list(&Page::default()).await.unwrap().len(), 4);
        assert_eq!(store.donated_by(donor, &Page::default()).await.unwrap().len(), 3);
        let page = Page { skip: 2, limit: 5 };
        assert_eq!(store.donated_by(donor, &page).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_returns_removed_row() {
        let store = MemoryDonations::default();
        let donation = listing(ID::default());
        store.insert(&donation).await.unwrap();
        assert_eq!(store.delete(donation.id()).await.unwrap(), Some(donation.clone()));
        assert_eq!(store.delete(donation.id()).await.unwrap(), None);
        assert_eq!(store.find(donation.id()).await.unwrap(), None);
    }
}
