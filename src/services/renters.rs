//! Renter administration (CRUD and the admin override path)

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::renter::{CreateRenter, Renter, RenterStatus, UpdateRenter},
    repository::Repository,
    store::encode_fields,
};

#[derive(Clone)]
pub struct RentersService {
    repository: Repository,
}

impl RentersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Renter>> {
        self.repository.renters.list().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Renter> {
        self.repository.renters.get_by_id(id).await
    }

    /// Record a renter by hand. Inventory is left alone.
    pub async fn create(&self, data: CreateRenter) -> AppResult<Renter> {
        data.validate()?;
        if data.end_date < data.start_date {
            return Err(AppError::Validation(
                "endDate cannot be before startDate".to_string(),
            ));
        }

        let renter = Renter {
            id: Uuid::new_v4().to_string(),
            name: data.name.trim().to_string(),
            phone: data.phone,
            start_date: data.start_date,
            end_date: data.end_date,
            items: data.items,
            status: data.status.unwrap_or(RenterStatus::Active),
            total_amount: data.total_amount,
            ktp_image_url: data.ktp_image_url,
            notes: data.notes,
            created_at: Utc::now(),
        };
        self.repository.renters.insert(&renter).await?;

        tracing::info!("Created renter {} ({})", renter.name, renter.id);
        Ok(renter)
    }

    /// Admin edit: overwrites provided fields without inventory or profit
    /// side effects. Status changes still follow the state machine and are
    /// applied with a compare-and-set so they cannot race a return.
    pub async fn update(&self, id: &str, data: UpdateRenter) -> AppResult<Renter> {
        data.validate()?;
        let current = self.repository.renters.get_by_id(id).await?;

        if let Some(next) = data.status {
            if !current.status.can_transition_to(next) {
                return Err(AppError::InvalidState(format!(
                    "Renter is {} and cannot become {}",
                    current.status, next
                )));
            }
            if next != current.status
                && !self
                    .repository
                    .renters
                    .transition_status(id, current.status, next)
                    .await?
            {
                return Err(AppError::InvalidState(
                    "Renter status changed concurrently".to_string(),
                ));
            }
            if next != current.status {
                tracing::info!("Renter {} moved {} -> {} by admin edit", id, current.status, next);
            }
        }

        let fields = encode_fields(&data)?
            .into_iter()
            .filter(|(field, _)| field != "status")
            .collect();
        self.repository.renters.update_fields(id, fields).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.renters.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::renter::RentedItem;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn service() -> RentersService {
        RentersService::new(Repository::new(Arc::new(MemoryStore::new())))
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn walk_in() -> CreateRenter {
        CreateRenter {
            name: "Budi".to_string(),
            phone: "0812".to_string(),
            start_date: date(1),
            end_date: date(3),
            items: vec![RentedItem::named("Dome Tent")],
            status: None,
            total_amount: 100_000,
            ktp_image_url: None,
            notes: Some("walk-in".to_string()),
        }
    }

    #[tokio::test]
    async fn create_defaults_to_active() {
        let service = service();
        let renter = service.create(walk_in()).await.unwrap();
        assert_eq!(renter.status, RenterStatus::Active);

        let fetched = service.get_by_id(&renter.id).await.unwrap();
        assert_eq!(fetched.items, vec![RentedItem::named("Dome Tent")]);
        assert_eq!(fetched.notes.as_deref(), Some("walk-in"));
    }

    #[tokio::test]
    async fn edit_keeps_untouched_fields() {
        let service = service();
        let renter = service.create(walk_in()).await.unwrap();

        let updated = service
            .update(
                &renter.id,
                UpdateRenter {
                    phone: Some("0899".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone, "0899");
        assert_eq!(updated.name, "Budi");
        assert_eq!(updated.total_amount, 100_000);
    }

    #[tokio::test]
    async fn cancelled_is_terminal() {
        let service = service();
        let renter = service.create(walk_in()).await.unwrap();

        let cancelled = service
            .update(
                &renter.id,
                UpdateRenter {
                    status: Some(RenterStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cancelled.status, RenterStatus::Cancelled);

        let err = service
            .update(
                &renter.id,
                UpdateRenter {
                    status: Some(RenterStatus::Active),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn missing_renter_is_not_found() {
        let service = service();
        let err = service
            .update("nope", UpdateRenter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(
            service.delete("nope").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
