//! Rental lifecycle: booking creation and equipment return.
//!
//! These are the only operations that change several records together.
//! Stock moves through the store's atomic unit take/restore, and a return
//! claims the booking with a compare-and-set on its status before touching
//! inventory or the profit ledger, so concurrent returns of one booking
//! credit profit once.

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    cache::ResponseCache,
    error::{AppError, AppResult},
    models::{
        equipment::Equipment,
        profit::ProfitEntry,
        renter::{CreateBooking, RentedItem, Renter, RenterStatus},
    },
    repository::Repository,
    store::CounterOutcome,
};

use super::cache_keys;

/// What a successful return did
#[derive(Debug, Clone)]
pub struct ReturnOutcome {
    pub renter: Renter,
    pub profit: ProfitEntry,
    /// Units put back into `available`
    pub restored_units: u32,
    /// Items that matched no equipment record
    pub unmatched_items: Vec<String>,
}

#[derive(Clone)]
pub struct RentalsService {
    repository: Repository,
    cache: ResponseCache,
}

impl RentalsService {
    pub fn new(repository: Repository, cache: ResponseCache) -> Self {
        Self { repository, cache }
    }

    /// Book one unit of each referenced equipment and record the renter.
    pub async fn create_booking(&self, booking: CreateBooking) -> AppResult<Renter> {
        booking.validate()?;
        let days = booking.duration_days();
        if days <= 0 {
            return Err(AppError::Validation(
                "endDate must be after startDate".to_string(),
            ));
        }

        // Unknown or sold-out ids fail before any stock is taken
        let mut equipment: Vec<Equipment> = Vec::with_capacity(booking.equipment_ids.len());
        for id in &booking.equipment_ids {
            let item = self.repository.equipment.get_by_id(id).await?;
            if !item.is_rentable() {
                return Err(AppError::NotAvailable(format!("{} is not available", item.name)));
            }
            equipment.push(item);
        }

        let daily_rate: u64 = equipment.iter().map(|e| e.price).sum();
        let total_amount = daily_rate.saturating_mul(days as u64);

        let mut taken: Vec<&str> = Vec::with_capacity(equipment.len());
        for item in &equipment {
            let outcome = self.repository.equipment.take_unit(&item.id).await;
            match outcome {
                Ok(CounterOutcome::Changed { from, to }) => {
                    debug!("Booked {}: available {} -> {}", item.name, from, to);
                    taken.push(&item.id);
                }
                Ok(CounterOutcome::Exhausted) => {
                    self.release(&taken).await;
                    return Err(AppError::NotAvailable(format!(
                        "{} is not available",
                        item.name
                    )));
                }
                Ok(CounterOutcome::Missing) => {
                    self.release(&taken).await;
                    return Err(AppError::NotFound(format!("Equipment {} not found", item.id)));
                }
                Err(e) => {
                    self.release(&taken).await;
                    return Err(e);
                }
            }
        }

        let renter = Renter {
            id: Uuid::new_v4().to_string(),
            name: booking.name.trim().to_string(),
            phone: booking.phone,
            start_date: booking.start_date,
            end_date: booking.end_date,
            items: equipment
                .iter()
                .map(|e| RentedItem {
                    equipment_id: Some(e.id.clone()),
                    name: e.name.clone(),
                })
                .collect(),
            status: RenterStatus::Active,
            total_amount,
            ktp_image_url: booking.ktp_image_url,
            notes: booking.notes,
            created_at: Utc::now(),
        };

        if let Err(e) = self.repository.renters.insert(&renter).await {
            warn!(
                "Recording booking for {} failed after stock was taken, releasing {} unit(s)",
                renter.name,
                taken.len()
            );
            self.release(&taken).await;
            self.cache.invalidate(Some(cache_keys::EQUIPMENT)).await;
            return Err(e);
        }

        self.cache.invalidate(Some(cache_keys::EQUIPMENT)).await;
        info!(
            "Booking {} created for {} ({} day(s), total {})",
            renter.id, renter.name, days, total_amount
        );
        Ok(renter)
    }

    /// Put back units taken for a booking that could not be completed
    async fn release(&self, equipment_ids: &[&str]) {
        for id in equipment_ids {
            if let Err(e) = self.repository.equipment.restore_unit(id).await {
                error!("Failed to release a unit of equipment {}: {}", id, e);
            }
        }
    }

    /// Close an active booking: restore inventory and credit its total to
    /// the profit ledger.
    pub async fn return_equipment(&self, renter_id: &str) -> AppResult<ReturnOutcome> {
        let renter = self.repository.renters.get_by_id(renter_id).await?;
        if renter.status != RenterStatus::Active {
            return Err(AppError::InvalidState("Rental is not active".to_string()));
        }

        // Claim the booking; a concurrent return loses here and writes nothing
        let claimed = self
            .repository
            .renters
            .transition_status(renter_id, RenterStatus::Active, RenterStatus::Completed)
            .await?;
        if !claimed {
            return Err(AppError::InvalidState("Rental is not active".to_string()));
        }

        let mut restored: Vec<String> = Vec::new();
        match self.settle(&renter, &mut restored).await {
            Ok((profit, unmatched_items)) => {
                self.cache.invalidate(Some(cache_keys::EQUIPMENT)).await;
                self.cache.invalidate(Some(cache_keys::PROFIT)).await;
                info!(
                    "Renter {} returned {} unit(s), profit {} added",
                    renter_id,
                    restored.len(),
                    profit.amount
                );
                Ok(ReturnOutcome {
                    renter: Renter {
                        status: RenterStatus::Completed,
                        ..renter
                    },
                    profit,
                    restored_units: restored.len() as u32,
                    unmatched_items,
                })
            }
            Err(e) => {
                error!("Return of renter {} failed after closing it: {}", renter_id, e);
                // Units stay out while the booking is open again
                self.take_back(&restored).await;
                self.cache.invalidate(Some(cache_keys::EQUIPMENT)).await;
                match self
                    .repository
                    .renters
                    .transition_status(renter_id, RenterStatus::Completed, RenterStatus::Active)
                    .await
                {
                    Ok(true) => warn!("Renter {} reopened so the return can be retried", renter_id),
                    Ok(false) => error!("Renter {} changed status while its return was failing", renter_id),
                    Err(reopen) => error!("Renter {} could not be reopened: {}", renter_id, reopen),
                }
                Err(e)
            }
        }
    }

    /// Restore one unit per rented item, then append the profit entry.
    ///
    /// Ids of equipment whose `available` actually went up are pushed to
    /// `restored` as they happen, so a failing caller can undo them.
    async fn settle(
        &self,
        renter: &Renter,
        restored: &mut Vec<String>,
    ) -> AppResult<(ProfitEntry, Vec<String>)> {
        let mut unmatched = Vec::new();

        for item in &renter.items {
            let equipment = match &item.equipment_id {
                Some(id) => self.repository.equipment.find(id).await?,
                None => self.repository.equipment.find_by_name(&item.name).await?,
            };
            let Some(equipment) = equipment else {
                warn!("Equipment not found for returned item {}", item.name);
                unmatched.push(item.name.clone());
                continue;
            };

            match self.repository.equipment.restore_unit(&equipment.id).await? {
                CounterOutcome::Changed { from, to } => {
                    info!("Returned {}: available {} -> {}", item.name, from, to);
                    if to > from {
                        restored.push(equipment.id.clone());
                    }
                }
                CounterOutcome::Missing | CounterOutcome::Exhausted => {
                    warn!("Equipment {} disappeared during return", equipment.id);
                    unmatched.push(item.name.clone());
                }
            }
        }

        let profit = self
            .repository
            .profits
            .append(&renter.id, renter.total_amount)
            .await?;
        Ok((profit, unmatched))
    }

    /// Undo the restores of a failed return
    async fn take_back(&self, equipment_ids: &[String]) {
        for id in equipment_ids {
            match self.repository.equipment.take_unit(id).await {
                Ok(CounterOutcome::Changed { .. }) => {}
                Ok(outcome) => warn!("Could not take back a unit of equipment {}: {:?}", id, outcome),
                Err(e) => error!("Failed to take back a unit of equipment {}: {}", id, e),
            }
        }
    }
}
