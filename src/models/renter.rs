//! Renter (booking) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Booking status. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RenterStatus {
    #[serde(alias = "Aktif")]
    Active,
    #[serde(alias = "Selesai")]
    Completed,
    #[serde(alias = "Dibatalkan")]
    Cancelled,
}

impl RenterStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RenterStatus::Active)
    }

    /// Whether a booking in `self` may be moved to `next`
    pub fn can_transition_to(self, next: RenterStatus) -> bool {
        self == next || !self.is_terminal()
    }
}

impl std::fmt::Display for RenterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RenterStatus::Active => "Active",
            RenterStatus::Completed => "Completed",
            RenterStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", label)
    }
}

/// One rented unit on a booking.
///
/// Bookings made through the booking flow always carry the equipment id;
/// the name is kept for display and as a lookup fallback for items entered
/// by hand, which may be plain strings on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", from = "RentedItemInput")]
pub struct RentedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<String>,
    pub name: String,
}

impl RentedItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            equipment_id: None,
            name: name.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RentedItemInput {
    Name(String),
    Full {
        #[serde(rename = "equipmentId", default)]
        equipment_id: Option<String>,
        name: String,
    },
}

impl From<RentedItemInput> for RentedItem {
    fn from(input: RentedItemInput) -> Self {
        match input {
            RentedItemInput::Name(name) => RentedItem::named(name),
            RentedItemInput::Full { equipment_id, name } => RentedItem { equipment_id, name },
        }
    }
}

/// Renter record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Renter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<RentedItem>,
    pub status: RenterStatus,
    /// Price agreed at booking time, credited to profit on return
    #[serde(default)]
    pub total_amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ktp_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Admin create renter request. Does not touch inventory.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRenter {
    #[validate(length(min = 1, message = "Renter name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<RentedItem>,
    pub status: Option<RenterStatus>,
    #[serde(default)]
    pub total_amount: u64,
    pub ktp_image_url: Option<String>,
    pub notes: Option<String>,
}

/// Admin edit request; only provided fields are written
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRenter {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Renter name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RentedItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RenterStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ktp_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Public booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// One unit is booked per entry
    #[validate(length(min = 1, message = "At least one equipment id is required"))]
    pub equipment_ids: Vec<String>,
    pub notes: Option<String>,
    pub ktp_image_url: Option<String>,
}

impl CreateBooking {
    /// Rental length in days
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rented_item_accepts_bare_names() {
        let items: Vec<RentedItem> =
            serde_json::from_str(r#"["Dome Tent", {"equipmentId": "e1", "name": "Carrier 60L"}]"#)
                .unwrap();
        assert_eq!(items[0], RentedItem::named("Dome Tent"));
        assert_eq!(items[1].equipment_id.as_deref(), Some("e1"));

        let json = serde_json::to_value(&items[1]).unwrap();
        assert_eq!(json["equipmentId"], "e1");
        assert_eq!(json["name"], "Carrier 60L");
    }

    #[test]
    fn status_machine() {
        use RenterStatus::*;
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Completed));
        assert!(Completed.is_terminal());

        let legacy: RenterStatus = serde_json::from_str("\"Aktif\"").unwrap();
        assert_eq!(legacy, Active);
    }
}
