//! Data models for MountainGear

pub mod equipment;
pub mod profit;
pub mod renter;
pub mod settings;

// Re-export commonly used types
pub use equipment::{Condition, Equipment};
pub use profit::{ProfitEntry, ProfitSummary};
pub use renter::{RentedItem, Renter, RenterStatus};
pub use settings::Settings;
