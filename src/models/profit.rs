//! Profit ledger entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One ledger entry, written when a rental is returned
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitEntry {
    pub id: String,
    pub renter_id: String,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

/// Ledger total
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummary {
    pub total_profit: u64,
}
