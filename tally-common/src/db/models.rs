//! Database models

use serde::{Deserialize, Serialize};

/// One logged patron interaction, as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tally {
    pub id: i64,
    pub department: String,
    #[serde(rename = "qType")]
    #[sqlx(rename = "qType")]
    pub interaction_type: String,
    pub referral: bool,
    pub notes: String,
    pub feedback: String,
    /// Storage encoding (`YYYY-MM-DD HH:MM:SS`)
    pub timestamp: String,
}

/// A validated tally ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTally {
    pub department: String,
    pub interaction_type: String,
    pub referral: bool,
    pub notes: String,
    pub feedback: String,
    /// Storage encoding (`YYYY-MM-DD HH:MM:SS`)
    pub timestamp: String,
}

/// Feedback projection of a tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackEntry {
    pub feedback: String,
    pub department: String,
    pub timestamp: String,
}

/// One (department, interaction type) catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuOption {
    pub id: i64,
    pub department: String,
    #[serde(rename = "itemName")]
    pub item_name: String,
}
