use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub share_booking_history: bool,
    pub share_preferences: bool,
    pub share_contact: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            share_booking_history: false,
            share_preferences: false,
            share_contact: false,
        }
    }
}

/// Per-user profile. `booking_history` is kept in booking creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub loyalty_points: i64,
    pub preferences: Vec<String>,
    pub privacy_settings: PrivacySettings,
    pub booking_history: Vec<Uuid>,
}

impl UserProfile {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            loyalty_points: 0,
            preferences: Vec::new(),
            privacy_settings: PrivacySettings::default(),
            booking_history: Vec::new(),
        }
    }
}
