use serde::{Deserialize, Serialize};

/// The singleton user-preferences record. Exactly one row exists in the
/// database; both fields default to empty strings until the user updates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub niche_interests: String,
    pub additional_params: String,
}
