use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Lifecycle status for workers, buyers, and crops.
///
/// These entities are never hard-deleted; archiving removes them from the
/// active lists while keeping them addressable by id, so historical ledger
/// entries can still resolve their names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    Active,
    Archived,
}

impl EntityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl TryFrom<&str> for EntityStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(EngineError::Validation(format!(
                "invalid entity status: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_statuses() {
        assert_eq!(
            EntityStatus::try_from(EntityStatus::Active.as_str()).unwrap(),
            EntityStatus::Active
        );
        assert_eq!(
            EntityStatus::try_from(EntityStatus::Archived.as_str()).unwrap(),
            EntityStatus::Archived
        );
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(EntityStatus::try_from("deleted").is_err());
    }
}
