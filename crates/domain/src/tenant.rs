use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A `Tenant` rents a unit at a `Property` and is the receiver of rent
/// reminders. This subsystem only ever reads tenants; all mutation happens
/// through the management CRUD surface.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: ID,
    pub name: String,
    /// Phone number exactly as the property manager entered it. It is
    /// normalized by the SMS gateway right before sending.
    pub phone: String,
    /// Monthly rent in whole KES
    pub rent_amount: i64,
    /// Day of the month (1-31) the rent falls due. In months shorter than
    /// this value the due date clamps to the last day of the month.
    pub due_day: u32,
    pub status: TenantStatus,
    pub property_id: ID,
}

/// Lifecycle status of a `Tenant`. Only `Inactive` tenants are excluded from
/// reminder evaluation; suspended tenants and defaulters still owe rent and
/// still receive reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Inactive,
    Suspended,
    Defaulter,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
            Self::Defaulter => "defaulter",
        }
    }
}

#[derive(Error, Debug)]
#[error("tenant status: {0} is not recognized")]
pub struct InvalidTenantStatusError(String);

impl FromStr for TenantStatus {
    type Err = InvalidTenantStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            "defaulter" => Ok(Self::Defaulter),
            _ => Err(InvalidTenantStatusError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_str() {
        for status in [
            TenantStatus::Active,
            TenantStatus::Inactive,
            TenantStatus::Suspended,
            TenantStatus::Defaulter,
        ] {
            assert_eq!(status.as_str().parse::<TenantStatus>().unwrap(), status);
        }
        assert!("evicted".parse::<TenantStatus>().is_err());
    }
}
