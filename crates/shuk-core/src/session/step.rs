//! Conversation step enums.
//!
//! Each flow is a state machine over a named step; the step decides which
//! validation and prompt logic applies to the next inbound message. Steps
//! are serialized snake_case so stored sessions stay readable.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Steps of the price-report flow.
///
/// The sequence is not strictly linear: handlers may jump (skip the store
/// confirmation when a single candidate matches, skip the unit quantity when
/// a product default applies). `Canceled` is absorbing and reachable from
/// any step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportStep {
    City,
    Store,
    Branch,
    StoreConfirm,
    Product,
    Brand,
    UnitType,
    UnitQuantity,
    Price,
    Units,
    Club,
    Limit,
    Cart,
    Complete,
    Canceled,
}

impl ReportStep {
    /// Terminal steps accept no further input.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStep::Complete | ReportStep::Canceled)
    }
}

/// Steps of the price-search flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LookupStep {
    Product,
    Brand,
    Location,
    Complete,
    Canceled,
}

impl LookupStep {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LookupStep::Complete | LookupStep::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_snake_case_round_trip() {
        assert_eq!(ReportStep::StoreConfirm.to_string(), "store_confirm");
        assert_eq!(
            ReportStep::from_str("unit_quantity").unwrap(),
            ReportStep::UnitQuantity
        );
    }

    #[test]
    fn test_terminal_steps() {
        assert!(ReportStep::Canceled.is_terminal());
        assert!(ReportStep::Complete.is_terminal());
        assert!(!ReportStep::City.is_terminal());
        assert!(LookupStep::Complete.is_terminal());
        assert!(!LookupStep::Location.is_terminal());
    }
}
