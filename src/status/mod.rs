//! Tiered statuses and lasting consequences
//!
//! A status is a timed bundle of domain and stat modifiers at one of four
//! severities. Consequences outlive the fight.

pub mod consequence;
pub mod enhanced;
pub mod severity;
pub mod system;
pub mod table;

pub use consequence::Consequence;
pub use enhanced::{EnhancedStatus, SpecialEffect, StatusInstanceId};
pub use severity::{Severity, StatusSource};
pub use system::{
    ApplicationResult, NullStatusProvider, StatusProvider, TickEntry, TickEvent, TickReport,
    TieredStatusSystem,
};
pub use table::{standard_table, StatusTable, StatusTemplate, TierProfile};
