//! # ssid-stub: In-Memory Collaborators
//!
//! Stand-ins for the two services the SDK talks to:
//!
//! - [`MemoryLedger`] implements `ssid_sdk::Ledger` with the chain's
//!   approval, consumption and key-rotation rules.
//! - [`MemoryContentService`] implements `ssid_content::ContentService`,
//!   and [`routes::router`] serves it over HTTP as the
//!   `ssid-content-stub` binary.
//!
//! Storage is in memory with no persistence. Data is lost on restart.

pub mod content;
pub mod ledger;
pub mod routes;

pub use content::MemoryContentService;
pub use ledger::{MemoryConnector, MemoryLedger, RESERVED_LOCK};
