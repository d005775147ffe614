//! Backend access for crlabel.
//!
//! The blocking HTTP client is driven from `std::thread` workers so a slow
//! backend never stalls rendering. Requests go in over crossbeam channels;
//! responses come back as `AppEvent::Api` on the main event bus. Target
//! fetches and submissions are served one at a time on a single lane; info
//! fetches run beside them.
pub mod types;
pub mod worker;
