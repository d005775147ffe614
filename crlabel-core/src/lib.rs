pub mod client;
pub mod error;
pub mod feed;
pub mod reading_lock;
pub mod session;
pub mod types;
