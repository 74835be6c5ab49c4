pub mod audit;
pub mod config;
pub mod dashboard;
pub mod expiry;
pub mod model;

pub use expiry::{ExpiryInfo, ExpiryPolicy, ExpirySource, TokenStatus, classify, classify_with};
pub use model::{PlatformKind, TokenKey, TokenRecord};
