#![doc = include_str!("../README.md")]
#![deny(
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    warnings,
    unused_crate_dependencies
)]

pub mod error;
pub mod height;
pub mod identifier;
pub mod status;
pub mod store;
pub mod trust_threshold;

pub use error::ClientTypesError;
pub use height::Height;
pub use identifier::{ClientId, ClientType};
pub use status::ClientStatus;
pub use trust_threshold::TrustThreshold;
