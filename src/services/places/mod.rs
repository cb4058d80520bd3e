//! Google Places API (New) client
//!
//! Every request goes through the shared
//! [`RemoteCaller`](crate::core::rate_limiter::RemoteCaller), so all jobs in the
//! process draw from one request budget.

mod client;
mod types;
pub mod url;


pub use client::PlacesClient;
pub use types::PlaceMatch;
pub use url::{extract_place_id, is_valid_place_id};
