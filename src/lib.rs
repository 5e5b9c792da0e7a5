//! Search core for a rental/sale property marketplace.
//!
//! Turns search box text and filter selections into backend query
//! parameters, fetches listings, and keeps the list and map views of one
//! result set in sync.

pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fsm;
pub mod models;
pub mod search;
pub mod session;
pub mod store;
pub mod view;

pub use client::{HttpPropertyClient, PropertyApi};
pub use config::SearchConfig;
pub use error::{ApiError, StoreError};
pub use models::PropertyResult;
pub use search::{translate, PageRequest, PropertyQueryParameters, SearchFilters};
pub use session::{DetailState, SearchSession};
