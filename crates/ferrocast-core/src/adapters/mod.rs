//! Provider adapters implementing [`crate::DataSource`].

mod synthetic;
mod yahoo;

pub use synthetic::SyntheticAdapter;
pub use yahoo::{YahooAdapter, DEFAULT_BASE_URL};
