pub mod config;
pub mod handlers;
pub mod helpers;

pub use helpers::filter_store::FilterStore;
