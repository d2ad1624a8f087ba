//! Filter Engine Crate
//!
//! Translates filter panel state into the boolean filter tree consumed by the
//! transaction query API, and reads panel state back out of whatever tree the
//! store currently holds.
//!
//! # Architecture
//!
//! - **Types**: the tree model, panel state and errors live in `shared-types`
//! - **Operations**: pure functions over immutable trees, implemented here
//!
//! # Available Operations
//!
//! - `build_filter`: panel state -> filter tree (plus the base-currency range)
//! - `extract_filter`: any filter tree -> panel state
//! - `edit_filter` / `set_filter`: add one click-to-filter condition
//!
//! # Example
//!
//! ```rust,ignore
//! use filter_engine::{build_filter, FilterContext, FilterDomainConfig, RateTable};
//!
//! let rates = RateTable::new("USD").with_rate("VND", 25_000.0)?;
//! let domain = FilterDomainConfig::default();
//! let ctx = FilterContext::new("VND", "USD", &rates, &domain);
//! let built = build_filter(&params, &ctx)?;
//! ```

pub mod builder;
pub mod context;
pub mod currency;
pub mod dates;
pub mod domain;
pub mod editor;
pub mod extractor;

// Re-export commonly used types
pub use builder::{build_filter, BuiltFilter};
pub use context::FilterContext;
pub use currency::{IdentityConverter, RateTable};
pub use domain::FilterDomainConfig;
pub use editor::{edit_filter, set_filter};
pub use extractor::extract_filter;

// Re-export the tree model from shared-types for convenience
pub use shared_types::{FilterError, FilterNode, FilterParams, FilterTree};
