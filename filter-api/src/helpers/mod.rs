pub mod filter_store;
