// src/ingest/providers/mod.rs
pub mod fixture;
pub mod reddit;

pub use fixture::FixtureProvider;
pub use reddit::RedditProvider;
