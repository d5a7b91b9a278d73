//! Tienda DB Library
//!
//! Postgres-backed durable state for tienda. Currently this is the
//! identifier sequence store: one row per namespace so sequential ids
//! survive restarts and multi-process deployment.

pub mod counters;

pub use counters::PgCounterStore;
