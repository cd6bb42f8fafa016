//! Load-cache-render pipeline for the component wear dashboard: fetch a JSON
//! collection, fall back to a durable backup, derive summary statistics, and
//! map everything into a display model the host UI consumes.

pub mod cache;
pub mod config;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod render;
pub mod session;
pub mod source;
pub mod stats;
pub mod store;
