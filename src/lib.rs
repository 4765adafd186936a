pub mod config;
pub mod mail;
pub mod shutdown;
pub mod store;
pub mod ticketmaster;
pub mod tracing;
pub mod watcher;
