pub mod aggregator;
pub mod backup;
pub mod clock;
pub mod config;
pub mod geo;
pub mod ledger;
pub mod log;
pub mod perimeter;
pub mod service;
pub mod watcher;
