pub mod calendar;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod index;
pub mod records;
pub mod runner;
pub mod schedule;
pub mod season;
pub mod types;
