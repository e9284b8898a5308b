//! Pocket - local-first personal finance tracker
//!
//! This library provides the core functionality for the `pocket` command:
//! income and expense transactions in categories, monthly budgets per
//! expense category, currencies, dashboards and reminder jobs, all kept in
//! one SQLite file.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, budgets, currencies)
//! - `storage`: SQLite storage layer with observable queries
//! - `services`: Business logic layer
//! - `reports`: Dashboard and budget progress aggregation
//! - `reminders`: Budget threshold and daily reminder jobs
//! - `export`: JSON export and import
//! - `audit`: Audit logging system
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket::config::{PocketPaths, Settings};
//! use pocket::storage::Storage;
//!
//! let paths = PocketPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths, &settings)?;
//! storage.bootstrap(&settings)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reminders;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{PocketError, PocketResult};
