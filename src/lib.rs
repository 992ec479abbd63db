// src/lib.rs
//! Job board backend: postings, applications, fake job detection, translation,
//! CV parsing and a LinkedIn importer behind a Rocket REST API.

pub mod admin_cli;
pub mod auth;
pub mod config;
pub mod crawler;
pub mod cv;
pub mod database;
pub mod error;
pub mod fake_job;
pub mod logging;
pub mod models;
pub mod translation;
pub mod utils;
pub mod web;

pub use config::AppConfig;
pub use database::Database;
pub use error::{AppError, AppResult};
pub use web::{build_rocket, start_web_server};
