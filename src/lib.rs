//! Homeroom report server library.
//!
//! Records weekly homeroom sessions against a Google Sheet (or in-memory
//! fixtures), uploads activity photos, and prints A4 PDF reports through
//! headless Chromium.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
