//! HTTP API test suite.
//!
//! Runs the full `/api/v1` surface in-process. The upload endpoint, a photo
//! host and the Google token/Sheets APIs are served by mock HTTP servers on
//! ephemeral ports, and PDF rendering goes through a capturing engine instead of
//! Chromium.
//!
//! Run with: cargo test --test api

mod mock_apps_script;
mod mock_photo_host;
mod test_helpers;

mod test_advisors;
mod test_reports;
mod test_uploads;
