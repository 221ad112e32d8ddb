//! Wardbook: a small hospital administration server.
//!
//! Serves the patient and doctor directories and account management as
//! server-rendered HTML, plus a plain-text USSD callback for phone
//! self-service.

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod web;
