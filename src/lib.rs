//! Salesforce Lead Router Library
//!
//! Receives webhook lead submissions, normalizes them into Salesforce's `Lead`
//! schema and creates them with assignment rules enabled.
//!
//! # Modules
//!
//! - `auth`: API key middleware.
//! - `config`: Configuration management.
//! - `credentials`: Cached Salesforce access token and refresh.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `lead_models`: Inbound payload parsing and Salesforce payloads.
//! - `normalizer`: Name, lead source and project type rules.
//! - `openapi`: OpenAPI document.
//! - `routes`: Router assembly.
//! - `salesforce_client`: Salesforce OAuth and REST client.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod handlers;
pub mod lead_models;
pub mod normalizer;
pub mod openapi;
pub mod routes;
pub mod salesforce_client;
