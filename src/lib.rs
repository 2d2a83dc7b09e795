//! Dispatch ETA & Pricing API Library
//!
//! This library provides the core functionality for the field-service
//! dispatch API: geospatial distance, feature construction for the scoring
//! models, candidate ranking, surge pricing, and the HTTP handlers that
//! expose them.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `features`: Typed feature records per scoring model.
//! - `geo`: Coordinates and great-circle distance.
//! - `handlers`: HTTP request handlers.
//! - `models`: API request/response models.
//! - `pricing`: Pricing engine with its two surge policies.
//! - `ranking`: Candidate ranking engine.
//! - `scoring`: Scoring model artifacts and prediction.

pub mod config;
pub mod errors;
pub mod features;
pub mod geo;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod ranking;
pub mod scoring;
