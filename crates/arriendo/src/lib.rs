//! Core library for the arriendo rental marketplace: visit scheduling,
//! first-payment billing, the listing catalog, and the capability traits
//! that keep vendor SDKs out of the pure logic.

pub mod assistant;
pub mod billing;
pub mod calendar;
pub mod config;
pub mod error;
pub mod listings;
pub mod scheduling;
pub mod telemetry;
pub mod visits;
