//! Core data types for the FlightSure ledger

pub mod account;
pub mod airline;
pub mod credit;
pub mod flight;
pub mod keys;
pub mod policy;
