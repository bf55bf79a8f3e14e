//! TaskTribe: a quest marketplace where teens earn skill points and adults
//! post paid work, driven from the terminal.

pub mod app;
pub mod assistant;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod defaults;
pub mod fixtures;
pub mod otp;
pub mod screens;
pub mod tutorial;
pub mod types;
pub mod ui;
pub mod util;
pub mod validation;
pub mod verification;

// Scripted test doubles for deterministic controller tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;
