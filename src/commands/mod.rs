//! Non-interactive subcommands.

pub mod assist;
pub mod quests;
