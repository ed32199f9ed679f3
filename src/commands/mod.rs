// ABOUTME: Command module aggregator for the funcship CLI.
// ABOUTME: Re-exports deploy, plan and validate command handlers.

mod deploy;
mod validate;

pub use deploy::{deploy, plan};
pub use validate::validate;
