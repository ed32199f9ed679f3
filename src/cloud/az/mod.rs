// ABOUTME: Azure implementation of the capability traits.
// ABOUTME: Drives the `az` and `func` command-line tools and parses their JSON output.

mod command;
mod error;
mod provider;

pub use command::{CliRunner, CommandOutput};
pub use error::AzError;
pub use provider::AzureCli;
