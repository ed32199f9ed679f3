// ABOUTME: Remote collaborators the orchestrator depends on, as capability traits.
// ABOUTME: Exports the traits, their shared types and errors, and the Azure CLI provider.

pub mod az;
mod error;
pub mod traits;

pub use az::AzureCli;
pub use error::CloudError;
pub use traits::*;
