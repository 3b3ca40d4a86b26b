//! CLI commands

mod detect;
mod generate;
mod init;

pub use detect::DetectCommand;
pub use generate::{GenerateCommand, ProviderKind};
pub use init::InitCommand;
