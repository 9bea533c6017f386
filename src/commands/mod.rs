pub mod get;
pub mod set;

use crate::cli::{Commands, GetCommands, SetCommands};
use crate::error::Result;
use crate::factory::CommandContext;

pub async fn run(ctx: &CommandContext, command: Commands) -> Result<()> {
    match command {
        Commands::Get { resource } => match resource {
            GetCommands::Projects | GetCommands::Project { id: None } => get::list_projects(ctx).await,
            GetCommands::Project { id: Some(id) } => get::show_project(ctx, &id).await,
        },
        Commands::Set { resource } => match resource {
            SetCommands::Context(args) => set::context(ctx, args),
        },
        Commands::Completions { .. } => {
            // Handled in main, before any factory exists
            Ok(())
        }
    }
}
