use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::client::Options;

#[derive(Parser)]
#[command(name = "miactl")]
#[command(about = "A CLI for the Mia-Platform console", version)]
#[command(after_help = "EXAMPLES:
    miactl get projects --api-base-url https://console.example/ --api-key KEY --api-cookie SID
    miactl get project my-project --context prod --api-cookie SID
    miactl set context --name prod --api-base-url https://console.example/ --api-key KEY")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Read base URL and API key from a saved context
    #[arg(long, global = true, env = "MIACTL_CONTEXT")]
    pub context: Option<String>,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Clone, Default)]
pub struct ConnectionArgs {
    /// Console base URL, with a trailing slash
    #[arg(long, visible_alias = "apiBaseUrl", global = true, env = "MIACTL_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// API key sent in the `secret` header
    #[arg(long, visible_alias = "apiKey", global = true, env = "MIACTL_API_KEY")]
    pub api_key: Option<String>,

    /// Session id sent as the `sid` cookie
    #[arg(long, visible_alias = "apiCookie", global = true, env = "MIACTL_API_COOKIE")]
    pub api_cookie: Option<String>,
}

impl ConnectionArgs {
    pub fn into_options(self) -> Options {
        Options {
            api_base_url: self.api_base_url.unwrap_or_default(),
            api_key: self.api_key.unwrap_or_default(),
            api_cookie: self.api_cookie.unwrap_or_default(),
            ..Options::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display one or many resources
    #[command(after_help = "EXAMPLES:
    miactl get projects
    miactl get project my-project")]
    Get {
        #[command(subcommand)]
        resource: GetCommands,
    },
    /// Persist local configuration
    #[command(after_help = "EXAMPLES:
    miactl set context --name prod --api-base-url https://console.example/ --api-key KEY")]
    Set {
        #[command(subcommand)]
        resource: SetCommands,
    },
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    miactl completions bash > ~/.bash_completion.d/miactl
    miactl completions zsh > ~/.zfunc/_miactl")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum GetCommands {
    /// List projects
    Projects,
    /// Show a project by its project id (lists all projects without an id)
    Project {
        /// Project identifier (the `projectId` field)
        id: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SetCommands {
    /// Save the current --api-base-url and --api-key as a named context
    Context(SetContextArgs),
}

#[derive(Args)]
pub struct SetContextArgs {
    /// Context name
    #[arg(long)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get_projects_with_connection_flags() {
        let cli = Cli::try_parse_from([
            "miactl",
            "get",
            "projects",
            "--api-base-url",
            "http://base/",
            "--apiKey",
            "key",
            "--api-cookie",
            "sid",
        ])
        .expect("parse");

        assert!(matches!(
            cli.command,
            Commands::Get {
                resource: GetCommands::Projects
            }
        ));
        let opts = cli.connection.into_options();
        assert_eq!(opts.api_base_url, "http://base/");
        assert_eq!(opts.api_key, "key");
        assert_eq!(opts.api_cookie, "sid");
        assert!(opts.secret.is_empty());
    }

    #[test]
    fn test_parse_get_project_by_id() {
        let cli = Cli::try_parse_from(["miactl", "get", "project", "project-2"]).expect("parse");
        match cli.command {
            Commands::Get {
                resource: GetCommands::Project { id },
            } => assert_eq!(id.as_deref(), Some("project-2")),
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_parse_set_context() {
        let cli = Cli::try_parse_from(["miactl", "set", "context", "--name", "ctx1", "--json"])
            .expect("parse");
        assert!(cli.json);
        match cli.command {
            Commands::Set {
                resource: SetCommands::Context(args),
            } => assert_eq!(args.name.as_deref(), Some("ctx1")),
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_unknown_resource_is_rejected() {
        assert!(Cli::try_parse_from(["miactl", "get", "clusters"]).is_err());
    }
}
