use clap::{Parser, Subcommand};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal client for the todo tracker service")]
pub struct Cli {
    /// Service base URL
    #[arg(long, env = "TODO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    /// Bearer token (see `todo-tracker issue-token`)
    #[arg(long, env = "TODO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive screen (default)
    Ui,
    /// Print todos, incomplete first
    #[command(alias = "ls")]
    List,
    /// Create a todo
    Add {
        name: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Flip a todo between open and done
    Toggle { id: i32 },
    /// Delete a completed todo
    Delete { id: i32 },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands};

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["todo-view", "--base-url", "http://localhost:9000"])
            .expect("args should parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.base_url, "http://localhost:9000");
    }

    #[test]
    fn add_takes_name_and_optional_description() {
        let cli = Cli::try_parse_from(["todo-view", "add", "Buy milk", "-d", "semi-skimmed"])
            .expect("args should parse");
        assert_eq!(
            cli.command,
            Some(Commands::Add {
                name: "Buy milk".to_string(),
                description: Some("semi-skimmed".to_string()),
            })
        );
    }

    #[test]
    fn ids_must_be_numeric() {
        assert!(Cli::try_parse_from(["todo-view", "toggle", "abc"]).is_err());
    }
}
