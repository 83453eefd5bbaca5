use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "present")]
#[command(author, version, about)]
#[command(long_about = "A keyboard-driven slide presentation viewer.\n\n\
    Slides advance with the arrow keys or Space, and the current position\n\
    is kept as an address fragment such as #3.\n\n\
    Examples:\n  \
    present talk.slide                 Present fullscreen from the first slide\n  \
    present talk.slide --windowed      Present in a window\n  \
    present talk.slide --location '#4' Open on the fifth slide")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Slide deck to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Initial address fragment, e.g. '#3' (0-indexed; invalid values open slide 0)
    #[arg(long, global = false, value_name = "FRAGMENT")]
    pub location: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.windowed, defaults.show_help)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Log filter derived from `-q` / `-v`.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    crate::app::run(file, self.windowed, self.location)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_file_with_location() {
        let cli = Cli::try_parse_from(["present", "talk.slide", "--location", "#3", "--windowed"])
            .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("talk.slide")));
        assert_eq!(cli.location.as_deref(), Some("#3"));
        assert!(cli.windowed);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from(["present", "config", "set", "defaults.theme", "dark"])
            .unwrap();
        match cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Set { key, value },
            }) => {
                assert_eq!(key, "defaults.theme");
                assert_eq!(value, "dark");
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["present", "-vv", "version"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
        let cli = Cli::try_parse_from(["present", "-q", "version"]).unwrap();
        assert_eq!(cli.log_level(), "error");
        let cli = Cli::try_parse_from(["present", "version"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
    }
}
