use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TaskTribe: quests, bids and tribes in the terminal
#[derive(Parser, Debug)]
#[command(version, about = "TaskTribe quest marketplace")]
pub struct Cli {
    /// Path to the TOML config (default: <data dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the log file and saved preferences
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Generative Language API key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive app (the default)
    Ui,

    /// Print the quest fixtures as JSON
    Quests {
        /// Optional path to write JSON output (pretty-printed)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run content moderation on a piece of text
    Moderate {
        text: String,
    },

    /// Ask the assistant whether a quest is acceptable and realistically priced
    ValidateQuest {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Budget in rupees
        #[arg(long)]
        budget: u64,
    },

    /// Check a photo against a verification code
    VerifyPhoto {
        /// JPEG to verify
        #[arg(long)]
        image: PathBuf,

        #[arg(long)]
        code: String,
    },

    /// Location-grounded question, optionally near a coordinate
    Maps {
        prompt: String,

        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },

    /// Ask a question about a video file
    Video {
        #[arg(long)]
        file: PathBuf,

        /// MIME type of the video (e.g. video/mp4)
        #[arg(long, default_value = "video/mp4")]
        mime: String,

        prompt: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_ui() {
        let cli = Cli::try_parse_from(["tasktribe"]).unwrap();
        assert!(cli.cmd.is_none());
    }

    #[test]
    fn maps_needs_both_coordinates() {
        assert!(Cli::try_parse_from(["tasktribe", "maps", "cafes", "--lat", "12.9"]).is_err());
        let cli = Cli::try_parse_from(["tasktribe", "maps", "cafes", "--lat", "12.9", "--lng", "-77.5"]).unwrap();
        assert!(matches!(cli.cmd, Some(Command::Maps { lat: Some(_), lng: Some(_), .. })));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["tasktribe", "moderate", "hello", "--data-dir", "/tmp/tt"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tt")));
    }
}
