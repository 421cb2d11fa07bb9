use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "skillsync", version, about = "Match CV text against the skill taxonomy and store the result")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract skills from a CV and attach them to a candidate
    Process {
        /// Path to a PDF file, or the CV text itself
        input: String,
        /// Candidate ID to update
        candidate_id: i64,
        /// Model API key (falls back to AI_API_KEY)
        api_key: Option<String>,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a short profile of a candidate with the chat model
    Summarize {
        /// Path to a PDF file, or the candidate data itself
        input: String,
        /// Model API key (falls back to AI_API_KEY)
        api_key: Option<String>,
    },
    /// Export every collection to a JSON file
    Dump {
        #[arg(short, long, default_value = "datadump.json")]
        output: PathBuf,
    },
    /// Run the HTTP API
    Serve {
        /// Overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
}
