use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionBackend {
    #[default]
    File,
    Redis,
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "meowlogy")]
#[command(version, about = "Cat facts and a streaming cat-care assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the cat-facts API
    #[arg(long, global = true, env = "MEOWLOGY_API_URL")]
    pub api_url: Option<String>,

    /// Where the login session is kept
    #[arg(long, global = true, value_enum, env = "MEOWLOGY_SESSION_BACKEND")]
    pub session_backend: Option<SessionBackend>,

    /// Session file for the file backend
    #[arg(long, global = true, env = "MEOWLOGY_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with the demo account
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Create an account on the server
    Signup {
        username: String,
        email: String,
        #[arg(short, long)]
        password: String,
        /// Repeat the password
        #[arg(short, long)]
        confirm: String,
    },

    /// Show who is logged in
    Whoami,

    /// Cat fact management
    Facts {
        #[command(subcommand)]
        command: FactCommands,
    },

    /// Ask the cat-care assistant one question
    Ask {
        /// The question; words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Start an interactive conversation
    Chat,

    /// Check the API's health
    Health,
}

#[derive(Subcommand, Debug)]
pub enum FactCommands {
    /// List every fact
    List,
    /// Show one random fact
    Random,
    /// Add a new fact
    Add {
        #[arg(required = true, num_args = 1..)]
        fact: Vec<String>,
    },
    /// Show a single fact by id
    Show { id: String },
    /// Like a fact
    Like { id: String },
    /// Remove your like from a fact
    Unlike { id: String },
    /// Delete a fact
    Delete { id: String },
}
