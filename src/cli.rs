// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the ssh and init subcommands and global flags.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ec2sh")]
#[command(about = "SSH into EC2 instances selected by tag")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ~/.ec2sh.yml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// AWS profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// AWS region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a shell on one instance, or run a command on every match
    Ssh {
        /// [USER@]FILTER_TAG, where FILTER_TAG is Key:Value or a Name tag value
        destination: String,

        /// Login username
        #[arg(short, long)]
        login_name: Option<String>,

        /// Private key file
        #[arg(short, long)]
        identity_file: Option<String>,

        /// Connect to private IP addresses
        #[arg(long)]
        private: bool,

        /// Command to run on every matching instance
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Write starter configuration files
    Init {
        #[command(subcommand)]
        target: InitTarget,
    },
}

#[derive(Subcommand)]
pub enum InitTarget {
    /// Write ~/.ec2sh.yml (or the --config path)
    Config {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Write ~/.aws/credentials with a placeholder default profile
    Profile {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
