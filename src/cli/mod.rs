//! CLI module - Command-line interface for Photoscroll
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Photoscroll - Flickr photo search with an endless-scroll gallery
#[derive(Parser)]
#[command(name = "photoscroll")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Search Flickr in-process and print the photos
    #[command(alias = "s")]
    Search {
        /// Search terms; leave empty for the most recent photos
        query: Vec<String>,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Relevant, DateUploaded, DateTaken or Interesting
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show the search history, most recent first
    #[command(alias = "h")]
    History,

    /// Page through a running server like the gallery does
    Browse {
        /// Search terms; leave empty for the most recent photos
        query: Vec<String>,
        /// Number of pages to load
        #[arg(long, default_value_t = 3)]
        pages: u32,
        /// Relevant, DateUploaded, DateTaken or Interesting
        #[arg(long)]
        sort: Option<String>,
        /// Server base URL (defaults to client.server_url)
        #[arg(long)]
        server: Option<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
