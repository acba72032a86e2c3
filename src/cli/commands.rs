use clap::{Parser, Subcommand};
use mailtone::rewrite::RewriteMode;

/// `mailtone` - tone-aware email and subject rewriting backed by an LLM.
#[derive(Parser, Debug)]
#[command(name = "mailtone")]
#[command(version)]
#[command(about = "Rewrite emails and subject lines in the tone you need.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway
    Gateway {
        /// Port to listen on (use 0 for random available port; default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Rewrite an email once and print the candidates with highlighted changes
    Rewrite {
        /// Email text; read from stdin when omitted
        text: Option<String>,

        /// Correction mode: rewrite or grammar
        #[arg(short, long, default_value = "rewrite")]
        mode: RewriteMode,

        /// What the email is for
        #[arg(long, default_value = "follow-up")]
        purpose: String,

        /// Desired tone
        #[arg(short, long, default_value = "formal")]
        tone: String,

        /// Desired length
        #[arg(short, long, default_value = "short")]
        length: String,

        /// Who will read it
        #[arg(short, long, default_value = "manager")]
        audience: String,
    },

    /// Suggest alternative subject lines
    Subject {
        /// The current subject line
        subject: String,

        /// Desired tone
        #[arg(short, long, default_value = "formal")]
        tone: String,

        /// Who will read it
        #[arg(short, long, default_value = "manager")]
        audience: String,
    },

    /// Show recently saved rewrites
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
}
