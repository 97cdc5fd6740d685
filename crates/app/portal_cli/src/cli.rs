use clap::{Parser, Subcommand};

/// Default length of generated signing secrets.
pub const DEFAULT_SECRET_LEN: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "portal_cli", version, about = "Portal seed tooling and router client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Hash a password for the users file.
    HashPassword {
        password: String,

        /// bcrypt cost factor.
        #[arg(long, default_value_t = portal_core::auth::password::BCRYPT_COST)]
        cost: u32,
    },

    /// Print a random JWT signing secret.
    GenSecret {
        #[arg(long, default_value_t = DEFAULT_SECRET_LEN)]
        length: usize,
    },

    /// Drive the router against a running server and report each navigation.
    Browse {
        /// Server base URL.
        #[arg(long, env = "PORTAL_URL", default_value = "http://127.0.0.1:3000")]
        base_url: String,

        /// Log in with this email before navigating.
        #[arg(long, requires = "password")]
        email: Option<String>,

        #[arg(long, env = "PORTAL_PASSWORD", requires = "email")]
        password: Option<String>,

        /// Ask for the extended session.
        #[arg(long)]
        remember: bool,

        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,

        /// Paths to visit, in order.
        #[arg(default_value = "/")]
        paths: Vec<String>,
    },
}
