// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Commands};
use portal_core::auth::jwt::generate_secret;
use portal_core::auth::password::hash_password_with_cost;
use portal_core::models::api::LoginRequest;
use portal_router::{
    Document, HttpBackend, LoginOutcome, MemoryDocument, Navigation, Navigator, RouteTable,
};

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::HashPassword { password, cost } => {
            println!("{}", hash_password_with_cost(&password, cost)?);
        }
        Commands::GenSecret { length } => {
            if length == 0 {
                return Err(Error::Custom("secret length must be positive".into()));
            }
            println!("{}", generate_secret(length));
        }
        Commands::Browse {
            base_url,
            email,
            password,
            remember,
            timeout,
            paths,
        } => {
            let login = email.zip(password).map(|(email, password)| LoginRequest {
                email,
                password,
                remember,
            });
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(browse(
                &base_url,
                login,
                Duration::from_secs(timeout),
                &paths,
            ))?;
        }
    }

    Ok(())
}

/// Visit `paths` through a [`Navigator`] and print one line per navigation.
async fn browse(
    base_url: &str,
    login: Option<LoginRequest>,
    timeout: Duration,
    paths: &[String],
) -> Result<()> {
    let backend = HttpBackend::new(base_url, timeout)?;
    let navigator = Navigator::new(RouteTable::canonical(), backend, MemoryDocument::new("/"))
        .with_timeout(timeout);

    if let Some(request) = login {
        match navigator.submit_login(request).await? {
            LoginOutcome::Accepted { user, redirect } => {
                println!("login ok: {} -> {redirect}", user.email);
            }
            LoginOutcome::Rejected { message } => {
                return Err(Error::Custom(format!("login rejected: {message}")));
            }
        }
    }

    let mut failures = 0;
    for path in paths {
        let outcome = match navigator.follow_link(path).await {
            Some(outcome) => outcome,
            None => navigator.navigate(path).await,
        };
        let doc = navigator.document().await;
        match outcome {
            Navigation::Rendered { path: shown } => {
                let page = doc.active_page().and_then(|p| p.id()).unwrap_or("-");
                println!("{path}: rendered {shown} ({page})");
                if let Some(user) = doc.shown_user() {
                    println!("  user: {} <{}>", user.name, user.email);
                }
            }
            Navigation::Redirected { to } => println!("{path}: redirected to {to}"),
            Navigation::Superseded => println!("{path}: superseded"),
            Navigation::Failed { path: shown, reason } => {
                failures += 1;
                println!("{path}: failed at {shown}: {reason}");
            }
        }
        log::debug!("location now {}", doc.location());
    }

    if failures > 0 {
        return Err(Error::Custom(format!("{failures} navigation(s) failed")));
    }
    Ok(())
}
