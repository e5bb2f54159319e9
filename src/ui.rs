// UI layer: everything that touches the terminal. Results go to stdout,
// while logs, the spinner and prompts use stderr so piping the output
// gives exactly the link or the secret.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::api::{RevealedSecret, ShareLink};

/// Install the stderr tracing subscriber. `RUST_LOG` overrides the default
/// `warn` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Spinner shown while a request runs. indicatif keeps it hidden when
/// stderr is not a terminal.
pub fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Ask for the password on the terminal without echo.
pub fn prompt_password() -> Result<String> {
    let password = Password::new().with_prompt("Password").interact()?;
    Ok(password)
}

pub fn print_link(out: &mut impl Write, link: &ShareLink, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({ "share_link": link.as_str() });
        writeln!(out, "{value}")?;
    } else {
        writeln!(out, "{link}")?;
    }
    Ok(())
}

pub fn print_secret(out: &mut impl Write, secret: &RevealedSecret, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({ "secret": secret.as_str() });
        writeln!(out, "{value}")?;
    } else {
        writeln!(out, "{secret}")?;
    }
    Ok(())
}
