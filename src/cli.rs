// Command-line surface. One positional argument decides everything: a share
// link of the configured deployment is revealed, anything else is shared.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

use crate::api::{Action, ShareClient, ShareRequest, Ttl, DEFAULT_BASE_URL};
use crate::ui;

/// Printed to stdout when no argument is given.
pub const MISSING_ARGUMENT: &str =
    "Error: an argument is required (secure link to open secret, text to create secret)";

#[derive(Parser, Debug)]
#[command(
    name = "secureshare",
    version,
    about = "Create or open one-time secureshare links from the command line."
)]
pub struct Args {
    /// Share link to reveal, or secret text to turn into a share link.
    /// Text starting with a dash (e.g. a PEM key) is taken as-is.
    #[arg(allow_hyphen_values = true)]
    pub argument: Option<String>,

    /// Password protecting the share (on create) or unlocking it (on reveal).
    #[arg(long, conflicts_with = "ask_password")]
    pub password: Option<String>,

    /// Prompt for the password without echoing it.
    #[arg(long)]
    pub ask_password: bool,

    /// Days before the service expires the share.
    #[arg(long, default_value_t = 7)]
    pub ttl_days: u32,

    /// Additional hours before expiry.
    #[arg(long, default_value_t = 0)]
    pub ttl_hours: u32,

    /// Additional minutes before expiry.
    #[arg(long, default_value_t = 0)]
    pub ttl_minutes: u32,

    /// Service deployment to talk to.
    #[arg(long, env = "SECURESHARE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print the result as a JSON object.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    fn ttl(&self) -> Ttl {
        Ttl {
            days: self.ttl_days,
            hours: self.ttl_hours,
            minutes: self.ttl_minutes,
        }
    }

    fn resolve_password(&self) -> Result<Option<String>> {
        let password = if self.ask_password {
            Some(ui::prompt_password()?)
        } else {
            self.password.clone()
        };
        Ok(password.filter(|p| !p.is_empty()))
    }
}

/// Run one invocation and return the process exit status. Results go to
/// `out`; failures come back as errors for `main` to report.
pub fn run(args: &Args, out: &mut impl Write) -> Result<u8> {
    let Some(argument) = args.argument.as_deref() else {
        writeln!(out, "{MISSING_ARGUMENT}")?;
        return Ok(1);
    };

    let client = ShareClient::new(&args.base_url)?;
    let password = args.resolve_password()?;

    match client.dispatch(argument) {
        Action::Reveal(link) => {
            let spinner = ui::spinner("Opening secret...");
            let revealed = client.reveal(&link, password.as_deref());
            spinner.finish_and_clear();
            let secret = revealed.with_context(|| format!("failed to open {link}"))?;
            ui::print_secret(out, &secret, args.json)?;
        }
        Action::Create(secret) => {
            let request = ShareRequest::new(secret)
                .with_password(password)
                .with_ttl(args.ttl());
            let spinner = ui::spinner("Creating share link...");
            let created = client.create(&request);
            spinner.finish_and_clear();
            let link = created.context("failed to create share link")?;
            ui::print_link(out, &link, args.json)?;
        }
    }
    Ok(0)
}
