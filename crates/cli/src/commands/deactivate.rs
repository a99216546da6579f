//! Deactivate command: release the activation and forget the license

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::output::json::{self, JsonLicense};
use crate::progress::Step;

pub fn run(ctx: &Context) -> Result<()> {
    let manager = ctx.manager()?;
    let step = Step::new("Deactivating license", ctx.json());

    let outcome = match manager.deactivate() {
        Ok(outcome) => outcome,
        Err(e) => {
            step.fail("failed");
            return Err(e.into());
        }
    };

    let message = match outcome.remote_error {
        None => {
            step.finish();
            "License deactivated".to_string()
        }
        Some(ref err) => {
            step.warn("offline");
            format!("Local license removed, but the server could not release it: {err}")
        }
    };

    if ctx.json() {
        json::print(&JsonLicense::new("deactivate", None).with_message(message))?;
    } else if outcome.released_remotely() {
        eprintln!("  {} {}", "\u{2713}".green(), message);
    } else {
        eprintln!("  {} {}", "!".yellow(), message);
    }

    Ok(())
}
