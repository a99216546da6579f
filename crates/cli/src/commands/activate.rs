//! Activate command: bind a license key to this installation

use anyhow::{bail, Result};
use colored::Colorize;

use super::Context;
use crate::output::json::{self, JsonLicense};
use crate::output::terminal;
use crate::progress::Step;

pub fn run(ctx: &Context, key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        bail!("License key is required");
    }

    let manager = ctx.manager()?;
    let step = Step::new("Activating license", ctx.json());

    let record = match manager.activate(key) {
        Ok(record) => record,
        Err(e) => {
            step.fail("failed");
            return Err(e.into());
        }
    };

    if record.is_valid() {
        step.finish();
    } else {
        step.warn("not activated");
    }

    if ctx.json() {
        json::print(&JsonLicense::new("activate", Some(&record)))?;
    } else {
        terminal::print_license(&record, &ctx.config.product);
    }

    if !record.is_valid() {
        if !ctx.json() {
            eprintln!(
                "  {}",
                "The previously activated license, if any, was kept.".dimmed()
            );
        }
        bail!("license not activated: {}", record.status);
    }

    Ok(())
}
