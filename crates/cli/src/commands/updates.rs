//! Updates command: compare the installed version with the server's

use anyhow::{bail, Result};
use colored::Colorize;
use entitle_core::{check_for_update, UpdateStatus};

use super::Context;
use crate::output::json::{self, JsonUpdate};
use crate::progress::Step;

pub fn run(ctx: &Context, current: Option<&str>, refresh: bool) -> Result<()> {
    let Some(current) = current.or(ctx.config.product.version.as_deref()) else {
        bail!("No installed version known; pass --current or set product.version in entitle.toml");
    };

    let cache = ctx.update_cache()?;
    if refresh {
        cache.clear()?;
    }

    let manager = ctx.manager()?;
    let step = Step::new("Checking for updates", ctx.json());
    let status = match check_for_update(&manager, Some(&cache), current) {
        Ok(status) => status,
        Err(e) => {
            step.fail("failed");
            return Err(e.into());
        }
    };
    step.finish();

    let purchase_url = &ctx.config.product.purchase_url;
    if ctx.json() {
        return json::print(&JsonUpdate::from_status(&status, purchase_url));
    }

    match status {
        UpdateStatus::Available { current, info } => {
            let latest = info.version.as_deref().unwrap_or("?");
            eprintln!(
                "  {} Version {} is available (installed: {})",
                "\u{2191}".cyan(),
                latest.bold(),
                current
            );
            match info.package() {
                Some(url) => eprintln!("  {}: {}", "Download".bold(), url),
                None if purchase_url.is_empty() => {
                    eprintln!("  {}", "Automatic update is unavailable for this product.".yellow())
                }
                None => eprintln!(
                    "  {} Activate a license or purchase one at {}",
                    "Automatic update is unavailable for this product.".yellow(),
                    purchase_url.bold()
                ),
            }
        }
        UpdateStatus::UpToDate { current, .. } => {
            eprintln!("  {} Up to date ({})", "\u{2713}".green(), current);
        }
    }
    eprintln!();

    Ok(())
}
