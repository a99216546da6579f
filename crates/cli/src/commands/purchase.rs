//! Purchase command: open the product's purchase page

use anyhow::{bail, Result};
use colored::Colorize;

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let url = ctx.config.product.purchase_url.trim();
    if url.is_empty() {
        bail!("product.purchase_url is not set in entitle.toml");
    }

    eprintln!("{}", "  Opening browser...".bold());

    if let Err(e) = open::that(url) {
        eprintln!("  {} Could not open browser: {}", "Error:".red().bold(), e);
        eprintln!();
    }

    eprintln!("  Get a license key at {}, then run:", url.bold());
    eprintln!("    {}", "entitle activate <KEY>".bold());
    eprintln!();

    Ok(())
}
