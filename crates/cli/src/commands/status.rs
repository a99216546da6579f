//! Status command: show the cached license without contacting the server

use anyhow::Result;
use entitle_core::LicenseStore;

use super::Context;
use crate::output::json::{self, JsonLicense};
use crate::output::terminal;

pub fn run(ctx: &Context) -> Result<()> {
    let record = ctx.store()?.record()?;

    if ctx.json() {
        return json::print(&JsonLicense::new("status", record.as_ref()));
    }

    match record {
        Some(ref record) => terminal::print_license(record, &ctx.config.product),
        None => terminal::print_no_license(&ctx.config.product),
    }
    Ok(())
}
