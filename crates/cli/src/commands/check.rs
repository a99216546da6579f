//! Check command: refresh the license from the server

use anyhow::Result;

use super::Context;
use crate::output::json::{self, JsonLicense};
use crate::output::terminal;
use crate::progress::Step;

pub fn run(ctx: &Context) -> Result<()> {
    let manager = ctx.manager()?;
    let step = Step::new("Checking license", ctx.json());

    let record = match manager.check() {
        Ok(record) => record,
        Err(e) => {
            step.fail("failed");
            return Err(e.into());
        }
    };
    step.finish();

    match (&record, ctx.json()) {
        (Some(record), true) => json::print(&JsonLicense::new("check", Some(record)))?,
        (None, true) => {
            json::print(&JsonLicense::new("check", None).with_message("No license found"))?
        }
        (Some(record), false) => terminal::print_license(record, &ctx.config.product),
        (None, false) => terminal::print_no_license(&ctx.config.product),
    }

    Ok(())
}
