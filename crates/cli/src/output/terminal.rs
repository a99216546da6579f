//! Terminal output formatting

use chrono::{Local, NaiveDate};
use colored::Colorize;
use entitle_core::{Expiry, LicenseRecord, ProductConfig};

/// One line of the license summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine {
    /// `false` renders with a cross and in red.
    pub ok: bool,
    pub text: String,
}

impl InfoLine {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: text.into(),
        }
    }

    fn problem(text: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: text.into(),
        }
    }
}

/// `"2026-03-01 23:59:59"` -> `"Mar 01, 2026"`; anything unparseable is returned as-is.
pub fn format_day(raw: &str) -> String {
    let day = raw.split_whitespace().next().unwrap_or(raw);
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => date.format("%b %d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Summary lines for `record` as of `today`.
pub fn license_lines(
    record: &LicenseRecord,
    product: &ProductConfig,
    today: NaiveDate,
) -> Vec<InfoLine> {
    let mut lines = Vec::new();

    if record.is_valid() {
        lines.push(InfoLine::ok(if record.is_local_environment {
            "Activated (staging domain)"
        } else {
            "Activated"
        }));
    } else {
        lines.push(InfoLine::problem(format!("License {}", record.status)));
    }

    if let Some(ref purchased) = record.date_purchased {
        lines.push(InfoLine::ok(format!("Purchased on {}", format_day(purchased))));
    }

    if let Some(ref support) = record.support_until {
        let day = format_day(&support.to_string());
        if support.is_past(today) {
            lines.push(InfoLine::problem(with_link(
                format!("Support Expired Since {day}"),
                "Renew Support",
                &product.renew_support_url,
            )));
        } else if support.is_lifetime() {
            lines.push(InfoLine::ok(with_link(
                "Lifetime Support".to_string(),
                "Get Support",
                &product.support_url,
            )));
        } else {
            lines.push(InfoLine::ok(with_link(
                format!("Supported Until {day}"),
                "Get Support",
                &product.support_url,
            )));
        }
    }

    if let Some(ref updates) = record.updates_until {
        match updates {
            Expiry::Lifetime => lines.push(InfoLine::ok("Lifetime Updates")),
            Expiry::On(raw) if updates.is_past(today) => {
                lines.push(InfoLine::problem(format!("Updates Expired on {}", format_day(raw))))
            }
            Expiry::On(raw) => {
                lines.push(InfoLine::ok(format!("Updates Provided Till {}", format_day(raw))))
            }
        }
    }

    if let Some(ref expires) = record.expires {
        match expires {
            Expiry::Lifetime => lines.push(InfoLine::ok("Lifetime License")),
            Expiry::On(raw) => lines.push(InfoLine::ok(format!("Expires: {raw}"))),
        }
    }

    if let (Some(sites), Some(limit)) = (record.site_count, record.license_limit) {
        if record.has_unlimited_activations() {
            lines.push(InfoLine::ok("Unlimited Activations"));
        } else {
            lines.push(InfoLine::ok(format!("Activations: {sites}/{limit}")));
        }
    }

    lines
}

fn with_link(text: String, label: &str, url: &str) -> String {
    if url.is_empty() {
        text
    } else {
        format!("{text} ({label}: {url})")
    }
}

pub fn print_license(record: &LicenseRecord, product: &ProductConfig) {
    let today = Local::now().date_naive();
    eprintln!("  {}: {}", "Key".bold(), mask_key(&record.key).dimmed());
    for line in license_lines(record, product, today) {
        if line.ok {
            eprintln!("  {} {}", "\u{2713}".green(), line.text);
        } else {
            eprintln!("  {} {}", "\u{2715}".red(), line.text.red());
        }
    }
    eprintln!();
}

/// Shown when nothing is activated.
pub fn print_no_license(product: &ProductConfig) {
    eprintln!("  {}", "No license activated.".yellow());
    if product.purchase_url.is_empty() {
        eprintln!("  Enter your license key: {}", "entitle activate <KEY>".bold());
    } else {
        eprintln!(
            "  Enter your license key with {} or get one at {}",
            "entitle activate <KEY>".bold(),
            product.purchase_url.bold()
        );
    }
    eprintln!();
}

/// Keeps the last four characters of a key visible.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return key.to_string();
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
