use std::path::Path;

use tracing::info;

use crate::cli::report::{format_findings, format_rules};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::lint::{error_count, lint, LintOptions};
use crate::settings::Settings;

pub struct LintFlags {
    pub no_errors: bool,
    pub no_warnings: bool,
    pub no_unique_errors: bool,
}

pub fn rules() -> Result<i32> {
    println!("{}", format_rules());
    Ok(0)
}

pub fn run(settings: &Settings, profile: &Path, flags: &LintFlags) -> Result<i32> {
    let ledger = Ledger::open(profile)?;
    let options = LintOptions {
        warnings: !flags.no_warnings,
        unique_errors: !flags.no_unique_errors,
    };
    let findings = lint(ledger.lines(), &options, &settings.classifier());
    let errors = error_count(&findings);
    info!(findings = findings.len(), errors, "linted {}", ledger.path().display());

    print!("{}", format_findings(&findings, errors));
    if errors > 0 && !flags.no_errors {
        return Ok(1);
    }
    Ok(0)
}
