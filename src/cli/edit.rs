use std::path::Path;

use crate::editor::open_in_editor;
use crate::error::{PurseError, Result};
use crate::ledger::Ledger;

pub fn run(profile: &Path, sort: bool) -> Result<i32> {
    if sort {
        let diff = Ledger::open(profile)?.sort_in_place()?;
        print!("{diff}");
        return Ok(0);
    }
    if !profile.exists() {
        return Err(PurseError::MissingProfile(profile.to_path_buf()));
    }
    open_in_editor(profile)?;
    Ok(0)
}
