use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{PurseError, Result};

pub const EDITOR_ENV: &str = "EDITOR";

/// Split an `$EDITOR` value into program and arguments.
fn editor_command(value: Option<String>) -> Result<(String, Vec<String>)> {
    let value = value.ok_or(PurseError::EditorUnset)?;
    let mut parts = value.split_whitespace().map(str::to_string);
    let program = parts
        .next()
        .ok_or_else(|| PurseError::EditorPermission(value.clone()))?;
    Ok((program, parts.collect()))
}

/// Open `path` in `$EDITOR` and wait for it to exit. The file is not read
/// back here.
pub fn open_in_editor(path: &Path) -> Result<()> {
    let (program, args) = editor_command(std::env::var(EDITOR_ENV).ok())?;
    info!(editor = %program, path = %path.display(), "spawning editor");

    let status = Command::new(&program)
        .args(&args)
        .arg(path)
        .status()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => PurseError::EditorNotFound(program.clone()),
            ErrorKind::PermissionDenied => PurseError::EditorPermission(program.clone()),
            _ => PurseError::Io(e),
        })?;

    if !status.success() {
        return Err(PurseError::EditorFailed {
            program,
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
