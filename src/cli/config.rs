use crate::editor::open_in_editor;
use crate::error::Result;
use crate::settings::{save_settings_to, settings_path, Settings};

pub fn show(settings: &Settings) -> Result<i32> {
    println!("Settings file: {}", settings_path().display());
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(0)
}

/// Open the settings file, writing the current values first if it does not
/// exist yet.
pub fn edit(settings: &Settings) -> Result<i32> {
    let path = settings_path();
    if !path.exists() {
        save_settings_to(settings, &path)?;
    }
    open_in_editor(&path)?;
    Ok(0)
}
