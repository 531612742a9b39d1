use std::io::Write;
use std::path::Path;

use retable::{config::Settings, types::RenamePlan};
use tempfile::NamedTempFile;

pub const RENAME_SCRIPT: &str = r#"-- software_licenses -> accounts
CREATE TABLE software_licenses_backup AS TABLE software_licenses;
ALTER TABLE software_licenses RENAME TO accounts;
"#;

pub fn script_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

pub fn settings_with_script(script: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.migration.script_path = script.to_path_buf();
    settings
}

pub fn plan_with_script(script: &Path) -> RenamePlan {
    Settings::default().migration.to_plan(Some(script.to_path_buf()))
}
