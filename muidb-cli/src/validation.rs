use std::path::Path;

use unic_langid::LanguageIdentifier;

/// Validate language code format using unic-langid.
///
/// The database itself stores any non-empty code; the CLI is stricter so
/// that typos like `--lang e` or `--lang en_` never reach a file.
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(lang_id) => {
            let lang_str = lang_id.to_string();
            if lang_str.starts_with('-') || lang_str.ends_with('-') {
                return Err(invalid_language(lang));
            }
            Ok(())
        }
        Err(_) => Err(invalid_language(lang)),
    }
}

fn invalid_language(lang: &str) -> String {
    format!(
        "Invalid language code format: {}. Expected valid BCP 47 language identifier",
        lang
    )
}

/// Validate file path exists and is a regular file
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        return Err(format!("Cannot create output directory: {}", e));
    }

    Ok(())
}
