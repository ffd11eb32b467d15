use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

/// Read a loan document from a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let file = existing_file(path)?;
    let contents = fs::read_to_string(&file)
        .map_err(|e| format!("Cannot read '{}': {}", file.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| {
        format!(
            "'{}' is not a valid {} document: {}",
            file.display(),
            short_type_name::<T>(),
            e
        )
        .into()
    })
}

fn existing_file(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let file = std::env::current_dir()?.join(path);
    if !file.is_file() {
        return Err(format!("No such input file: {}", file.display()).into());
    }
    Ok(file)
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
