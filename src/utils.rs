use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Seed derived from the wall clock, used when none is given.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// The label file name for an image: its basename with a `.txt` extension.
pub fn label_file_name(image_filename: &str) -> String {
    let stem = Path::new(image_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(image_filename);
    format!("{}.txt", stem)
}

/// True when `name` is a single path component that can be joined safely.
pub fn is_bare_file_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.file_name().and_then(|s| s.to_str()) == Some(name)
}
