//! Font utilities for loading TrueType fonts

use std::path::{Path, PathBuf};

use ttf_parser::Face;

use crate::error::{LabelError, LabelResult};

/// File name of the regular Unicode face
pub const DEJAVU_SANS: &str = "DejaVuSans.ttf";

/// File name of the bold Unicode face
pub const DEJAVU_SANS_BOLD: &str = "DejaVuSans-Bold.ttf";

/// Load TTF/OTF font from file path
pub fn load_font_file(path: &Path) -> LabelResult<Vec<u8>> {
    if !path.exists() {
        return Err(LabelError::FontError(format!(
            "Font file not found: {}",
            path.display()
        )));
    }

    let font_data = std::fs::read(path).map_err(|e| {
        LabelError::FontError(format!("Failed to read font file {}: {}", path.display(), e))
    })?;

    // Validate font using ttf-parser
    Face::parse(&font_data, 0).map_err(|e| {
        LabelError::FontError(format!("Invalid font file {}: {}", path.display(), e))
    })?;

    Ok(font_data)
}

/// Look for `assets/fonts/<file>` in `start` and up to nine of its parents
fn find_in_ancestors(start: &Path, font_filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .take(10)
        .map(|dir| dir.join("assets").join("fonts").join(font_filename))
        .find(|candidate| candidate.exists())
}

/// Helper function to find font in assets/fonts directory
/// Searches from current working directory up, then from the executable location
fn find_font_in_assets(font_filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_in_ancestors(&cwd, font_filename) {
            return Some(path);
        }
    }

    // Also try from executable location (for installed binaries)
    let exe_path = std::env::current_exe().ok()?;
    find_in_ancestors(exe_path.parent()?, font_filename)
}

/// Well-known system locations for a DejaVu file
fn system_font_paths(font_filename: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = [
        "/usr/share/fonts/truetype/dejavu",
        "/usr/share/fonts/TTF",
        "/usr/share/fonts/dejavu",
        "/usr/local/share/fonts",
        "C:/Windows/Fonts",
    ]
    .iter()
    .map(|dir| Path::new(dir).join(font_filename))
    .collect();
    // macOS ships the family with spaces in the file name
    let mac_name = font_filename
        .trim_end_matches(".ttf")
        .replace("DejaVuSans", "DejaVu Sans")
        .replace('-', " ");
    paths.push(Path::new("/System/Library/Fonts/Supplemental").join(format!("{mac_name}.ttf")));
    paths
}

/// Find a font file: project assets first, then system locations
pub fn find_font(font_filename: &str) -> Option<PathBuf> {
    find_font_in_assets(font_filename)
        .or_else(|| system_font_paths(font_filename).into_iter().find(|p| p.exists()))
}

/// Try to find DejaVu Sans font
pub fn find_dejavu_sans() -> Option<PathBuf> {
    find_font(DEJAVU_SANS)
}

/// Try to find DejaVu Sans Bold font
pub fn find_dejavu_sans_bold() -> Option<PathBuf> {
    find_font(DEJAVU_SANS_BOLD)
}

/// Font name from the `name` table: PostScript name, else family, else `fallback`
pub fn font_name_from_face(face: &Face, fallback: &str) -> String {
    let lookup = |id: u16| {
        face.names()
            .into_iter()
            .find(|name| name.name_id == id)
            .and_then(|name| name.to_string())
    };
    // 6 = PostScript name, 1 = family
    lookup(6)
        .or_else(|| lookup(1))
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_font_error() {
        let err = load_font_file(Path::new("/nonexistent/dir/NoSuchFont.ttf")).unwrap_err();
        assert!(matches!(err, LabelError::FontError(_)));
    }

    #[test]
    fn test_non_font_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("not-a-font-{}.ttf", std::process::id()));
        std::fs::write(&path, b"definitely not a font").unwrap();
        let result = load_font_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LabelError::FontError(_))));
    }

    #[test]
    fn test_system_paths_include_mac_naming() {
        let paths = system_font_paths(DEJAVU_SANS_BOLD);
        assert!(paths
            .iter()
            .any(|p| p.ends_with("DejaVu Sans Bold.ttf")));
        assert!(paths
            .iter()
            .any(|p| p.ends_with("dejavu/DejaVuSans-Bold.ttf")));
    }
}
