//! profile::ini
//!
//! Minimal reader/writer for the INI-like profile files.
//!
//! # Format
//!
//! ```text
//! [default]
//! access_key_id=AKID...
//! access_key_secret=...
//!
//! [profile staging]
//! access_key_id=AKID...
//! ```
//!
//! Sections are `[default]` or `[profile <name>]`. Values are bare
//! `key=value` lines; whitespace around keys and values is trimmed.
//! Writers edit matching lines in place so unrelated sections, comments
//! and unknown keys survive a rewrite, then replace the file atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// The section header for a profile name.
pub fn section_name(profile: &str) -> String {
    if profile == "default" {
        "default".to_string()
    } else {
        format!("profile {}", profile)
    }
}

/// Read every `key=value` entry of one section. Missing file or section
/// reads as empty.
pub fn read_section(contents: &str, section: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    let mut in_section = false;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(header) = parse_header(line) {
            in_section = header == section;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    values
}

/// Set `values` inside `section` of the file at `path`, creating the
/// file, its parent directory, or the section as needed.
pub fn set_values(
    path: &Path,
    section: &str,
    values: &BTreeMap<String, String>,
) -> std::io::Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut lines: Vec<String> = match fs::read_to_string(path) {
        Ok(contents) => contents.lines().map(str::to_string).collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e),
    };

    let mut pending = values.clone();
    if let Some((start, end)) = section_bounds(&lines, section) {
        // Rewrite lines that already carry one of the keys.
        for line in &mut lines[start..end] {
            let Some((key, _)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_string();
            if let Some(value) = pending.remove(&key) {
                *line = format!("{}={}", key, value);
            }
        }
        // Append the rest at the section end.
        let mut insert_at = end;
        for (key, value) in &pending {
            lines.insert(insert_at, format!("{}={}", key, value));
            insert_at += 1;
        }
    } else {
        if !lines.is_empty() && !lines.last().map(|l| l.is_empty()).unwrap_or(true) {
            lines.push(String::new());
        }
        lines.push(format!("[{}]", section));
        for (key, value) in &pending {
            lines.push(format!("{}={}", key, value));
        }
    }

    write_atomic(path, &lines)
}

/// Bounds of the section body: (first line after the header, line index
/// of the next header or EOF).
fn section_bounds(lines: &[String], section: &str) -> Option<(usize, usize)> {
    let start = lines
        .iter()
        .position(|l| parse_header(l.trim()) == Some(section.to_string()))?
        + 1;
    let end = lines[start..]
        .iter()
        .position(|l| parse_header(l.trim()).is_some())
        .map(|offset| start + offset)
        .unwrap_or(lines.len());
    Some((start, end))
}

fn parse_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.trim().to_string())
}

fn write_atomic(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    file.sync_all()?;
    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn section_names() {
        assert_eq!(section_name("default"), "default");
        assert_eq!(section_name("staging"), "profile staging");
    }

    #[test]
    fn read_default_section() {
        let contents = "[default]\naccess_key_id=AKID\nregion = cn-hangzhou\n";
        let values = read_section(contents, "default");
        assert_eq!(values.get("access_key_id").unwrap(), "AKID");
        assert_eq!(values.get("region").unwrap(), "cn-hangzhou");
    }

    #[test]
    fn read_named_profile_section() {
        let contents = "[default]\nregion=a\n\n[profile staging]\nregion=b\n";
        let values = read_section(contents, "profile staging");
        assert_eq!(values.get("region").unwrap(), "b");
    }

    #[test]
    fn missing_section_reads_empty() {
        assert!(read_section("[default]\nregion=a\n", "profile x").is_empty());
    }

    #[test]
    fn comments_and_blanks_skipped() {
        let contents = "[default]\n# a comment\n\nregion=a\n";
        let values = read_section(contents, "default");
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn set_values_creates_file_and_section() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        let mut values = BTreeMap::new();
        values.insert("region".to_string(), "cn-hangzhou".to_string());
        set_values(&path, "default", &values).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(read_section(&contents, "default").get("region").unwrap(), "cn-hangzhou");
    }

    #[test]
    fn set_values_updates_in_place() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        fs::write(&path, "[default]\nregion=old\noutput=json\n").unwrap();

        let mut values = BTreeMap::new();
        values.insert("region".to_string(), "new".to_string());
        set_values(&path, "default", &values).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let section = read_section(&contents, "default");
        assert_eq!(section.get("region").unwrap(), "new");
        assert_eq!(section.get("output").unwrap(), "json");
    }

    #[test]
    fn set_values_appends_new_section_without_touching_others() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        fs::write(&path, "[default]\nregion=a\n").unwrap();

        let mut values = BTreeMap::new();
        values.insert("region".to_string(), "b".to_string());
        set_values(&path, "profile staging", &values).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(read_section(&contents, "default").get("region").unwrap(), "a");
        assert_eq!(
            read_section(&contents, "profile staging").get("region").unwrap(),
            "b"
        );
    }

    #[test]
    fn new_key_lands_inside_its_section() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        fs::write(&path, "[default]\nregion=a\n[profile x]\nregion=b\n").unwrap();

        let mut values = BTreeMap::new();
        values.insert("output".to_string(), "table".to_string());
        set_values(&path, "default", &values).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let section = read_section(&contents, "default");
        assert_eq!(section.get("output").unwrap(), "table");
        assert!(read_section(&contents, "profile x").get("output").is_none());
    }
}
