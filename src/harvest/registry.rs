// src/harvest/registry.rs
use crate::directory::models::PageGroup;
use crate::utils::error::AppError;
use std::fs;
use std::path::Path;

/// First character of a line that opens a new school group.
pub const REGISTRY_MARKER: char = '#';

/// Reads and parses the registry file.
pub fn load_registry<P: AsRef<Path>>(path: P, marker: char) -> Result<Vec<PageGroup>, AppError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Cannot read registry {}: {}", path.display(), e))
    })?;

    let groups = parse_registry(&source, marker)?;
    tracing::info!(
        "Loaded {} schools ({} pages) from {}",
        groups.len(),
        groups.iter().map(|g| g.urls.len()).sum::<usize>(),
        path.display()
    );
    Ok(groups)
}

/// Splits registry text into school groups.
///
/// A marker line starts a group named by the rest of the line; every other
/// non-blank line is a page URL of the current group. Groups without pages
/// are dropped. Empty input, a first line that is not a marker, or no
/// pages at all are configuration errors.
pub fn parse_registry(source: &str, marker: char) -> Result<Vec<PageGroup>, AppError> {
    let mut lines = source.lines().map(str::trim).filter(|l| !l.is_empty());

    let first = lines
        .next()
        .ok_or_else(|| AppError::Config("Registry is empty".to_string()))?;
    let school = first.strip_prefix(marker).ok_or_else(|| {
        AppError::Config(format!(
            "Registry must start with a '{}' school line, found '{}'",
            marker, first
        ))
    })?;

    let mut groups = vec![PageGroup::new(school.trim())];
    for line in lines {
        match line.strip_prefix(marker) {
            Some(school) => groups.push(PageGroup::new(school.trim())),
            None => {
                if let Some(current) = groups.last_mut() {
                    current.urls.push(line.to_string());
                }
            }
        }
    }

    groups.retain(|g| {
        if g.urls.is_empty() {
            tracing::debug!("Dropping school without pages: {}", g.school);
        }
        !g.urls.is_empty()
    });

    if groups.is_empty() {
        return Err(AppError::Config("Registry lists no page URLs".to_string()));
    }
    Ok(groups)
}
