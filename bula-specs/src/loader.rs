//! Fixture file loading.

use std::fs;
use std::path::Path;

use crate::{BulaFixture, SpecError};

/// Parse fixture TOML.
pub fn parse_fixture(content: &str) -> Result<BulaFixture, SpecError> {
    toml::from_str(content).map_err(|e| SpecError::from_toml(content, e))
}

/// Load a single fixture file.
pub fn load_fixture(path: &Path) -> Result<BulaFixture, SpecError> {
    let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_fixture(&content)
}

/// Load all fixtures from a directory (glob: **/*.toml), sorted by relative
/// path.
pub fn load_all_fixtures(dir: &Path) -> Result<Vec<(String, BulaFixture)>, SpecError> {
    let mut fixtures = Vec::new();
    load_fixtures_recursive(dir, dir, &mut fixtures)?;
    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(fixtures)
}

fn load_fixtures_recursive(
    base: &Path,
    dir: &Path,
    fixtures: &mut Vec<(String, BulaFixture)>,
) -> Result<(), SpecError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let read_error = |e: std::io::Error| SpecError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();

        if path.is_dir() {
            load_fixtures_recursive(base, &path, fixtures)?;
        } else if path.extension().map_or(false, |e| e == "toml") {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let fixture = load_fixture(&path)?;
            fixtures.push((relative.display().to_string(), fixture));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("patient")
            .join("identical-patient.toml");
        let fixture = load_fixture(&path).unwrap();
        assert!(fixture.title.is_some());
        assert!(!fixture.expect.is_empty());
    }

    #[test]
    fn test_load_all_fixtures() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let fixtures = load_all_fixtures(&dir).unwrap();
        assert!(fixtures.len() >= 6);
        assert!(fixtures.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(fixtures
            .iter()
            .any(|(name, _)| name.ends_with("efficacy-not-required.toml")));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let fixtures = load_all_fixtures(Path::new("/nonexistent/fixtures")).unwrap();
        assert!(fixtures.is_empty());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            "title = \"broken\"\n\n[reference]\ntext = \"x\"\n\n[target]\ntext = 3\n"
        )
        .unwrap();

        match load_fixture(&path) {
            Err(SpecError::Parse { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected a parse error, got {:?}", other.map(|f| f.title)),
        }
    }

    #[test]
    fn test_unreadable_file() {
        let err = load_fixture(Path::new("/nonexistent/fixture.toml")).unwrap_err();
        assert!(matches!(err, SpecError::Load { .. }));
    }
}
