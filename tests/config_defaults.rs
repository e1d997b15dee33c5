use std::error::Error;
use std::fs;

use siteflow::config::{load_and_validate, validate_config, ConfigFile};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn missing_config_file_falls_back_to_defaults() -> TestResult {
    let dir = tempdir()?;
    let cfg = load_and_validate(dir.path().join("Siteflow.toml"))?;

    assert_eq!(cfg.paths.src, "public/src/");
    assert_eq!(cfg.paths.dist, "public/dist/");
    assert_eq!(cfg.paths.build, "build/");
    assert_eq!(cfg.paths.archive, "build.zip");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.reload_port, 1337);
    assert!(cfg.tools.scripts.contains("{mode}"));
    Ok(())
}

#[test]
fn empty_document_deserializes_to_defaults() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Siteflow.toml");
    fs::write(&path, "")?;

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.paths.package, vec!["**/*", ".htaccess"]);
    Ok(())
}

#[test]
fn partial_overrides_keep_remaining_defaults() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Siteflow.toml");
    fs::write(
        &path,
        r#"
[paths]
src = "site/source"

[server]
port = 3000
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    // Roots are normalised to the trailing-slash convention.
    assert_eq!(cfg.paths.src, "site/source/");
    assert_eq!(cfg.paths.dist, "public/dist/");
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.server.reload_port, 1337);
    Ok(())
}

#[test]
fn empty_path_root_is_rejected() -> TestResult {
    let mut cfg = ConfigFile::default();
    cfg.paths.dist = "  ".to_string();
    assert!(validate_config(&mut cfg).is_err());
    Ok(())
}

#[test]
fn empty_tool_command_is_rejected() -> TestResult {
    let mut cfg = ConfigFile::default();
    cfg.tools.styles = String::new();
    let err = validate_config(&mut cfg).unwrap_err();
    assert!(err.to_string().contains("styles"));
    Ok(())
}

#[test]
fn invalid_package_glob_is_rejected() -> TestResult {
    let mut cfg = ConfigFile::default();
    cfg.paths.package = vec!["a[".to_string()];
    assert!(validate_config(&mut cfg).is_err());
    Ok(())
}

#[test]
fn empty_package_glob_list_is_rejected() -> TestResult {
    let mut cfg = ConfigFile::default();
    cfg.paths.package.clear();
    assert!(validate_config(&mut cfg).is_err());
    Ok(())
}
