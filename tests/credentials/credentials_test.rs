//! Coverage for credential loading, permission checks and env fallback.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use iym::credentials::{load_credentials, load_optional_credentials, Credentials};

fn write_env(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join(".env");
    if let Err(err) = fs::write(&path, contents) {
        panic!("env file should be written: {err}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(err) = fs::set_permissions(&path, fs::Permissions::from_mode(0o600)) {
            panic!("permissions should be set: {err}");
        }
    }
    path
}

#[test]
fn loads_env_credentials() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let env_path = write_env(
        tmp.path(),
        "FIREWORKS_API_KEY=fw-test\nGROQ_API_KEY=\"gsk-test\"\n",
    );

    let credentials = match load_credentials(&env_path) {
        Ok(credentials) => credentials,
        Err(err) => panic!("credentials should load: {err}"),
    };

    assert_eq!(credentials.get("FIREWORKS_API_KEY"), Some("fw-test"));
    assert_eq!(credentials.get("GROQ_API_KEY"), Some("gsk-test"));
}

#[cfg(unix)]
#[test]
fn rejects_world_readable_env_file() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().expect("should create temp dir");
    let env_path = write_env(tmp.path(), "GROQ_API_KEY=gsk-test\n");
    fs::set_permissions(&env_path, fs::Permissions::from_mode(0o644))
        .expect("permissions should be set");

    let err = match load_credentials(&env_path) {
        Ok(_) => panic!("world-readable credentials must be rejected"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("must be 0600"));
}

#[test]
fn missing_file_is_an_error_for_strict_load() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    assert!(load_credentials(&tmp.path().join(".env")).is_err());
}

#[test]
fn missing_file_is_empty_for_optional_load() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let credentials = match load_optional_credentials(&tmp.path().join(".env")) {
        Ok(credentials) => credentials,
        Err(err) => panic!("missing optional file should be fine: {err}"),
    };
    assert_eq!(credentials.get("GROQ_API_KEY"), None);
}

#[test]
fn resolve_prefers_file_then_environment() {
    let mut vars = BTreeMap::new();
    vars.insert("FIREWORKS_API_KEY".to_owned(), "from-file".to_owned());
    vars.insert("GROQ_API_KEY".to_owned(), "   ".to_owned());
    let credentials = Credentials::from_map(vars);
    let env = |key: &str| match key {
        "FIREWORKS_API_KEY" => Some("from-env".to_owned()),
        "GROQ_API_KEY" => Some("groq-env".to_owned()),
        _ => None,
    };

    assert_eq!(
        credentials.resolve_with("FIREWORKS_API_KEY", env),
        Some("from-file".to_owned())
    );
    assert_eq!(
        credentials.resolve_with("GROQ_API_KEY", env),
        Some("groq-env".to_owned())
    );
    assert_eq!(credentials.resolve_with("OTHER", env), None);
}

#[test]
fn debug_output_redacts_values() {
    let mut vars = BTreeMap::new();
    vars.insert("GROQ_API_KEY".to_owned(), "super-secret".to_owned());
    let rendered = format!("{:?}", Credentials::from_map(vars));
    assert!(rendered.contains("GROQ_API_KEY"));
    assert!(!rendered.contains("super-secret"));
}
