use super::*;
use std::fs;
use tempfile::TempDir;

const NOW_MILLIS: i64 = 1_760_000_000_000;

fn store(json: &str) -> AuthStore {
    AuthStore::from_json(json).unwrap()
}

#[test]
fn test_candidate_paths_with_xdg_first() {
    let paths = candidate_auth_paths(Some(Path::new("/xdg")), Some(Path::new("/home/u")));
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/xdg/opencode/auth.json"),
            PathBuf::from("/home/u/.local/share/opencode/auth.json"),
            PathBuf::from("/home/u/Library/Application Support/opencode/auth.json"),
        ]
    );
}

#[test]
fn test_candidate_paths_without_xdg() {
    let paths = candidate_auth_paths(None, Some(Path::new("/home/u")));
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0], PathBuf::from("/home/u/.local/share/opencode/auth.json"));
}

#[test]
fn test_load_auth_store_skips_missing_first_candidate() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    let present = dir.path().join("auth.json");
    fs::write(
        &present,
        r#"{"anthropic":{"type":"oauth","refresh":"r","access":"tok","expires":1}}"#,
    )
    .unwrap();

    let loaded = load_auth_store(&[missing, present]).unwrap();
    assert_eq!(
        loaded.entry(Provider::Claude),
        Some(AuthEntry::OAuth {
            refresh: "r".to_string(),
            access: "tok".to_string(),
            expires: 1,
            account_id: None,
        })
    );
}

#[test]
fn test_load_auth_store_skips_invalid_json() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.json");
    let valid = dir.path().join("valid.json");
    fs::write(&broken, "{not json").unwrap();
    fs::write(&valid, r#"{"openai":{"type":"api","key":"sk"}}"#).unwrap();

    let loaded = load_auth_store(&[broken, valid]).unwrap();
    assert_eq!(
        loaded.entry(Provider::Codex),
        Some(AuthEntry::Api {
            key: "sk".to_string()
        })
    );
}

#[test]
fn test_load_auth_store_first_match_wins() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    fs::write(&first, r#"{"openai":{"type":"api","key":"first"}}"#).unwrap();
    fs::write(&second, r#"{"openai":{"type":"api","key":"second"}}"#).unwrap();

    let loaded = load_auth_store(&[first, second]).unwrap();
    assert_eq!(
        loaded.entry(Provider::Codex),
        Some(AuthEntry::Api {
            key: "first".to_string()
        })
    );
}

#[test]
fn test_load_auth_store_exhausted() {
    let dir = TempDir::new().unwrap();
    let err = load_auth_store(&[dir.path().join("a.json"), dir.path().join("b.json")]).unwrap_err();
    assert_eq!(err, UsageError::CredentialsNotFound);
    assert_eq!(
        err.to_string(),
        "No auth.json found. Is OpenCode installed and authenticated?"
    );
}

#[test]
fn test_load_auth_store_no_candidates() {
    assert_eq!(
        load_auth_store(&[]).unwrap_err(),
        UsageError::CredentialsNotFound
    );
}

#[test]
fn test_resolve_auth_not_expired() {
    let store = store(&format!(
        r#"{{"anthropic":{{"type":"oauth","refresh":"r","access":"tok","expires":{}}}}}"#,
        NOW_MILLIS + 60_000
    ));
    let auth = resolve_auth(&store, Provider::Claude, NOW_MILLIS).unwrap();
    assert_eq!(auth.access_token, "tok");
    assert!(!auth.expired);
}

#[test]
fn test_resolve_auth_expired() {
    let store = store(&format!(
        r#"{{"anthropic":{{"type":"oauth","refresh":"r","access":"tok","expires":{}}}}}"#,
        NOW_MILLIS - 1
    ));
    let auth = resolve_auth(&store, Provider::Claude, NOW_MILLIS).unwrap();
    assert!(auth.expired);
}

#[test]
fn test_resolve_auth_missing_entry() {
    let store = store(r#"{"openai":{"type":"api","key":"sk"}}"#);
    assert_eq!(resolve_auth(&store, Provider::Claude, NOW_MILLIS), None);
}

#[test]
fn test_resolve_auth_api_key_is_unusable() {
    let store = store(r#"{"openai":{"type":"api","key":"sk"}}"#);
    assert_eq!(resolve_auth(&store, Provider::Codex, NOW_MILLIS), None);
}

#[test]
fn test_resolve_auth_unknown_entry_type_is_missing() {
    let store = store(
        r#"{"anthropic":{"type":"wellknown","token":"x"},
            "openai":{"type":"oauth","refresh":"r","access":"tok","expires":1}}"#,
    );
    assert_eq!(resolve_auth(&store, Provider::Claude, NOW_MILLIS), None);
    assert!(resolve_auth(&store, Provider::Codex, NOW_MILLIS).is_some());
}

#[test]
fn test_resolve_codex_passes_account_id() {
    let store = store(
        r#"{"openai":{"type":"oauth","refresh":"r","access":"tok","expires":1,"accountId":"acct-1"}}"#,
    );
    let auth = resolve_auth(&store, Provider::Codex, 0).unwrap();
    assert_eq!(auth.account_id.as_deref(), Some("acct-1"));
}

#[test]
fn test_resolve_claude_never_reports_account_id() {
    let store = store(
        r#"{"anthropic":{"type":"oauth","refresh":"r","access":"tok","expires":1,"accountId":"acct-1"}}"#,
    );
    let auth = resolve_auth(&store, Provider::Claude, 0).unwrap();
    assert_eq!(auth.account_id, None);
}
