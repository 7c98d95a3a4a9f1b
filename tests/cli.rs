use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.yaml");
    let contents = "tenant_id: tenant-1\nclient_id: client-1\nclient_secret: s3cret\n";
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn dirq() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dirq"));
    cmd.env_remove("DIRQ_CONFIG")
        .env_remove("DIRQ_GRAPH_HOST")
        .env_remove("DIRQ_LOGIN_HOST")
        .env_remove("DIRQ_DEBUG");
    cmd
}

#[test]
fn version_prints_package_version() {
    dirq()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dirq version"));
}

#[test]
fn status_uses_custom_config_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path());

    let assert = dirq()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));
    assert!(stdout.contains("tenant-1"));
    assert!(stdout.contains("Ready to query the directory"));

    Ok(())
}

#[test]
fn status_reports_missing_configuration() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = temp.path().join("absent.yaml");

    dirq()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("dirq init"));

    Ok(())
}

#[test]
fn get_user_rejects_conflicting_identity_flags() {
    // Two identifying flags is a usage error before any directory call
    dirq()
        .arg("get-user")
        .arg("--networkid")
        .arg("alice.jones")
        .arg("--email")
        .arg("a@b.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn get_user_requires_an_identity_flag() {
    dirq()
        .arg("get-user")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn http_request_reports_unsupported_method_without_failing() {
    dirq()
        .arg("http-request")
        .arg("--method")
        .arg("PATCH")
        .arg("--url")
        .arg("http://127.0.0.1:9/unused")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unsupported HTTP method"));
}

#[test]
fn http_request_renders_indented_and_flat_views() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "ok", "checks": {"db": true}}"#)
        .create();

    let assert = dirq()
        .arg("http-request")
        .arg("--method")
        .arg("GET")
        .arg("--url")
        .arg(format!("{}/health", server.url()))
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Request succeeded!"));
    // Indented view
    assert!(stdout.contains("\"status\": \"ok\""));
    // Flattened single-row view
    assert!(stdout.contains("checks.db"));

    Ok(())
}

#[test]
fn http_request_reports_failure_status_without_escalating()
-> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body(r#"{"error": "not found"}"#)
        .create();

    dirq()
        .arg("http-request")
        .arg("--method")
        .arg("GET")
        .arg("--url")
        .arg(format!("{}/missing", server.url()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Request failed with status code"));

    Ok(())
}

#[test]
fn http_request_sends_body_for_post() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", "/items")
        .match_header("content-type", "application/json")
        .match_body(r#"{"name": "new"}"#)
        .with_status(200)
        .with_body(r#"{"created": true}"#)
        .create();

    dirq()
        .arg("http-request")
        .arg("--method")
        .arg("post")
        .arg("--url")
        .arg(format!("{}/items", server.url()))
        .arg("--body")
        .arg(r#"{"name": "new"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Request succeeded!"));

    mock.assert();

    Ok(())
}

fn mock_token(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("POST", "/tenant-1/oauth2/v2.0/token")
        .with_status(200)
        .with_body(r#"{"access_token": "tok-1", "expires_in": 3600, "token_type": "Bearer"}"#)
        .create()
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn get_user_not_found_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _token = mock_token(&mut server);

    let _users = server
        .mock("GET", "/v1.0/users")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"value": []}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path());

    dirq()
        .arg("get-user")
        .arg("--networkid")
        .arg("alice.jones")
        .arg("--config")
        .arg(&config_path)
        .env("DIRQ_GRAPH_HOST", server.url())
        .env("DIRQ_LOGIN_HOST", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("User not found."));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn group_members_csv_skips_non_user_members() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _token = mock_token(&mut server);

    let _groups = server
        .mock("GET", "/v1.0/groups")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"value": [{"id": "g-1", "displayName": "Engineering"}]}"#)
        .create();

    let _members = server
        .mock("GET", "/v1.0/groups/g-1/members")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r##"{"value": [
                {"@odata.type": "#microsoft.graph.user", "id": "u-1"},
                {"@odata.type": "#microsoft.graph.device", "id": "d-1"},
                {"@odata.type": "#microsoft.graph.user", "id": "u-2"}
            ]}"##,
        )
        .create();

    let _detail_1 = server
        .mock("GET", "/v1.0/users/u-1")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"id": "u-1", "displayName": "Alice Jones", "onPremisesSamAccountName": "alice.jones", "mail": "alice@example.com"}"#,
        )
        .create();

    let _detail_2 = server
        .mock("GET", "/v1.0/users/u-2")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"id": "u-2", "displayName": "Bob Smith", "onPremisesSamAccountName": "bob.smith", "mail": "bob@example.com"}"#,
        )
        .create();

    let _managers = server
        .mock(
            "GET",
            mockito::Matcher::Regex(r"^/v1\.0/users/u-\d+/manager$".to_string()),
        )
        .match_query(mockito::Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error": {"code": "Request_ResourceNotFound", "message": "manager not set"}}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path());
    let export_dir = tempdir()?;

    dirq()
        .arg("get-group")
        .arg("members")
        .arg("--group")
        .arg("Eng")
        .arg("--csv")
        .arg(export_dir.path())
        .arg("--config")
        .arg(&config_path)
        .env("DIRQ_GRAPH_HOST", server.url())
        .env("DIRQ_LOGIN_HOST", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported members to:"));

    let csv_path = export_dir.path().join("Eng.csv");
    let contents = fs::read_to_string(&csv_path)?;
    let lines: Vec<&str> = contents.lines().collect();

    // Header plus the two user-typed members; the device is skipped
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "DisplayName,NetworkID,Email,Department,JobTitle,ManagerName,ManagerEmail"
    );
    assert!(lines[1].contains("\"Alice Jones\""));
    assert!(lines[2].contains("\"Bob Smith\""));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn get_user_with_group_fragment_filters_groups() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _token = mock_token(&mut server);

    let _users = server
        .mock("GET", "/v1.0/users")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"value": [{"id": "u-1", "displayName": "Alice Jones", "userPrincipalName": "a@b.com", "mail": "a@b.com"}]}"#,
        )
        .create();

    let _manager = server
        .mock("GET", "/v1.0/users/u-1/manager")
        .match_query(mockito::Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error": {"code": "Request_ResourceNotFound", "message": "manager not set"}}"#)
        .create();

    let _member_of = server
        .mock("GET", "/v1.0/users/u-1/memberOf")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r##"{"value": [
                {"@odata.type": "#microsoft.graph.group", "id": "g-1", "displayName": "Finance-Team"},
                {"@odata.type": "#microsoft.graph.group", "id": "g-2", "displayName": "Eng-All"}
            ]}"##,
        )
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path());

    let assert = dirq()
        .arg("get-user")
        .arg("--email")
        .arg("a@b.com")
        .arg("--includegroup")
        .arg("--groupfragment")
        .arg("Finance")
        .arg("--config")
        .arg(&config_path)
        .env("DIRQ_GRAPH_HOST", server.url())
        .env("DIRQ_LOGIN_HOST", server.url())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Finance-Team"));
    assert!(!stdout.contains("Eng-All"));

    Ok(())
}
