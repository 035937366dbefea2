//! CLI integration tests for the clappia binary.

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const REQUESTER: &str = "ops@acme.io";

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("clappia"));
    cmd.env_remove("CLAPPIA_API_KEY")
        .env_remove("CLAPPIA_BASE_URL")
        .env_remove("CLAPPIA_WORKPLACE_ID")
        .env_remove("CLAPPIA_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

/// Command pointed at `server` with full credentials.
fn configured(server: &mockito::ServerGuard) -> Command {
    let mut cmd = cmd();
    cmd.env("CLAPPIA_API_KEY", "cli-key")
        .env("CLAPPIA_BASE_URL", server.url())
        .env("CLAPPIA_WORKPLACE_ID", "WP1");
    cmd
}

// Helper to create a temp JSON file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

mod usage {
    use super::*;

    #[test]
    fn help_lists_operations() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("get-definition"))
            .stdout(predicate::str::contains("update-owners"))
            .stdout(predicate::str::contains("export"));
    }

    #[test]
    fn unknown_field_type_is_usage_error() {
        cmd()
            .args([
                "add-field",
                "--app-id",
                "APP1",
                "--requester",
                REQUESTER,
                "--section-index",
                "0",
                "--field-index",
                "0",
                "--field-type",
                "hologram",
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("hologram"));
    }

    #[test]
    fn owners_are_required() {
        cmd()
            .args([
                "update-owners",
                "--app-id",
                "APP1",
                "--submission-id",
                "SUB1",
                "--requester",
                REQUESTER,
            ])
            .assert()
            .code(2);
    }
}

mod failures {
    use super::*;

    #[test]
    fn missing_api_key() {
        cmd()
            .env("CLAPPIA_WORKPLACE_ID", "WP1")
            .args(["get-definition", "APP1"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "Configuration error: API key is not configured",
            ))
            .stdout(predicate::str::contains(r#""success":false"#));
    }

    #[test]
    fn invalid_app_id() {
        cmd()
            .env("CLAPPIA_API_KEY", "k")
            .env("CLAPPIA_WORKPLACE_ID", "WP1")
            .args(["get-definition", "app-1"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "App ID must contain only uppercase letters and numbers",
            ))
            .stdout(predicate::str::contains(r#""error_kind":"validation_error""#));
    }

    #[test]
    fn invalid_filters_file() {
        let dir = TempDir::new().unwrap();
        let filters = write_temp_file(&dir, "filters.json", r#"{"queries": []}"#);

        cmd()
            .env("CLAPPIA_API_KEY", "k")
            .env("CLAPPIA_WORKPLACE_ID", "WP1")
            .args([
                "get-submissions",
                "--app-id",
                "APP1",
                "--requester",
                REQUESTER,
                "--filters",
                filters.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Queries must be a non-empty list"));
    }

    #[test]
    fn missing_data_file() {
        cmd()
            .args([
                "create-submission",
                "--app-id",
                "APP1",
                "--requester",
                REQUESTER,
                "--data",
                "/nonexistent/data.json",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error reading data"));
    }
}

mod operations {
    use super::*;

    #[test]
    fn get_definition() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/appdefinitionv2/getAppDefinition")
            .match_header("x-api-key", "cli-key")
            .match_query(Matcher::UrlEncoded("appId".into(), "APP1".into()))
            .with_status(200)
            .with_body(r#"{"appId":"APP1","fieldDefinitions":{"a":{}}}"#)
            .create();

        configured(&server)
            .args(["get-definition", "APP1"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""success":true"#))
            .stdout(predicate::str::contains(r#""field_count":1"#));
        mock.assert();
    }

    #[test]
    fn create_submission_from_file() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/submissions/create")
            .match_body(Matcher::PartialJson(json!({ "data": { "name": "Widget" } })))
            .with_status(200)
            .with_body(r#"{"submissionId":"SUB7"}"#)
            .create();

        let dir = TempDir::new().unwrap();
        let data = write_temp_file(&dir, "data.json", r#"{"name": "Widget"}"#);

        configured(&server)
            .args([
                "create-submission",
                "--app-id",
                "APP1",
                "--requester",
                REQUESTER,
                "--data",
                data.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""submission_id":"SUB7""#));
        mock.assert();
    }

    #[test]
    fn add_field_with_properties_file() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/appdefinitionv2/addField")
            .match_body(Matcher::Json(json!({
                "workplaceId": "WP1",
                "appId": "APP1",
                "requestingUserEmailAddress": REQUESTER,
                "sectionIndex": 1,
                "fieldIndex": 0,
                "fieldType": "singleSelector",
                "label": "Colour",
                "options": ["Red", "Blue"],
                "style": "Chips"
            })))
            .with_status(200)
            .with_body(r#"{"fieldName":"colour"}"#)
            .create();

        let dir = TempDir::new().unwrap();
        let props = write_temp_file(
            &dir,
            "props.json",
            r#"{"label": "Ignored", "options": ["Red", "Blue"], "style": "Chips", "formula": "1+1"}"#,
        );

        configured(&server)
            .args([
                "add-field",
                "--app-id",
                "APP1",
                "--requester",
                REQUESTER,
                "--section-index",
                "1",
                "--field-index",
                "0",
                "--field-type",
                "singleSelector",
                "--label",
                "Colour",
                "--properties",
                props.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""field_name":"colour""#));
        mock.assert();
    }

    #[test]
    fn update_owners_pretty() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/submissions/updateSubmissionOwners")
            .match_body(Matcher::PartialJson(json!({ "emailIds": ["a@acme.io"] })))
            .with_status(200)
            .with_body("{}")
            .create();

        configured(&server)
            .args([
                "update-owners",
                "--app-id",
                "APP1",
                "--submission-id",
                "SUB1",
                "--requester",
                REQUESTER,
                "--owner",
                "a@acme.io",
                "--owner",
                "nope",
                "--pretty",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("  \"success\": true"))
            .stdout(predicate::str::contains("nope"));
    }

    #[test]
    fn export_reports_api_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/submissions/getSubmissionsExcel")
            .with_status(403)
            .with_body(r#"{"message":"forbidden"}"#)
            .create();

        configured(&server)
            .args([
                "export",
                "--app-id",
                "APP1",
                "--requester",
                REQUESTER,
                "--format",
                "Csv",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("API Error (403)"))
            .stdout(predicate::str::contains(r#""error_kind":"api_error""#));
    }
}
