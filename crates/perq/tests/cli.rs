//! CLI integration tests for perq commands.
//!
//! These tests focus on exit codes and basic behavioral verification,
//! not specific output formatting which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a perq command.
fn perq() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("perq").unwrap()
}

/// Writes a config declaring the standard test fields.
fn write_config(dir: &Path) {
    fs::write(
        dir.join("perq.toml"),
        r#"
[fields]
greeting = "text"
int_field = "integer"
location = "geo_point"
"#,
    )
    .unwrap();
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();

        perq()
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success();

        let config_path = dir.path().join("perq.toml");
        assert!(config_path.exists());

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# [fields]"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join("perq.toml"), "existing").unwrap();

        perq()
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .failure();
    }

    #[test]
    fn force_overwrites_existing() {
        let dir = temp_dir();
        fs::write(dir.path().join("perq.toml"), "old content").unwrap();

        perq()
            .current_dir(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join("perq.toml")).unwrap();
        assert!(contents.contains("# [fields]"));
    }
}

mod add {
    use super::*;

    #[test]
    fn stores_a_query() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success()
            .stdout(predicate::str::contains("q1"));

        assert!(dir.path().join(".perq/index").is_dir());
    }

    #[test]
    fn rejects_malformed_query() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:[1 TO"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error:"));
    }

    #[test]
    fn fails_without_config() {
        let dir = temp_dir();

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("perq init"));
    }

    #[test]
    fn readding_replaces_previous_query() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success();
        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:sad"])
            .assert()
            .success();

        perq()
            .current_dir(dir.path())
            .args(["ls", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("sad"))
            .stdout(predicate::str::contains("happy").not());
    }
}

mod rm {
    use super::*;

    #[test]
    fn removes_stored_query() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success();
        perq()
            .current_dir(dir.path())
            .args(["rm", "q1"])
            .assert()
            .success();

        perq()
            .current_dir(dir.path())
            .arg("ls")
            .assert()
            .success()
            .stdout(predicate::str::contains("No stored queries"));
    }

    #[test]
    fn fails_for_unknown_id() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success();

        perq()
            .current_dir(dir.path())
            .args(["rm", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("nope"));
    }
}

mod ls {
    use super::*;

    #[test]
    fn lists_queries_with_status() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q_term", "greeting:happy"])
            .assert()
            .success();
        perq()
            .current_dir(dir.path())
            .args(["add", "q_geo", "location:geo(6.9, 79.8, 1000)"])
            .assert()
            .success();

        perq()
            .current_dir(dir.path())
            .arg("ls")
            .assert()
            .success()
            .stdout(predicate::str::contains("q_term"))
            .stdout(predicate::str::contains("complete"))
            .stdout(predicate::str::contains("q_geo"))
            .stdout(predicate::str::contains("failed"));
    }

    #[test]
    fn json_output_is_parseable() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success();

        let output = perq()
            .current_dir(dir.path())
            .args(["ls", "--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["id"], "q1");
    }
}

mod percolate {
    use super::*;

    /// Stores a mix of queries and percolates one document end to end.
    #[test]
    fn matches_expected_queries() {
        let dir = temp_dir();
        write_config(dir.path());

        for (id, query) in [
            ("q_happy", "greeting:happy"),
            ("q_bye", "greeting:bye"),
            ("r_low", "int_field:[0 TO 5]"),
            ("r_high", "int_field:[10 TO 20]"),
        ] {
            perq()
                .current_dir(dir.path())
                .args(["add", id, query])
                .assert()
                .success();
        }

        let doc_path = dir.path().join("doc.json");
        fs::write(
            &doc_path,
            r#"{"greeting": "happy holidays", "int_field": 3}"#,
        )
        .unwrap();

        perq()
            .current_dir(dir.path())
            .args(["percolate", "doc.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("q_happy"))
            .stdout(predicate::str::contains("r_low"))
            .stdout(predicate::str::contains("q_bye").not())
            .stdout(predicate::str::contains("r_high").not());
    }

    #[test]
    fn reads_document_from_stdin() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success();

        perq()
            .current_dir(dir.path())
            .args(["percolate", "-"])
            .write_stdin(r#"{"greeting": "happy holidays"}"#)
            .assert()
            .success()
            .stdout(predicate::str::contains("q1"));
    }

    #[test]
    fn json_output_contains_scores() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success();

        let output = perq()
            .current_dir(dir.path())
            .args(["percolate", "-", "--json"])
            .write_stdin(r#"{"greeting": "happy holidays"}"#)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed[0]["id"], "q1");
        assert!(parsed[0]["score"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn rejects_document_with_undeclared_field() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success();

        perq()
            .current_dir(dir.path())
            .args(["percolate", "-"])
            .write_stdin(r#"{"mystery": "value"}"#)
            .assert()
            .failure()
            .stderr(predicate::str::contains("mystery"));
    }
}

mod status {
    use super::*;

    #[test]
    fn reports_config_and_count() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .args(["add", "q1", "greeting:happy"])
            .assert()
            .success();

        perq()
            .current_dir(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("perq.toml"))
            .stdout(predicate::str::contains("Stored queries: 1"));
    }

    #[test]
    fn works_before_index_exists() {
        let dir = temp_dir();
        write_config(dir.path());

        perq()
            .current_dir(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("not created yet"));
    }
}
