#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("discover"))
        .stdout(predicate::str::contains("favorites"));
}

#[test]
fn test_details_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.args(["details", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--entity"));
}

#[test]
fn test_credits_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.args(["credits"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.args(["search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<QUERY>"));
}

#[test]
fn test_unknown_endpoint_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.args(["list", "--endpoint", "trending"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_url_is_offline_and_redacted() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.env("TMDB_API_KEY", "SECRET")
        .env("RUST_LOG", "info")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args([
            "url",
            "--endpoint",
            "season",
            "--media-type",
            "tv",
            "--id",
            "1399",
            "--season",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://api.themoviedb.org/3/tv/1399/season/2?api_key=***&language=en",
        ))
        .stdout(predicate::str::contains("SECRET").not());
}

#[test]
fn test_list_without_api_key_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.env_remove("TMDB_API_KEY")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .args(["--dir", dir.path().to_str().unwrap(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_KEY"));
}

#[test]
fn test_invalid_config_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "hero_id = [").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.env("TMDB_API_KEY", "k")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .args(["--dir", dir.path().to_str().unwrap(), "genres"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_against_mock_server() {
    // Arrange
    let server = MockServer::start().await;
    let body = include_str!("../../../fixtures/tmdb/discover_movie.json");
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .and(query_param("api_key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = format!(
        "[api]\nbase_url = \"{}/3\"\nmin_interval_ms = 0\n",
        server.uri()
    );
    std::fs::write(dir.path().join("config.toml"), config).unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.env("TMDB_API_KEY", "k")
        .env("RUST_LOG", "info")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .args(["--dir", dir.path().to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total results: 3"))
        .stdout(predicate::str::contains("Fight Club"))
        .stdout(predicate::str::contains("Spirited Away"));
}

#[test]
fn test_init_writes_loadable_config_once() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let dir_arg = dir.path().to_str().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedeck");
    cmd.env("RUST_LOG", "info")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .args(["--dir", dir_arg, "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("hero_id = 324857"));
    assert!(written.contains("[[favorites]]"));

    let mut again = cargo_bin_cmd!("cinedeck");
    again
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .args(["--dir", dir_arg, "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let mut forced = cargo_bin_cmd!("cinedeck");
    forced
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .args(["--dir", dir_arg, "init", "--force"])
        .assert()
        .success();
}
