mod common;

use std::io::Write;

use clap::Parser;
use clickthrough::cli::commands::{format_links, load_specs, render_report};
use clickthrough::cli::config::{AppConfig, Cli, Commands, load_config, session_config};
use clickthrough::error::DriverError;
use clickthrough::page::config::AbandonedConfirmation;
use clickthrough::report::report_model::TestSuiteReport;

use common::{TOKEN, html, link, method_onclick, open_page};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_run_minimal() {
    let cli = Cli::parse_from(["clickthrough", "run", "--spec", "specs/"]);
    match cli.command {
        Commands::Run {
            spec,
            base_url,
            format,
            output,
            no_javascript,
        } => {
            assert_eq!(spec, "specs/");
            assert!(base_url.is_none());
            assert!(format.is_none());
            assert!(output.is_none());
            assert!(!no_javascript);
        }
        _ => panic!("Expected Run command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_run_all_args() {
    let cli = Cli::parse_from([
        "clickthrough",
        "-vv",
        "run",
        "--spec",
        "delete.yaml",
        "--base-url",
        "http://localhost:4000",
        "--format",
        "junit",
        "-o",
        "report.xml",
        "--no-javascript",
        "--config",
        "ci.yaml",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("ci.yaml"));
    match cli.command {
        Commands::Run {
            base_url,
            format,
            output,
            no_javascript,
            ..
        } => {
            assert_eq!(base_url.as_deref(), Some("http://localhost:4000"));
            assert_eq!(format.as_deref(), Some("junit"));
            assert_eq!(output.as_deref(), Some("report.xml"));
            assert!(no_javascript);
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_links_defaults() {
    let cli = Cli::parse_from(["clickthrough", "links"]);
    match cli.command {
        Commands::Links { url, base_url } => {
            assert_eq!(url, "/");
            assert!(base_url.is_none());
        }
        _ => panic!("Expected Links command"),
    }
}

#[test]
fn cli_run_requires_spec() {
    assert!(Cli::try_parse_from(["clickthrough", "run"]).is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.run.format, "console");
    assert_eq!(config.run.base_url, "http://localhost:3000");
    assert!(config.session.javascript);
    assert_eq!(config.session.app_host, "www.example.com");
    assert_eq!(config.session.abandoned_confirmation, AbandonedConfirmation::Discard);
}

#[test]
fn load_config_reads_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "session:\n  app_host: shop.test\n  abandoned_confirmation: fail\n  trace_file: trace.jsonl\nrun:\n  format: junit\n  base_url: http://shop.test"
    )
    .unwrap();

    let config = load_config(file.path().to_str()).unwrap();
    assert_eq!(config.session.app_host, "shop.test");
    assert_eq!(config.session.abandoned_confirmation, AbandonedConfirmation::Fail);
    assert_eq!(config.session.trace_file.as_deref(), Some("trace.jsonl"));
    assert!(config.session.javascript);
    assert_eq!(config.run.format, "junit");
    assert_eq!(config.run.base_url, "http://shop.test");
}

#[test]
fn load_config_rejects_malformed_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "session: [not, a, map").unwrap();
    assert!(matches!(
        load_config(file.path().to_str()),
        Err(DriverError::Config(_))
    ));
}

#[test]
fn load_config_missing_explicit_file_fails() {
    assert!(load_config(Some("/nonexistent/clickthrough.yaml")).is_err());
}

#[test]
fn no_javascript_flag_overrides_config() {
    let config = AppConfig::default();
    assert!(session_config(&config, false).javascript);
    assert!(!session_config(&config, true).javascript);
}

// ============================================================================
// Command helpers
// ============================================================================

#[test]
fn load_specs_from_directory_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("b.yaml"),
        "name: Zeta\nstart_url: /\nsteps: []\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("a.yml"),
        "name: Alpha\nstart_url: /\nsteps:\n  - action: reload\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let specs = load_specs(dir.path().to_str().unwrap()).unwrap();
    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
}

#[test]
fn load_specs_reports_the_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "name: Broken\nsteps: 3\n").unwrap();

    let err = load_specs(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("broken.yaml"));
}

#[test]
fn render_report_formats() {
    let report = TestSuiteReport::from_results("empty", vec![]);
    assert!(render_report(&report, "junit").starts_with("<?xml"));
    assert!(render_report(&report, "console").starts_with("=== Suite: empty"));
    assert!(render_report(&report, "html").starts_with("=== Suite: empty"));
}

#[test]
fn links_listing_shows_method_and_target() {
    let js = method_onclick("delete", Some(TOKEN));
    let body = html(&format!(
        "{}{}",
        link("/posts/1", "Destroy", Some(&js)),
        link("edit", "Edit", None)
    ));
    let page = open_page("/posts/1", &body);

    let listing = format_links(&page).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("DELETE /posts/1"));
    assert!(lines[1].starts_with("GET    /posts/1/edit"));
    assert!(lines[1].ends_with("\"Edit\""));
}
