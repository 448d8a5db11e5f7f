use std::path::Path;

use tracing::{info, warn};

use crate::cli::config::{AppConfig, session_config};
use crate::interact::interactable::Interactable;
use crate::page::page::Page;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::TestSuiteReport;
use crate::spec::runner::TestRunner;
use crate::spec::spec_model::TestSpec;
use crate::transport::Transport;
use crate::transport::http::HttpTransport;

// ============================================================================
// run subcommand
// ============================================================================

/// Run every script at `spec_path` and return whether all passed.
///
/// Each script gets a fresh transport, so cookies never leak between them.
pub fn cmd_run(
    spec_path: &str,
    base_url: Option<&str>,
    format: Option<&str>,
    output: Option<&str>,
    no_javascript: bool,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let specs = load_specs(spec_path)?;

    if specs.is_empty() {
        warn!("No test specs found at: {}", spec_path);
        return Ok(true);
    }

    let base_url = base_url.unwrap_or(&config.run.base_url);
    let session = session_config(config, no_javascript);
    info!("Running {} specs against {}", specs.len(), base_url);

    let start = std::time::Instant::now();
    let mut results = Vec::new();
    for spec in &specs {
        info!("Running: {}", spec.name);
        let transport = HttpTransport::new(base_url)?;
        let mut page = Page::new(transport, session.clone());
        results.push(TestRunner::run(spec, &mut page));
    }

    let suite_name = Path::new(spec_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("clickthrough");
    let report = TestSuiteReport::from_results(suite_name, results)
        .with_duration(start.elapsed().as_millis());

    let format = format.unwrap_or(&config.run.format);
    let rendered = render_report(&report, format);

    match output.or(config.run.output.as_deref()) {
        Some(path) => std::fs::write(path, &rendered)?,
        None => print!("{}", rendered),
    }

    Ok(report.all_passed())
}

/// Render a report; unknown formats fall back to the console layout.
pub fn render_report(report: &TestSuiteReport, format: &str) -> String {
    match format {
        "junit" => generate_junit_xml(report),
        "console" => format_console_report(report),
        other => {
            warn!("Unknown report format '{}', using console", other);
            format_console_report(report)
        }
    }
}

/// Load scripts from a single YAML file or a directory of YAML files.
pub fn load_specs(path: &str) -> Result<Vec<TestSpec>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_dir() {
        return Ok(vec![parse_spec_file(Path::new(path))?]);
    }

    let mut specs = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let p = entry?.path();
        if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            specs.push(parse_spec_file(&p)?);
        }
    }
    // Directory order is not stable across platforms
    specs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(specs)
}

fn parse_spec_file(path: &Path) -> Result<TestSpec, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| format!("{}: {}", path.display(), e).into())
}

// ============================================================================
// links subcommand
// ============================================================================

pub fn cmd_links(
    url: &str,
    base_url: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = base_url.unwrap_or(&config.run.base_url);
    let transport = HttpTransport::new(base_url)?;
    let mut page = Page::new(transport, config.session.clone());
    page.visit(url)?;

    print!("{}", format_links(&page)?);
    Ok(())
}

/// One line per link: inferred verb, resolved target and link text.
pub fn format_links<T: Transport>(
    page: &Page<T>,
) -> Result<String, Box<dyn std::error::Error>> {
    let location = page.location();
    let mut out = String::new();
    for link in page.links()? {
        let method = match link.http_method() {
            Ok(m) => m.to_string(),
            Err(_) => "?".to_string(),
        };
        out.push_str(&format!(
            "{:<6} {} {:?}\n",
            method,
            link.absolute_href(&location),
            link.text()
        ));
    }
    Ok(out)
}
