//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::dependency::{DependencyChecker, Tool};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Hent Doctor");
    println!();
    println!("Checking external tools and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    for tool in [Tool::Ffmpeg, Tool::YtDlp] {
        let check = check_tool(tool, settings).await;
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Directories").bold());
    for check in check_directories(settings) {
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Run `hent setup` to download missing tools.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Hent is ready to use.");
    }

    Ok(())
}

/// Check where a tool is available from.
async fn check_tool(tool: Tool, settings: &Settings) -> CheckResult {
    let checker = DependencyChecker::new(tool, settings.dependency_dir());
    let name = tool.to_string();

    if checker.is_in_system_path().await {
        return CheckResult::ok(&name, "found on system path");
    }

    if let Some(path) = checker.downloaded_path() {
        return CheckResult::ok(&name, &format!("managed copy at {}", path.display()));
    }

    CheckResult::error(
        &name,
        "not found",
        "Run `hent setup` to download it, or install it via your package manager",
    )
}

/// Check output and dependency directories.
fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let output_dir = settings.output_dir();
    if output_dir.exists() {
        results.push(CheckResult::ok(
            "Output directory",
            &format!("{}", output_dir.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Output directory",
            &format!("{} (will be created)", output_dir.display()),
            "Directory is created on first conversion",
        ));
    }

    let dep_dir = settings.dependency_dir();
    if dep_dir.exists() {
        results.push(CheckResult::ok(
            "Dependency folder",
            &format!("{}", dep_dir.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Dependency folder",
            &format!("{} (not created yet)", dep_dir.display()),
            "Created by `hent setup` when a download is needed",
        ));
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: hent config set audio_format mp3",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[tokio::test]
    async fn test_check_tool_reports_managed_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.dependencies.folder = dir.path().to_string_lossy().to_string();

        let binary = dir.path().join(Tool::Ffmpeg.binary_name());
        std::fs::write(&binary, b"").unwrap();

        let result = check_tool(Tool::Ffmpeg, &settings).await;
        // Either the system install or the managed copy satisfies the check.
        assert_eq!(result.status, CheckStatus::Ok);
    }
}
