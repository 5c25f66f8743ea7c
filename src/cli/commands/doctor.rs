//! Doctor command - verify the FAQ document and API configuration.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
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
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("faqbot Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Document").bold());
    let doc_check = check_document(settings);
    doc_check.print();
    checks.push(doc_check);

    println!();

    println!("{}", style("API Configuration").bold());
    let api_checks = vec![
        check_key("Embeddings", settings.embedding.key_env()),
        check_key("Chat model", &settings.llm.api_key_env),
    ];
    for check in &api_checks {
        check.print();
    }
    checks.extend(api_checks);

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
            "{} error(s) found. Questions will fail until they are fixed.",
            errors
        ));
    } else if warnings > 0 {
        Output::warning(&format!("{} warning(s) found.", warnings));
    } else {
        Output::success("All checks passed.");
    }

    Ok(())
}

fn check_document(settings: &Settings) -> CheckResult {
    let path = settings.document_path();
    match std::fs::read_to_string(&path) {
        Ok(text) if text.trim().is_empty() => CheckResult::warning(
            "FAQ document",
            &format!("{} is empty", path.display()),
            "Add the support content the bot should answer from.",
        ),
        Ok(text) => CheckResult::ok(
            "FAQ document",
            &format!("{} ({} characters)", path.display(), text.chars().count()),
        ),
        Err(e) => CheckResult::error(
            "FAQ document",
            &format!("{}: {}", path.display(), e),
            "Set document.path in the config, relative to the working directory.",
        ),
    }
}

fn check_key(name: &str, var: &str) -> CheckResult {
    match preflight::check_api_key(var) {
        Ok(()) => CheckResult::ok(name, &format!("{} is set", var)),
        Err(_) => CheckResult::error(
            name,
            &format!("{} is not set", var),
            &format!("export {}=... or add it to a .env file", var),
        ),
    }
}

fn check_config_file() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("Config file", &path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "not found, using defaults",
            "Run 'faqbot config init' to create one.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_checks() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();

        settings.document.path = dir.path().join("missing.txt").display().to_string();
        assert_eq!(check_document(&settings).status, CheckStatus::Error);

        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "  \n").unwrap();
        settings.document.path = path.display().to_string();
        assert_eq!(check_document(&settings).status, CheckStatus::Warning);

        std::fs::write(&path, "Shipping is free.").unwrap();
        assert_eq!(check_document(&settings).status, CheckStatus::Ok);
    }

    #[test]
    fn test_unset_key_is_error() {
        assert_eq!(
            check_key("Chat model", "FAQBOT_TEST_UNSET_KEY").status,
            CheckStatus::Error
        );
    }
}
