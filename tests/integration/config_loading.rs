use super::support::thin_draft;
use draftsmith::cli::{Commands, ConfigCommands, OutputFormat, RunContext, EXIT_CHECK_FAILED};
use draftsmith::config::{ConfigLoader, ValidationError};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("draftsmith.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[validation]
hero_min_sentences = 6

[validation.severity_overrides]
no_such_rule = "error"

[repair]
provider = "ghost"

[logging]
format = "xml"
"#,
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], ValidationError::Validation(_)));
    assert!(matches!(errors[1], ValidationError::Repair(_)));
    assert!(matches!(errors[2], ValidationError::Logging(_)));
}

#[test]
fn test_unparseable_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[pipeline]\nbatch_concurrency = \"many\"\n");
    assert!(ConfigLoader::load_from_file(&path).is_err());
}

#[test]
fn test_cli_uses_explicit_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[validation]
min_word_count = 10
min_section_words = 10
min_hero_chars = 0
min_faqs = 0
min_internal_links = 0
require_end_cta = false
"#,
    );
    std::fs::write(
        dir.path().join("draft.json"),
        serde_json::to_string(&thin_draft()).unwrap(),
    )
    .unwrap();

    let ctx = RunContext::new(dir.path().to_path_buf(), Some(path)).unwrap();
    assert_eq!(ctx.config().validation.min_word_count, 10);

    let output = ctx
        .execute(&Commands::Validate {
            draft: PathBuf::from("draft.json"),
            format: OutputFormat::Text,
        })
        .unwrap();
    // Relaxed thresholds leave only the missing experience evidence, a warning.
    assert_eq!(output.exit_code, 0, "{}", output.body);
    assert!(output.body.contains("experienceEvidence"));

    let shown = ctx
        .execute(&Commands::Config {
            command: ConfigCommands::Show,
        })
        .unwrap();
    assert!(shown.body.starts_with("# loaded from"));
    assert!(shown.body.contains("min_word_count = 10"));
}

#[test]
fn test_repair_plan_lists_error_driven_fields() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("draft.json"),
        serde_json::to_string(&thin_draft()).unwrap(),
    )
    .unwrap();
    let ctx = RunContext::with_config(dir.path().to_path_buf(), None, Default::default());

    let output = ctx
        .execute(&Commands::RepairPlan {
            draft: PathBuf::from("draft.json"),
            format: OutputFormat::Json,
        })
        .unwrap();
    assert_eq!(output.exit_code, EXIT_CHECK_FAILED);

    let parsed: serde_json::Value = serde_json::from_str(&output.body).unwrap();
    assert_eq!(parsed["valid"], false);
    let fields: Vec<&str> = parsed["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|group| group["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"heroAnswer"));
    assert!(fields.contains(&"sections"));
    assert!(!fields.contains(&"faqs"));
}
