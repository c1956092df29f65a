use anyhow::Result;

use crate::CliTest;

#[test]
fn missing_config_reports_and_exits_nonzero() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.check_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("rescript.json not found"));

    Ok(())
}

#[test]
fn clean_project_without_externals_succeeds() -> Result<()> {
    let test = CliTest::with_file("rescript.json", r#"{ "sources": ["src"] }"#)?;
    test.write_file("src/App.res", "let greeting = \"hello\"\n")?;

    let output = test.check_command().output()?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Checked 0 externals - no issues found"));

    Ok(())
}

#[test]
fn json_output_is_machine_readable() -> Result<()> {
    let test = CliTest::with_file("rescript.json", r#"{ "sources": ["src"] }"#)?;
    test.write_file("src/App.res", "let greeting = \"hello\"\n")?;

    let output = test.check_command().arg("--json").output()?;
    assert_eq!(output.status.code(), Some(0));

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["summary"]["externals"], 0);
    assert_eq!(parsed["summary"]["errors"], 0);
    assert_eq!(parsed["summary"]["warnings"], 0);
    assert!(parsed["diagnostics"].as_array().unwrap().is_empty());

    Ok(())
}

#[test]
fn missing_config_json_output_carries_the_diagnostic() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.check_command().arg("--json").output()?;
    assert_eq!(output.status.code(), Some(1));

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["summary"]["errors"], 1);
    assert_eq!(parsed["diagnostics"][0]["level"], "error");
    assert_eq!(parsed["diagnostics"][0]["code"], "config-missing");

    Ok(())
}

#[test]
fn help_lists_the_check_command() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("check"));

    Ok(())
}

#[test]
fn no_command_prints_help_and_succeeds() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Usage"));

    Ok(())
}

#[test]
fn invalid_config_is_an_internal_error() -> Result<()> {
    let test = CliTest::with_file("rescript.json", "{ not json")?;

    let output = test.check_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Error:"));

    Ok(())
}
