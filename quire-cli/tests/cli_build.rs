use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const STYLES: &str = r##"
styles:
  normal:
    font_name: Calibri
  accent:
    color: "#C00000"
"##;

const LAYOUT: &str = r#"
layout:
  unit: cm
  page_width: 21
  page_height: 29.7
  footer_text: "Page {page} of {total}"
"#;

const MARKUP: &str = "# Intro\n\nSee {this}[accent] and [later](#later).\n\n# Later\n\nBroken [link](#nowhere).\n";

fn write_inputs(dir: &Path, markup: &str, styles: &str, layout: &str) -> std::io::Result<()> {
    fs::write(dir.join("doc.txt"), markup)?;
    fs::write(dir.join("styles.yaml"), styles)?;
    fs::write(dir.join("layout.yaml"), layout)?;
    Ok(())
}

fn quire(dir: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quire")?;
    cmd.current_dir(dir);
    Ok(cmd)
}

const INPUTS: [&str; 6] = ["-m", "doc.txt", "-s", "styles.yaml", "-l", "layout.yaml"];

#[test]
fn build_json_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path(), MARKUP, STYLES, LAYOUT)?;

    let assert = quire(dir.path())?
        .arg("build")
        .args(INPUTS)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["blocks"][0]["anchor"], "intro");
    assert_eq!(value["blocks"][1]["spans"][1]["style"]["color"], "C00000");
    assert_eq!(value["unresolved_links"][0]["target"], "nowhere");
    let width = value["layout"]["page_width"].as_f64().unwrap_or_default();
    assert!((width - 21.0 / 2.54).abs() < 1e-9);

    Ok(())
}

#[test]
fn build_text_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path(), MARKUP, STYLES, LAYOUT)?;

    quire(dir.path())?
        .arg("build")
        .args(INPUTS)
        .args(["--format", "text", "-o", "proof.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let proof = fs::read_to_string(dir.path().join("proof.txt"))?;
    assert!(proof.starts_with("# Intro {#intro}\n"));
    assert!(proof.contains("See this and [later](#later)."));
    assert!(proof.contains("Broken [link](?nowhere)."));
    assert!(proof.trim_end().ends_with("[footer] Page # of ##"));

    Ok(())
}

#[test]
fn check_reports_diagnostics() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path(), MARKUP, STYLES, LAYOUT)?;

    quire(dir.path())?
        .arg("check")
        .args(INPUTS)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 bookmarks, 1 warnings, 0 info"))
        .stdout(predicate::str::contains("link.dangling"));

    let assert = quire(dir.path())?
        .arg("check")
        .args(INPUTS)
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["bookmarks"], 2);
    assert_eq!(value["unresolved_links"], 1);
    assert_eq!(value["warnings"], 1);
    assert_eq!(value["infos"], 0);
    assert!(value.get("errors").is_none());
    assert_eq!(value["diagnostics"][0]["code"], "link.dangling");
    assert_eq!(value["diagnostics"][0]["block"], 3);

    Ok(())
}

#[test]
fn unknown_span_style_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path(), "Some {text}[missing] here.\n", STYLES, LAYOUT)?;

    quire(dir.path())?
        .arg("check")
        .args(INPUTS)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Style 'missing'"));

    Ok(())
}

#[test]
fn invalid_layout_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path(), MARKUP, STYLES, "layout:\n  unit: furlongs\n")?;

    quire(dir.path())?
        .arg("build")
        .args(INPUTS)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid unit 'furlongs'"));

    Ok(())
}

#[test]
fn missing_markup_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_inputs(dir.path(), MARKUP, STYLES, LAYOUT)?;

    quire(dir.path())?
        .args(["build", "-m", "absent.txt", "-s", "styles.yaml", "-l", "layout.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read markup"));

    Ok(())
}
