/*!
 * Integration tests for whole-vault exports
 */

use anyhow::Result;
use chrono::{Local, TimeZone};

use obsidian2anki::Controller;
use crate::common::{self, TestVault};

fn fixed_time() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 0).unwrap()
}

/// Test the basic export: one tagged note, one four-column table
#[test]
fn test_run_withOneTaggedNote_shouldWriteTwoCards() -> Result<()> {
    let vault = TestVault::new()?;
    vault.note(
        "spanish/vocab.md",
        &common::vocabulary_note(&[
            ["Tengo ==hambre==", "restaurant", "I am ==hungry==", "idiom"],
            ["Hola", "greeting", "Hello", ""],
        ]),
    )?;

    let controller = Controller::with_config(vault.config())?;
    let summary = controller.run_at(&fixed_time())?;

    let output = summary.output.clone().expect("export file should be written");
    assert_eq!(output, vault.export_dir.join("obsidian2anki_export__20240506_0708.csv"));
    assert_eq!(summary.tagged, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.rows, 2);

    let records = common::read_export(&output)?;
    assert_eq!(
        records,
        vec![
            vec!["Tengo {{c1::hambre}}", "restaurant", "I am <mark>hungry</mark>", "idiom", "20240506_0708"],
            vec!["Hola", "greeting", "Hello", "", "20240506_0708"],
        ]
    );
    Ok(())
}

/// Test that characters escaped by the renderer reach the CSV as written
#[test]
fn test_run_withEscapedCharacters_shouldExportThemVerbatim() -> Result<()> {
    let vault = TestVault::new()?;
    vault.note(
        "symbols.md",
        &common::vocabulary_note(&[["A & B ==x==", "a < b", "c -> ==d==", "\"q\""]]),
    )?;

    let summary = Controller::with_config(vault.config())?.run_at(&fixed_time())?;

    let records = common::read_export(summary.output.as_ref().unwrap())?;
    assert_eq!(
        records,
        vec![vec!["A & B {{c1::x}}", "a < b", "c -> <mark>d</mark>", "\"q\"", "20240506_0708"]]
    );
    Ok(())
}

/// Test that untagged notes and skipped folders do not contribute
#[test]
fn test_run_withMixedVault_shouldOnlyExportTaggedNotes() -> Result<()> {
    let vault = TestVault::new()?;
    vault.note("tagged.md", &common::vocabulary_note(&[["uno", "", "one", ""]]))?;
    vault.note(
        "untagged.md",
        "#anki/export2\n\n| a | b | c | d |\n|-|-|-|-|\n| dos | | two | |\n",
    )?;
    vault.note(
        ".obsidian/templates/card.md",
        &common::vocabulary_note(&[["tres", "", "three", ""]]),
    )?;
    vault.note("notes.txt", &common::vocabulary_note(&[["cuatro", "", "four", ""]]))?;

    let summary = Controller::with_config(vault.config())?.run_at(&fixed_time())?;

    assert_eq!(summary.files_scanned, 2);
    assert_eq!(summary.tagged, 1);
    let records = common::read_export(summary.output.as_ref().unwrap())?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0][0], "uno");
    Ok(())
}

/// Test that cards from several notes and tables keep their order per note
#[test]
fn test_run_withSeveralTables_shouldKeepTableOrderAndSkipMalformed() -> Result<()> {
    let vault = TestVault::new()?;
    vault.note(
        "lesson.md",
        "# Lesson\n#anki/export\n\n\
| T | C | Tr | N |\n|-|-|-|-|\n| first | | 1 | |\n\n\
| bad | table |\n|-|-|\n| x | y |\n\n\
| T | C | Tr | N | Omit | extra |\n|-|-|-|-|-|-|\n| second | | 2 | | | e |\n| hidden | | 3 | | yes | e |\n",
    )?;

    let summary = Controller::with_config(vault.config())?.run_at(&fixed_time())?;

    assert_eq!(summary.tables_skipped, 1);
    assert_eq!(summary.succeeded, 1);
    let records = common::read_export(summary.output.as_ref().unwrap())?;
    let texts: Vec<&str> = records.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert!(records.iter().all(|r| r.len() == 5));
    Ok(())
}

/// Test that no tagged notes is a successful run without output
#[test]
fn test_run_withNoTaggedNotes_shouldSucceedWithoutFile() -> Result<()> {
    let vault = TestVault::new()?;
    vault.note("plain.md", "Nothing to see #other/tag\n")?;

    let summary = Controller::with_config(vault.config())?.run_at(&fixed_time())?;

    assert_eq!(summary.tagged, 0);
    assert!(summary.output.is_none());
    assert!(vault.exported_files()?.is_empty());
    Ok(())
}

/// Test that a tagged note without tables succeeds with no file
#[test]
fn test_run_withTaggedNoteWithoutTables_shouldSucceedWithoutFile() -> Result<()> {
    let vault = TestVault::new()?;
    vault.note("prose.md", "#anki/export\n\nJust prose, no tables.\n")?;

    let summary = Controller::with_config(vault.config())?.run_at(&fixed_time())?;

    assert_eq!(summary.tagged, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.rows, 0);
    assert!(vault.exported_files()?.is_empty());
    Ok(())
}

/// Test that an unreadable note is skipped while the rest is exported
#[test]
fn test_run_withUnreadableNote_shouldExportTheRest() -> Result<()> {
    let vault = TestVault::new()?;
    vault.note("good.md", &common::vocabulary_note(&[["bien", "", "good", ""]]))?;
    std::fs::write(vault.vault.join("broken.md"), [0xff, 0xfe, 0xfd])?;

    let summary = Controller::with_config(vault.config())?.run_at(&fixed_time())?;

    assert_eq!(summary.unreadable, 1);
    assert_eq!(summary.tagged, 1);
    assert_eq!(summary.rows, 1);
    Ok(())
}

/// Test that configured cloze number and tag are applied
#[test]
fn test_run_withCustomTransforms_shouldApplyThem() -> Result<()> {
    let vault = TestVault::new()?;
    vault.note(
        "custom.md",
        "#cards\n\n| a | b | c | d |\n|-|-|-|-|\n| ==x== y ==z== | | ==w== | |\n",
    )?;
    let mut config = vault.config();
    config.export_tag = "#cards".to_string();
    config.cloze_number = 2;
    config.highlight_tag = "b".to_string();
    config.file_prefix = "deck_".to_string();

    let summary = Controller::with_config(config)?.run_at(&fixed_time())?;

    let output = summary.output.unwrap();
    assert_eq!(output.file_name().unwrap(), "deck_20240506_0708.csv");
    let records = common::read_export(&output)?;
    assert_eq!(records[0][0], "{{c2::x}} y {{c2::z}}");
    assert_eq!(records[0][2], "<b>w</b>");
    Ok(())
}
