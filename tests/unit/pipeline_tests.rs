/*!
 * Tests for the per-note pipeline through the public API
 */

use obsidian2anki::card_schema::{self, NormalizedRow};
use obsidian2anki::table_extractor::extract;
use obsidian2anki::transform::TextTransformer;
use obsidian2anki::{convert_highlight, convert_to_cloze, matches, TableError};

/// Test the documented tag cases
#[test]
fn test_matches_withDocumentedCases_shouldAgree() {
    let tag = "#anki/export";
    let cases = [
        ("#anki/export", true),
        ("\n#anki/export\n", true),
        ("Multiple #tags #anki/export #other/tag", true),
        ("#anki/export/extra", false),
        ("Wrong#anki/export", false),
        ("#Anki/Export", false),
    ];

    for (text, expected) in cases {
        assert_eq!(matches(tag, text), expected, "text: {:?}", text);
    }
}

/// Test the tag against every combination of boundaries
#[test]
fn test_matches_withGeneratedBoundaries_shouldRequireWhitespaceOrEdge() {
    let tag = "#anki/export";
    let lefts = ["", " ", "\n", "\t", "x", "#", "/"];
    let rights = ["", " ", "\n", "\r\n", "x", "/", "2", "."];

    for left in lefts {
        for right in rights {
            let text = format!("{}{}{}", left, tag, right);
            let left_ok = left.is_empty() || left.chars().all(char::is_whitespace);
            let right_ok = right.is_empty() || right.chars().next().is_some_and(char::is_whitespace);
            assert_eq!(matches(tag, &text), left_ok && right_ok, "text: {:?}", text);
        }
    }
}

/// Test the conversions on the documented examples
#[test]
fn test_conversions_withDocumentedExamples_shouldMatch() {
    assert_eq!(convert_to_cloze("plain", 1), "plain");
    assert_eq!(convert_to_cloze("==term==", 1), "{{c1::term}}");
    assert_eq!(convert_highlight("==term==", "mark"), "<mark>term</mark>");
}

/// Test that a note's tables go through the whole per-table pass
#[test]
fn test_extractThenProcess_withFiveColumnTable_shouldHonorOmit() {
    let note = "\
| Texto | Contexto | Traducción | Notas | Omitir |
|---|---|---|---|---|
| El ==perro== ladra | calle | The ==dog== barks | | |
| Viejo | - | Old | dup | x |
| ==Gato== | casa | Cat | animal | |
";

    let tables = extract(note).unwrap();
    assert_eq!(tables.len(), 1);

    let rows = card_schema::process_table(tables.into_iter().next().unwrap(), &TextTransformer::default()).unwrap();

    assert_eq!(
        rows,
        vec![
            NormalizedRow::new("El {{c1::perro}} ladra", "calle", "The <mark>dog</mark> barks", ""),
            NormalizedRow::new("{{c1::Gato}}", "casa", "Cat", "animal"),
        ]
    );
}

/// Test that narrow tables are rejected while wide ones are truncated
#[test]
fn test_extractThenProcess_withNarrowAndWideTables_shouldSplitOutcomes() {
    let note = "\
| a | b | c |
|---|---|---|
| 1 | 2 | 3 |

| a | b | c | d | e | f |
|---|---|---|---|---|---|
| 1 | 2 | 3 | 4 |  | 6 |
";

    let mut tables = extract(note).unwrap().into_iter();
    let transformer = TextTransformer::default();

    let narrow = card_schema::process_table(tables.next().unwrap(), &transformer);
    assert_eq!(narrow, Err(TableError::Malformed { columns: 3, expected: 4 }));

    let wide = card_schema::process_table(tables.next().unwrap(), &transformer).unwrap();
    assert_eq!(wide, vec![NormalizedRow::new("1", "2", "3", "4")]);
}
