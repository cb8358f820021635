/*!
 * Tests for style resolution and subtitle document emission
 */

use anyhow::Result;
use captionforge::ass_document::SubtitleDocument;
use captionforge::captions::{CaptionConstraints, CaptionRecord, generate_captions};
use captionforge::style::{AssColor, BorderStyle, FontCatalog, StyleConfig, StyleResolver};
use captionforge::timecode::{format_timecode, parse_timecode};
use captionforge::transcript::{PunctuationBoundaryDetector, parse_words_json};

use crate::common;

fn catalog() -> FontCatalog {
    FontCatalog::from_families(["Cairo", "Amiri"])
}

/// Test a style file written by the editor, camelCase keys and all
#[test]
fn test_resolve_withEditorStyleJson_shouldMapEveryField() -> Result<()> {
    let json = r##"{
        "fontSize": "20px",
        "fontFamily": "Cairo",
        "fontWeight": "Regular",
        "color": "#FF0000",
        "backgroundColor": "transparent",
        "outline": 3,
        "shadow": 2,
        "alignment": 8,
        "margin": {"top": 30}
    }"##;
    let style: StyleConfig = serde_json::from_str(json)?;

    let resolved = StyleResolver::new(&catalog(), "Noto Sans Arabic").resolve(&style);

    assert_eq!(resolved.font_name, "Cairo");
    assert_eq!(resolved.font_size, 27);
    assert_eq!(resolved.primary_color.to_string(), "&H000000FF");
    assert_eq!(resolved.secondary_color, resolved.primary_color);
    assert_eq!(resolved.border_style, BorderStyle::OutlineAndShadow);
    assert_eq!(resolved.back_color, AssColor::NONE);
    assert_eq!(resolved.outline, 3);
    assert_eq!(resolved.shadow, 2);
    assert_eq!(resolved.alignment, 8);
    assert_eq!(resolved.margin_v, 30);
    assert!(!resolved.bold);
    Ok(())
}

/// Test that bad styling input degrades instead of failing
#[test]
fn test_resolve_withInvalidValues_shouldFallBack() {
    let style = StyleConfig {
        font_size: Some("huge".to_string()),
        font_family: Some("Not Installed".to_string()),
        color: Some("rgba(1, 2, 3, 0.5)".to_string()),
        alignment: Some(42),
        ..StyleConfig::default()
    };

    let resolved = StyleResolver::new(&catalog(), "Amiri").resolve(&style);

    assert_eq!(resolved.font_name, "Amiri");
    assert_eq!(resolved.font_size, 38);
    assert_eq!(resolved.primary_color.to_string(), "&H80000000");
    assert_eq!(resolved.alignment, 2);
}

/// Test the whole path from words to document text
#[test]
fn test_document_fromSampleWords_shouldEmitOneDialoguePerCaption() -> Result<()> {
    let words = parse_words_json(common::SAMPLE_WORDS_JSON)?;
    let captions = generate_captions(&words, &PunctuationBoundaryDetector::new(), &CaptionConstraints::default());
    let style = StyleResolver::new(&catalog(), "Noto Sans Arabic").resolve(&StyleConfig::default());

    let text = SubtitleDocument::from_captions(&captions, style).render();

    let dialogues: Vec<&str> = text.lines().filter(|l| l.starts_with("Dialogue:")).collect();
    assert_eq!(
        dialogues,
        vec![
            "Dialogue: 0,0:00:00.00,0:00:00.90,Default,,0,0,0,,Hello world.",
            "Dialogue: 0,0:00:01.50,0:00:02.60,Default,,0,0,0,,This is a test.",
        ]
    );
    assert!(text.ends_with('\n'));
    Ok(())
}

/// Test that right-to-left captions are embedded and wrapped lines escaped
#[test]
fn test_document_withArabicRecord_shouldWrapInEmbeddingMarks() {
    let style = StyleResolver::new(&catalog(), "Noto Sans Arabic").resolve(&StyleConfig::default());
    let records = vec![CaptionRecord::new(3.0, 4.5, "مرحبا بكم\nفي البرنامج")];

    let document = SubtitleDocument::from_records(&records, style);

    let event = &document.events()[0];
    assert_eq!(event.start, "0:00:03.00");
    assert_eq!(event.end, "0:00:04.50");
    assert_eq!(event.text, "\u{202B}مرحبا بكم\\Nفي البرنامج\u{202C}");
}

/// Test that emitted time codes read back to the truncated value
#[test]
fn test_timecode_withGeneratedCaptionTimes_shouldReadBackTruncated() -> Result<()> {
    for seed in 0..5 {
        for word in common::generate_words(50, seed) {
            let code = format_timecode(word.start);
            let parsed = parse_timecode(&code)?;
            assert!(parsed <= word.start + 1e-9, "{} -> {}", word.start, code);
            assert!(word.start - parsed < 0.01 + 1e-9, "{} -> {}", word.start, code);
        }
    }
    Ok(())
}
