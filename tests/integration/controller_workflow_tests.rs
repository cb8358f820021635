/*!
 * Integration tests for the word stream to subtitle document workflow
 */

use anyhow::Result;
use std::fs;

use captionforge::app_config::Config;
use captionforge::app_controller::{FolderSummary, ProcessOutcome};
use captionforge::caption_track::CaptionTrack;
use captionforge::file_utils::FileManager;
use crate::common;

/// Test that one word stream produces a caption list and a document
#[tokio::test]
async fn test_run_withWordStream_shouldWriteCaptionsAndDocument() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_sample_words(temp_dir.path(), "talk")?;
    let output_dir = temp_dir.path().join("out");
    let controller = common::test_controller(Config::default())?;

    let outcome = controller.run(input, output_dir.clone(), false).await?;

    let ass_path = output_dir.join("talk.ass");
    assert_eq!(outcome, ProcessOutcome::Written(ass_path.clone()));

    let track = CaptionTrack::load_json(output_dir.join("talk.captions.json"))?;
    assert_eq!(track.records.len(), 2);
    assert_eq!(track.records[0].text, "Hello world.");
    assert_eq!(track.records[1].start_time, 1.5);

    let document = fs::read_to_string(&ass_path)?;
    assert!(document.starts_with("[Script Info]\n"));
    assert!(document.contains("Style: Default,Cairo,38,"));
    assert!(document.contains("Dialogue: 0,0:00:01.50,0:00:02.60,Default,,0,0,0,,This is a test."));
    assert!(!output_dir.join("talk.srt").exists());
    Ok(())
}

/// Test overwrite protection and the unchanged-content shortcut
#[tokio::test]
async fn test_run_twice_shouldSkipThenKeepIdenticalDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_sample_words(temp_dir.path(), "talk")?;
    let output_dir = temp_dir.path().to_path_buf();
    let controller = common::test_controller(Config::default())?;

    controller.run(input.clone(), output_dir.clone(), false).await?;
    let first = FileManager::file_fingerprint(output_dir.join("talk.ass"))?;

    let skipped = controller.run(input.clone(), output_dir.clone(), false).await?;
    assert!(matches!(skipped, ProcessOutcome::Skipped(_)));

    let forced = controller.run(input, output_dir.clone(), true).await?;
    assert_eq!(forced, ProcessOutcome::Unchanged(output_dir.join("talk.ass")));
    assert_eq!(FileManager::file_fingerprint(output_dir.join("talk.ass"))?, first);
    Ok(())
}

/// Test that a broken file is counted and does not stop the batch
#[tokio::test]
async fn test_runFolder_withOneBrokenFile_shouldProcessTheRest() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("day2");
    fs::create_dir(&nested)?;
    common::create_sample_words(temp_dir.path(), "intro")?;
    common::create_sample_words(&nested, "outro")?;
    common::create_test_file(temp_dir.path(), "broken.words.json", "{ not json")?;
    let controller = common::test_controller(Config::default())?;

    let summary = controller.run_folder(temp_dir.path().to_path_buf(), None, false).await?;

    assert_eq!(
        summary,
        FolderSummary {
            processed: 2,
            skipped: 0,
            errors: 1
        }
    );
    assert!(temp_dir.path().join("intro.ass").exists());
    assert!(nested.join("outro.ass").exists());

    let again = controller.run_folder(temp_dir.path().to_path_buf(), None, false).await?;
    assert_eq!(again.skipped, 2);
    assert_eq!(again.errors, 1);
    Ok(())
}

/// Test that an explicit output directory collects every document of a folder run
#[tokio::test]
async fn test_runFolder_withOutputDir_shouldWriteThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("in");
    fs::create_dir(&input_dir)?;
    common::create_sample_words(&input_dir, "intro")?;
    common::create_sample_words(&input_dir, "outro")?;
    let output_dir = temp_dir.path().join("out");
    let controller = common::test_controller(Config::default())?;

    let summary = controller.run_folder(input_dir.clone(), Some(output_dir.clone()), false).await?;

    assert_eq!(summary.processed, 2);
    assert!(output_dir.join("intro.ass").exists());
    assert!(output_dir.join("outro.captions.json").exists());
    assert!(!input_dir.join("intro.ass").exists());
    Ok(())
}

/// Test that a folder without word streams is an error
#[tokio::test]
async fn test_runFolder_withNoWordStreams_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", "hello")?;
    let controller = common::test_controller(Config::default())?;

    assert!(controller.run_folder(temp_dir.path().to_path_buf(), None, false).await.is_err());
    Ok(())
}

/// Test rendering a saved caption list with an explicit style and SRT export
#[tokio::test]
async fn test_render_withStyleFileAndSrt_shouldApplyBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_sample_words(temp_dir.path(), "talk")?;
    let output_dir = temp_dir.path().to_path_buf();

    let mut config = Config::default();
    config.output.write_srt = true;
    let controller = common::test_controller(config)?;

    let captions = controller.generate_caption_track(&input, &output_dir, false).await?;
    let style_path = common::create_test_file(
        temp_dir.path(),
        "brand.json",
        r##"{"fontFamily": "Noto Sans Arabic", "fontSize": 20, "color": "#00FF00", "backgroundColor": "transparent"}"##,
    )?;

    let outcome = controller.render(captions.path(), &output_dir, Some(style_path.as_path()), false)?;
    assert!(matches!(outcome, ProcessOutcome::Written(_)));

    let document = fs::read_to_string(output_dir.join("talk.ass"))?;
    assert!(document.contains("Style: Default,Noto Sans Arabic,27,&H0000FF00,&H0000FF00,"));

    let srt = fs::read_to_string(output_dir.join("talk.srt"))?;
    assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:00,900\nHello world.\n\n2\n"));
    Ok(())
}

/// Test that regenerating with other limits changes the caption list
#[tokio::test]
async fn test_buildCaptionsWith_withSingleLine_shouldProduceShorterCaptions() -> Result<()> {
    let controller = common::test_controller(Config::default())?;
    let words = common::generate_words(80, 3);

    let mut caption_config = Config::default().caption;
    caption_config.max_chars_per_line = 20;
    caption_config.max_lines_per_caption = 1;

    let default_captions = controller.build_captions(words.clone()).await?;
    let narrow = controller.build_captions_with(words, (&caption_config).into()).await?;

    assert_eq!(
        narrow.iter().map(|c| c.word_count).sum::<usize>(),
        default_captions.iter().map(|c| c.word_count).sum::<usize>()
    );
    assert!(narrow.iter().all(|c| c.lines.len() == 1));
    assert!(
        narrow
            .iter()
            .filter(|c| c.word_count > 1)
            .all(|c| c.text().chars().count() <= 20)
    );
    Ok(())
}
