/*!
 * Integration tests for batch conversion
 */

use anyhow::Result;
use srt2docx::app_config::Config;
use srt2docx::errors::AppError;
use crate::common;

/// Test the single-file scenario: clip.srt becomes clip.docx with 3 rows
#[test]
fn test_run_withClipInPerFileMode_shouldWriteOneTable() -> Result<()> {
    common::init_logging();
    let work = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    common::create_test_file(work.path(), "clip.srt", common::CLIP_SRT)?;

    let report = common::controller(Config::default(), work.path(), program.path()).run("0.1.2")?;

    let output = work.path().join("clip.docx");
    assert_eq!(report.outputs, vec![output.clone()]);
    assert!(report.is_success());

    let body = common::read_docx_part(&output, "word/document.xml")?;
    assert_eq!(common::count_elements(&body, "w:tbl"), 1);
    assert_eq!(common::count_elements(&body, "w:tr"), 3);

    let hello = body.find(">Hello<").expect("Hello row");
    let world = body.find(">World<").expect("World row");
    assert!(hello < world);
    assert!(body.contains(">0:00:05</w:t>"));
    assert!(body.contains(">Duration</w:t>"));
    Ok(())
}

/// Test that every input gets its own document in per-file mode
#[test]
fn test_run_withSeveralInputs_shouldWriteOneDocumentEach() -> Result<()> {
    let work = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    common::create_test_subtitle(work.path(), "a.srt")?;
    common::create_test_subtitle(work.path(), "b.srt")?;
    common::create_test_file(work.path(), "ignored.txt", "x")?;

    let report = common::controller(Config::default(), work.path(), program.path()).run("0.1.2")?;

    assert_eq!(report.outputs.len(), 2);
    let docs = common::files_with_extension(work.path(), "docx")?;
    assert_eq!(docs, vec![work.path().join("a.docx"), work.path().join("b.docx")]);
    Ok(())
}

/// Test the combined scenario: three inputs, one document named after the directory
#[test]
fn test_run_withSingleFileMode_shouldStackTablesInOneDocument() -> Result<()> {
    let root = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    let work = root.path().join("Season1");
    common::create_test_file(&work, "ep1.srt", common::CLIP_SRT)?;
    common::create_test_subtitle(&work, "ep2.srt")?;
    common::create_test_file(&work, "ep3.srt", "")?;

    let mut config = Config::default();
    config.single_file = true;
    let report = common::controller(config, &work, program.path()).run("0.1.2")?;

    let output = work.join("Season1.docx");
    assert_eq!(report.outputs, vec![output.clone()]);
    assert_eq!(common::files_with_extension(&work, "docx")?.len(), 1);

    let body = common::read_docx_part(&output, "word/document.xml")?;
    assert_eq!(common::count_elements(&body, "w:tbl"), 3);
    // header + 2, header + 3, header only
    assert_eq!(common::count_elements(&body, "w:tr"), 3 + 4 + 1);

    let positions: Vec<usize> = ["ep1", "ep2", "ep3"]
        .iter()
        .map(|t| body.find(&format!(">{}<", t)).expect("heading present"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

/// Test that no matching files completes without output or error
#[test]
fn test_run_withNoMatchingFiles_shouldWriteNothing() -> Result<()> {
    let work = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    common::create_test_file(work.path(), "notes.txt", "not a subtitle")?;

    let report = common::controller(Config::default(), work.path(), program.path()).run("0.1.2")?;

    assert!(report.outputs.is_empty());
    assert!(report.failures.is_empty());
    assert!(common::files_with_extension(work.path(), "docx")?.is_empty());
    Ok(())
}

/// Test that two runs differ only in their identifiers
#[test]
fn test_run_twice_shouldProduceDifferentIdentifiers() -> Result<()> {
    let work = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    common::create_test_file(work.path(), "clip.srt", common::CLIP_SRT)?;
    let output = work.path().join("clip.docx");

    common::controller(Config::default(), work.path(), program.path()).run("0.1.2")?;
    let first_core = common::read_docx_part(&output, "docProps/core.xml")?;
    let first_body = common::read_docx_part(&output, "word/document.xml")?;

    common::controller(Config::default(), work.path(), program.path()).run("0.1.2")?;
    let second_core = common::read_docx_part(&output, "docProps/core.xml")?;
    let second_body = common::read_docx_part(&output, "word/document.xml")?;

    let first_id = common::xml_element(&first_core, "dc:identifier").expect("identifier");
    let second_id = common::xml_element(&second_core, "dc:identifier").expect("identifier");
    assert!(first_id.starts_with("v0.1.2-"));
    assert_ne!(first_id, second_id);
    assert_eq!(first_body, second_body);
    Ok(())
}

/// Test that the first bad file stops the batch by default
#[test]
fn test_run_withBadInputAndFailFast_shouldStopBatch() -> Result<()> {
    let work = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    common::create_test_file(work.path(), "a_bad.srt", "not an index\n00:00:01,000 --> 00:00:02,000\nx\n")?;
    common::create_test_file(work.path(), "b_good.srt", common::CLIP_SRT)?;

    let result = common::controller(Config::default(), work.path(), program.path()).run("0.1.2");

    match result {
        Err(AppError::InputParse { path, .. }) => assert!(path.ends_with("a_bad.srt")),
        other => panic!("expected InputParse, got {:?}", other),
    }
    assert!(!work.path().join("b_good.docx").exists());
    Ok(())
}

/// Test that continue_on_error isolates failures and reports them
#[test]
fn test_run_withBadInputAndContinueOnError_shouldReportFailure() -> Result<()> {
    let work = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    common::create_test_file(work.path(), "a_bad.srt", "1\n00:00:05,000 --> 00:00:01,000\nbackwards\n")?;
    common::create_test_file(work.path(), "b_good.srt", common::CLIP_SRT)?;

    let mut config = Config::default();
    config.continue_on_error = true;
    let report = common::controller(config, work.path(), program.path()).run("0.1.2")?;

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("a_bad.srt"));
    assert!(matches!(report.failures[0].error, AppError::InputParse { .. }));
    assert_eq!(report.outputs, vec![work.path().join("b_good.docx")]);
    assert!(!work.path().join("a_bad.docx").exists());
    Ok(())
}

/// Test that a combined run with every input failing saves nothing
#[test]
fn test_run_withAllInputsFailingInCombinedMode_shouldSaveNothing() -> Result<()> {
    let root = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    let work = root.path().join("broken");
    common::create_test_file(&work, "x.srt", "x\n")?;

    let mut config = Config::default();
    config.single_file = true;
    config.continue_on_error = true;
    let report = common::controller(config, &work, program.path()).run("0.1.2")?;

    assert!(report.outputs.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(common::files_with_extension(&work, "docx")?.is_empty());
    Ok(())
}

/// Test that the footer image is resolved from the program's assets directory
#[test]
fn test_run_withFooterShown_shouldEmbedAssetImage() -> Result<()> {
    let work = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    common::create_test_png(&program.path().join("assets"), "logo.png", 20, 10)?;
    common::create_test_file(work.path(), "clip.srt", common::CLIP_SRT)?;

    let mut config = Config::default();
    config.footer.show = true;
    config.footer.watermark = "logo.png".to_string();
    let report = common::controller(config, work.path(), program.path()).run("0.1.2")?;

    let parts = common::docx_part_names(&report.outputs[0])?;
    assert!(parts.iter().any(|p| p.starts_with("word/media/")));
    let footer_part = parts
        .iter()
        .find(|p| p.starts_with("word/footer") && p.ends_with(".xml"))
        .expect("footer part");
    let footer = common::read_docx_part(&report.outputs[0], footer_part)?;
    assert!(footer.contains(r#"cx="914400""#));
    assert!(footer.contains(r#"cy="457200""#));
    Ok(())
}

/// Test that sort settings decide the combined table order
#[test]
fn test_run_withSizeDescendingCombined_shouldOrderTablesBySize() -> Result<()> {
    let root = common::create_temp_dir()?;
    let program = common::create_temp_dir()?;
    let work = root.path().join("sorted");
    common::create_test_file(&work, "a_small.srt", "")?;
    common::create_test_subtitle(&work, "b_large.srt")?;

    let config = Config::from_yaml_str(
        "settings:\n  single_file: true\n  sort:\n    type: size\n    direction: descending\n",
        std::path::Path::new("inline.yaml"),
    )?;
    config.validate()?;
    let report = common::controller(config, &work, program.path()).run("0.1.2")?;

    let body = common::read_docx_part(&report.outputs[0], "word/document.xml")?;
    let large = body.find(">b_large<").expect("large heading");
    let small = body.find(">a_small<").expect("small heading");
    assert!(large < small);
    Ok(())
}
