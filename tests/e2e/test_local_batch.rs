use crate::e2e::helpers::fakes::{FakeSynthesizer, FakeTranslator};

use podcast_voice::domain::episode::{BatchRunner, EpisodeService};
use podcast_voice::infrastructure::storage::{LocalArtifactSink, LocalDocumentSource};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

fn runner() -> (BatchRunner, Arc<FakeTranslator>, Arc<FakeSynthesizer>) {
    let translator = Arc::new(FakeTranslator::default());
    let synthesizer = Arc::new(FakeSynthesizer::default());
    let service = Arc::new(EpisodeService::new(translator.clone(), synthesizer.clone()));
    (BatchRunner::new(service), translator, synthesizer)
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[tokio::test]
async fn it_should_convert_every_script_in_the_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "ep1.txt", "lang: es\nvoice: abc\n---\nHello everyone");
    write(input.path(), "ep2.txt", "Just plain text.");
    write(input.path(), "notes.md", "not a script");

    let (runner, translator, synthesizer) = runner();
    let result = runner
        .run(
            &LocalDocumentSource::new(input.path()),
            &LocalArtifactSink::new(output.path()),
        )
        .await
        .unwrap();

    assert_eq!(result.total(), 2);
    assert_eq!(result.success_count(), 2);

    assert_eq!(
        std::fs::read(output.path().join("ep1_es.mp3")).unwrap(),
        b"AUDIO:[es] Hello everyone".to_vec()
    );
    assert_eq!(
        std::fs::read(output.path().join("ep2.mp3")).unwrap(),
        b"AUDIO:Just plain text.".to_vec()
    );

    assert_eq!(translator.calls().len(), 1);
    let voices: Vec<String> = synthesizer
        .calls()
        .into_iter()
        .map(|(_, voice)| voice.voice_id)
        .collect();
    assert_eq!(voices, vec!["abc".to_string(), "fake-default-voice".to_string()]);
}

#[tokio::test]
async fn it_should_keep_going_after_a_failed_document() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "a_good.txt", "First episode");
    write(input.path(), "b_bad.txt", "stability: loud\n---\nNever spoken");
    write(input.path(), "c_good.txt", "Third episode");

    let (runner, _, synthesizer) = runner();
    let result = runner
        .run(
            &LocalDocumentSource::new(input.path()),
            &LocalArtifactSink::new(output.path()),
        )
        .await
        .unwrap();

    assert_eq!(result.success_count(), 2);
    assert_eq!(result.failure_count(), 1);

    let order: Vec<&str> = result.outcomes.iter().map(|o| o.document.as_str()).collect();
    assert_eq!(order, vec!["a_good.txt", "b_bad.txt", "c_good.txt"]);

    let summary = result.to_string();
    assert!(summary.starts_with("2/3 files processed successfully\n"), "{}", summary);
    assert!(summary.contains("❌ b_bad.txt: invalid stability value 'loud'"), "{}", summary);

    assert!(output.path().join("a_good.mp3").exists());
    assert!(!output.path().join("b_bad.mp3").exists());
    assert!(output.path().join("c_good.mp3").exists());
    assert_eq!(synthesizer.calls().len(), 2);
}

#[tokio::test]
async fn it_should_report_empty_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let (runner, _, synthesizer) = runner();
    let result = runner
        .run(
            &LocalDocumentSource::new(input.path()),
            &LocalArtifactSink::new(output.path()),
        )
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(synthesizer.calls().is_empty());
}

#[tokio::test]
async fn it_should_fail_when_input_directory_is_missing() {
    let root = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let (runner, _, _) = runner();
    let result = runner
        .run(
            &LocalDocumentSource::new(root.path().join("missing")),
            &LocalArtifactSink::new(output.path()),
        )
        .await;

    assert!(result.is_err());
}
