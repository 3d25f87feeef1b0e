//! End-to-end tests of detection followed by annotation on real folders.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::path::Path;

use deepguard_adapters::{
    write_report, BatchStamp, FsAnnotationWriter, FsImageFolder, TfliteClassifier,
};
use deepguard_core::{
    AnnotationConfig, Annotator, BatchReport, DetectionConfig, Detector, NoProgress, Verdict,
};
use deepguard_test_support::{
    MockProgressSink, RecordingRenderer, StubClassifier, SyntheticImageBuilder,
};
use image::Rgb;

const GREEN: Rgb<u8> = Rgb([0, 180, 0]);
const YELLOW: Rgb<u8> = Rgb([255, 200, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const GREY: Rgb<u8> = Rgb([128, 128, 128]);

const FIXTURE_MODEL: &str = "tests/fixtures/tiny_detector.tflite";

#[test]
fn test_three_images_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::write_folder(
        dir.path(),
        &[
            ("c.png", SyntheticImageBuilder::checkerboard(40, 30, 4)),
            ("a.png", SyntheticImageBuilder::uniform_gray(40, 30, 50)),
            ("b.png", SyntheticImageBuilder::horizontal_gradient(40, 30)),
        ],
    )
    .unwrap();

    let source = FsImageFolder::new(dir.path());
    let detection = DetectionConfig::default();
    let classifier = StubClassifier::new(&[0.1, 0.45, 0.85]);
    let progress = MockProgressSink::new();

    let results = Detector::new(detection.clone())
        .detect(&source, &classifier, &progress)
        .unwrap();
    assert_eq!(results.scored_count(), 3);
    assert_eq!(progress.completed_count(), 3);
    assert_eq!(progress.finished_counts(), Some((3, 0)));

    let verdicts: Vec<_> = results
        .iter()
        .map(|(_, p)| p.verdict(detection.fake_threshold).unwrap())
        .collect();
    assert_eq!(verdicts, vec![Verdict::Real, Verdict::Real, Verdict::Fake]);

    let renderer = RecordingRenderer::new();
    let writer = FsAnnotationWriter::new(dir.path(), &AnnotationConfig::default());
    let summary = Annotator::new(detection, AnnotationConfig::default())
        .annotate(&source, &results, &renderer, &writer)
        .unwrap();
    assert_eq!(summary.annotated, 3);

    let headers = renderer.headers();
    assert_eq!(headers[0], vec!["Sample #1", "Pred: Real", "Conf: 0.100"]);
    assert_eq!(headers[1], vec!["Sample #2", "Pred: Real", "Conf: 0.450"]);
    assert_eq!(headers[2], vec!["Sample #3", "Pred: Fake", "Conf: 0.850"]);

    let colors: Vec<_> = renderer.calls().iter().step_by(3).map(|c| c.color).collect();
    assert_eq!(colors, vec![GREEN, YELLOW, RED]);

    for name in ["a.png", "b.png", "c.png"] {
        let out = image::open(dir.path().join("annotated_results").join(name))
            .unwrap()
            .to_rgb8();
        assert_eq!(out.dimensions(), (40, 30 + 85));
        assert_eq!(*out.get_pixel(0, 0), Rgb([255, 255, 255]));
    }
    let original = image::open(dir.path().join("a.png")).unwrap().to_rgb8();
    let annotated = image::open(dir.path().join("annotated_results/a.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!(annotated.get_pixel(5, 85 + 5), original.get_pixel(5, 5));
}

#[test]
fn test_corrupt_file_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::write_folder(
        dir.path(),
        &[
            ("a.jpg", SyntheticImageBuilder::uniform_gray(16, 16, 30)),
            ("c.png", SyntheticImageBuilder::uniform_gray(16, 16, 90)),
            ("d.bmp", SyntheticImageBuilder::uniform_gray(16, 16, 150)),
        ],
    )
    .unwrap();
    SyntheticImageBuilder::write_corrupt(dir.path(), "b.jpeg").unwrap();
    std::fs::write(dir.path().join("readme.md"), "ignore me").unwrap();

    let source = FsImageFolder::new(dir.path());
    let classifier = StubClassifier::new(&[0.2, 0.6, 0.9]);
    let results = Detector::default()
        .detect(&source, &classifier, &NoProgress)
        .unwrap();

    let keys: BTreeSet<_> = results.files().collect();
    assert_eq!(keys, BTreeSet::from(["a.jpg", "b.jpeg", "c.png", "d.bmp"]));
    assert_eq!(results.scored_count(), 3);
    assert_eq!(results.failed_count(), 1);
    assert!(results.get("b.jpeg").unwrap().error().is_some());
    assert_eq!(classifier.call_count(), 3);

    // an undecodable file is skipped by the annotator as well
    let renderer = RecordingRenderer::new();
    let writer = FsAnnotationWriter::new(dir.path(), &AnnotationConfig::default());
    let summary = Annotator::default()
        .annotate(&source, &results, &renderer, &writer)
        .unwrap();
    assert_eq!(summary.annotated, 3);
    assert_eq!(summary.skipped, 1);
    assert!(renderer.calls().iter().all(|c| c.color != GREY));
}

#[test]
fn test_runtime_failure_renders_unknown() {
    let dir = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::write_folder(
        dir.path(),
        &[
            ("a.png", SyntheticImageBuilder::uniform_gray(16, 16, 30)),
            ("b.png", SyntheticImageBuilder::uniform_gray(16, 16, 90)),
        ],
    )
    .unwrap();

    let source = FsImageFolder::new(dir.path());
    let classifier = StubClassifier::new(&[0.7]).then_fail("interpreter crashed");
    let results = Detector::default()
        .detect(&source, &classifier, &NoProgress)
        .unwrap();
    assert!(results
        .get("b.png")
        .unwrap()
        .error()
        .unwrap()
        .contains("interpreter crashed"));

    let renderer = RecordingRenderer::new();
    let writer = FsAnnotationWriter::new(dir.path(), &AnnotationConfig::default());
    Annotator::default()
        .annotate(&source, &results, &renderer, &writer)
        .unwrap();

    assert_eq!(renderer.headers()[1], vec!["Sample #2", "Pred: Unknown", "Conf: n/a"]);
    assert_eq!(renderer.calls()[3].color, GREY);
    assert_eq!(renderer.calls()[0].color, RED);
}

#[test]
fn test_report_written_next_to_annotations() {
    let dir = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::write_folder(
        dir.path(),
        &[("a.png", SyntheticImageBuilder::uniform_gray(8, 8, 30))],
    )
    .unwrap();

    let source = FsImageFolder::new(dir.path());
    let detection = DetectionConfig::default();
    let results = Detector::new(detection.clone())
        .detect(&source, &StubClassifier::new(&[0.3]), &NoProgress)
        .unwrap();

    let stamp = BatchStamp::now();
    let report = BatchReport::new(stamp.batch_id, stamp.created_at, "stub", &results, &detection);
    let writer = FsAnnotationWriter::new(dir.path(), &AnnotationConfig::default());
    let path = write_report(writer.dir(), &report).unwrap();

    assert!(path.ends_with("annotated_results/confidence_report.json"));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["is_deepfake"], false);
    assert_eq!(json["results"][0]["band"], "medium_low");
}

#[test]
fn test_fixture_model_over_folder() {
    let model = Path::new(env!("CARGO_MANIFEST_DIR")).join(FIXTURE_MODEL);
    let dir = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::write_folder(
        dir.path(),
        &[
            ("black.png", SyntheticImageBuilder::uniform_gray(20, 12, 0)),
            ("white.png", SyntheticImageBuilder::uniform_gray(12, 20, 255)),
        ],
    )
    .unwrap();
    SyntheticImageBuilder::write_corrupt(dir.path(), "broken.jpg").unwrap();

    let classifier = TfliteClassifier::load(&model).unwrap();
    let detection = DetectionConfig::default();
    let results = Detector::new(detection.clone())
        .detect(&FsImageFolder::new(dir.path()), &classifier, &NoProgress)
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.get("broken.jpg").unwrap().error().is_some());

    // sigmoid(-1) and sigmoid(1)
    let black = results.get("black.png").unwrap();
    assert!((black.confidence().unwrap() - 0.268_941_4).abs() < 1e-5);
    assert_eq!(black.verdict(detection.fake_threshold), Some(Verdict::Real));

    let white = results.get("white.png").unwrap();
    assert!((white.confidence().unwrap() - 0.731_058_6).abs() < 1e-5);
    assert_eq!(white.verdict(detection.fake_threshold), Some(Verdict::Fake));
}
