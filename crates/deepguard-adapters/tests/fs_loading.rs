//! Integration tests for folder listing and image loading.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use deepguard_adapters::{load_image, FsImageFolder};
use deepguard_core::{DetectError, Detector, ImageSource};
use deepguard_test_support::SyntheticImageBuilder;

#[test]
fn test_lists_files_but_not_subfolders() {
    let dir = tempfile::tempdir().unwrap();
    SyntheticImageBuilder::write_folder(
        dir.path(),
        &[("a.png", SyntheticImageBuilder::uniform_gray(4, 4, 1))],
    )
    .unwrap();
    std::fs::create_dir(dir.path().join("annotated_results")).unwrap();
    SyntheticImageBuilder::write_folder(
        &dir.path().join("annotated_results"),
        &[("a.png", SyntheticImageBuilder::uniform_gray(4, 4, 1))],
    )
    .unwrap();

    let source = FsImageFolder::new(dir.path());
    let names: Vec<_> = source.entries().unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["a.png"]);
}

#[test]
fn test_load_png_and_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SyntheticImageBuilder::write_folder(
        dir.path(),
        &[
            ("face.png", SyntheticImageBuilder::rgb_uniform(8, 6, 10, 20, 30)),
            ("face.jpg", SyntheticImageBuilder::uniform_gray(8, 6, 128)),
            ("face.bmp", SyntheticImageBuilder::uniform_gray(8, 6, 200)),
        ],
    )
    .unwrap();

    for path in paths {
        let image = load_image(&path).expect("should decode");
        assert_eq!((image.width(), image.height()), (8, 6));
    }
}

#[test]
fn test_corrupt_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = SyntheticImageBuilder::write_corrupt(dir.path(), "broken.jpg").unwrap();

    let err = load_image(&path).unwrap_err();
    assert!(matches!(err, DetectError::Load { .. }));
    assert!(err.is_per_item());
}

#[test]
fn test_folder_with_only_unsupported_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("clip.mp4"), [0u8; 16]).unwrap();
    SyntheticImageBuilder::write_folder(
        dir.path(),
        &[("scan.tiff", SyntheticImageBuilder::uniform_gray(4, 4, 9))],
    )
    .unwrap();

    let err = Detector::default()
        .catalog(&FsImageFolder::new(dir.path()))
        .unwrap_err();
    assert!(matches!(err, DetectError::NoImages { .. }));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_name_is_listed_and_annotated_under_original_name() {
    use deepguard_adapters::FsAnnotationWriter;
    use deepguard_core::{AnnotationConfig, AnnotationSink};
    use image::RgbImage;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let raw_name = OsStr::from_bytes(b"face\xff.png");
    SyntheticImageBuilder::uniform_gray(4, 4, 60)
        .save(dir.path().join(raw_name))
        .unwrap();

    let source = FsImageFolder::new(dir.path());
    let entries = Detector::default().catalog(&source).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "face\u{fffd}.png");
    assert!(source.load(&entries[0]).is_ok());

    let writer = FsAnnotationWriter::new(dir.path(), &AnnotationConfig::default());
    writer.prepare().unwrap();
    writer.save(&entries[0], &RgbImage::new(4, 4)).unwrap();
    let out = dir.path().join("annotated_results");
    assert!(out.join(raw_name).is_file());
}
