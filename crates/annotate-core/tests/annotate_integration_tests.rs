//! End-to-end tests: real images through `ResvgCompositor`

use std::{sync::Arc, time::Duration};

use annotate_core::{
    composite::{Annotator, ImageCompositor, ResvgCompositor, builders},
    config::RenderConfig,
    error::AnnotateError,
    model::{AnnotateOptions, AnnotationDescriptor},
};
use annotate_test_utils::{
    fixtures::{self, FixtureImage},
    timing::{assert_duration_below, measure_sync},
};
use image::{GenericImageView, Rgba};
use resvg::usvg;

fn compositor() -> Arc<ResvgCompositor> {
    Arc::new(ResvgCompositor::with_fontdb(Arc::new(usvg::fontdb::Database::new())))
}

fn annotator() -> Annotator {
    Annotator::new(compositor(), RenderConfig::default())
}

fn parse(value: serde_json::Value) -> Vec<AnnotationDescriptor> {
    AnnotationDescriptor::parse_list(&value.to_string()).expect("fixture annotations parse")
}

#[tokio::test]
async fn test_single_circle_end_to_end() {
    let fixture = FixtureImage::png(100, 100);
    let output = fixture.output("out.png");

    let summary = annotator()
        .annotate(
            fixture.path(),
            Some(&output),
            &parse(fixtures::single_circle()),
            &AnnotateOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(summary.width, 100);
    assert_eq!(summary.height, 100);
    assert_eq!(summary.annotation_count, 1);
    assert_eq!(summary.rendered, 1);

    let result = image::open(&output).unwrap();
    assert_eq!(result.dimensions(), (100, 100));
    // ring passes through (70, 50); the center stays untouched
    assert_ne!(result.get_pixel(70, 50), Rgba([255, 255, 255, 255]));
    assert_eq!(result.get_pixel(50, 50), Rgba([255, 255, 255, 255]));
}

#[tokio::test]
async fn test_every_kind_composites_onto_jpeg() {
    let fixture = FixtureImage::with_name("source.jpg", 400, 300);

    let summary = annotator()
        .annotate(
            fixture.path(),
            None,
            &parse(fixtures::every_kind()),
            &AnnotateOptions::with_theme("bold"),
        )
        .await
        .unwrap();

    assert_eq!(summary.output_path, fixture.output("source-annotated.jpg"));
    assert_eq!(summary.rendered, 12);
    assert!(summary.skipped.is_empty());

    let result = image::open(&summary.output_path).unwrap();
    assert_eq!(result.dimensions(), (400, 300));
}

#[tokio::test]
async fn test_unknown_type_skipped_end_to_end() {
    let fixture = FixtureImage::png(80, 80);

    let summary = annotator()
        .annotate(
            fixture.path(),
            None,
            &parse(fixtures::with_unknown_type()),
            &AnnotateOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(summary.annotation_count, 3);
    assert_eq!(summary.rendered, 2);
    assert_eq!(summary.skipped[0].type_name, "sparkle");
    assert!(summary.output_path.exists());
}

#[tokio::test]
async fn test_missing_input_writes_nothing() {
    let fixture = FixtureImage::png(10, 10);
    let missing = fixture.dir().join("nope.png");
    let output = fixture.output("out.png");

    let err = annotator()
        .annotate(&missing, Some(&output), &[], &AnnotateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AnnotateError::InputNotFound { .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_undecodable_input_is_image_io() {
    let fixture = FixtureImage::png(10, 10);
    let bogus = fixture.dir().join("bogus.png");
    std::fs::write(&bogus, b"definitely not an image").unwrap();

    let err = annotator()
        .annotate(&bogus, None, &parse(fixtures::single_circle()), &AnnotateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AnnotateError::ImageIo { .. }));
}

#[tokio::test]
async fn test_blur_regions_gray_out_area() {
    let fixture = FixtureImage::png(120, 60);
    let output = fixture.output("blurred.png");
    let regions = [builders::Region {
        x:      10.0,
        y:      10.0,
        width:  60.0,
        height: 40.0,
    }];

    annotator()
        .annotate(
            fixture.path(),
            Some(&output),
            &builders::blur_regions(&regions, Some(2.0)).unwrap(),
            &AnnotateOptions::default(),
        )
        .await
        .unwrap();

    let result = image::open(&output).unwrap().to_rgba8();
    let center = result.get_pixel(40, 30);
    assert!(center[0] < 200, "blurred region should be gray, got {:?}", center);
    assert_eq!(result.get_pixel(110, 55), &Rgba([255, 255, 255, 255]));
}

#[tokio::test]
async fn test_metadata_through_trait_object() {
    let fixture = FixtureImage::with_name("shot.webp", 33, 17);
    let compositor: Arc<dyn ImageCompositor> = compositor();

    let meta = compositor.metadata(fixture.path()).await.unwrap();
    assert_eq!((meta.width, meta.height), (33, 17));
    assert_eq!(meta.format, "webp");
}

#[test]
fn test_large_document_builds_quickly() {
    let annotations: Vec<AnnotationDescriptor> = (0..500u32)
        .map(|i| {
            let x = f64::from(i % 50) * 30.0;
            let y = f64::from(i / 50) * 30.0;
            builders::callout(x, y, "Step", None, None, None)
        })
        .collect();

    let (doc, elapsed) = measure_sync("build 500 callouts", || {
        annotator().render_svg(1920, 1080, &annotations, None).unwrap()
    });

    assert_eq!(doc.rendered, 500);
    assert_duration_below(elapsed, Duration::from_secs(2), "build 500 callouts");
}
