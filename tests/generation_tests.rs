mod common;

use common::fixtures::{
    drawable_svg, gradient_svg, job_for, plain_template, png_bytes, store_with_csv,
    template_with_background,
};
use common::pdf_assertions::{extract_text, has_image_xobject, page_count};
use labelsmith::{
    BackgroundKind, FieldKind, FieldMapping, FieldSpec, GenerationController, GenerationError,
    JobStatus, RowRange,
};

#[test]
fn one_page_per_row_with_resolved_text() {
    let (store, dataset) = store_with_csv(b"SKU,Name\nA1,Widget\nA2,Gadget");
    let template = plain_template(vec![
        FieldSpec::text("sku", 5.0, 5.0),
        FieldSpec::text("name", 5.0, 12.0),
    ]);
    let controller = GenerationController::new(&store, &template);
    let mut job = job_for(
        dataset,
        vec![
            FieldMapping::new("sku", 1),
            FieldMapping::new("name", 2).with_order(1),
        ],
    );

    let outcome = controller.run(&mut job).unwrap();
    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(page_count(&outcome.pdf), 2);

    let text = extract_text(&outcome.pdf);
    assert!(text.contains("Widget"), "missing row text in: {text}");
    assert!(text.contains("Gadget"), "missing row text in: {text}");
}

#[test]
fn number_format_transforms_cell_values() {
    let (store, dataset) = store_with_csv(b"Price\n3\nabc");
    let template = plain_template(vec![FieldSpec::text("price", 5.0, 5.0)]);
    let controller = GenerationController::new(&store, &template);
    let mut job = job_for(
        dataset,
        vec![FieldMapping::new("price", 1).with_format("number:.2f")],
    );

    let outcome = controller.run(&mut job).unwrap();
    let text = extract_text(&outcome.pdf);
    assert!(text.contains("3.00"), "formatted value missing in: {text}");
    // The malformed value survives untransformed, with a warning logged.
    assert!(text.contains("abc"), "raw value missing in: {text}");
    assert!(
        outcome
            .log
            .entries()
            .iter()
            .any(|e| e.message.contains("number:.2f") && e.row == Some(2))
    );
}

#[test]
fn inverted_range_blocks_the_start() {
    let (store, dataset) = store_with_csv(b"SKU\nA1\nA2\nA3");
    let template = plain_template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
    let controller = GenerationController::new(&store, &template);
    let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);
    job.request.range = RowRange::new(3, 2);

    match controller.run(&mut job) {
        Err(GenerationError::Validation(reasons)) => {
            assert!(
                reasons
                    .iter()
                    .any(|r| r.contains("start row 3 is greater than end row 2")),
                "got: {reasons:?}"
            );
        }
        other => panic!("expected a validation failure, got {other:?}"),
    }
    assert_eq!(job.status(), JobStatus::Pending);
}

#[test]
fn failing_row_is_skipped_and_logged() {
    let oversized = "x".repeat(4000);
    let data = format!("Code\nAAA\n{oversized}\nCCC");
    let (store, dataset) = store_with_csv(data.as_bytes());

    let mut code = FieldSpec::text("code", 5.0, 5.0);
    code.kind = FieldKind::DataMatrix;
    code.width_mm = Some(20.0);
    code.height_mm = Some(20.0);
    let template = plain_template(vec![code]);

    let controller = GenerationController::new(&store, &template);
    let mut job = job_for(dataset, vec![FieldMapping::new("code", 1)]);

    let outcome = controller.run(&mut job).unwrap();
    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(page_count(&outcome.pdf), 2);

    let errors: Vec<_> = outcome.log.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row, Some(2));
}

#[test]
fn datamatrix_fields_embed_a_symbol_image() {
    let (store, dataset) = store_with_csv(b"Code\n0104601234567890");
    let mut code = FieldSpec::text("code", 25.0, 5.0);
    code.kind = FieldKind::DataMatrix;
    code.width_mm = Some(20.0);
    code.height_mm = Some(20.0);
    let template = plain_template(vec![code]);

    let controller = GenerationController::new(&store, &template);
    let mut job = job_for(dataset, vec![FieldMapping::new("code", 1)]);
    let outcome = controller.run(&mut job).unwrap();

    assert_eq!(page_count(&outcome.pdf), 1);
    assert!(has_image_xobject(&outcome.pdf));
}

#[test]
fn raster_background_is_composited_onto_every_page() {
    let (store, dataset) = store_with_csv(b"SKU\nA1\nA2");
    let template = template_with_background(
        vec![FieldSpec::text("sku", 5.0, 5.0)],
        BackgroundKind::Raster,
        Some(png_bytes(200, 120)),
    );
    let controller = GenerationController::new(&store, &template);
    let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);

    let outcome = controller.run(&mut job).unwrap();
    assert_eq!(page_count(&outcome.pdf), 2);
    assert!(has_image_xobject(&outcome.pdf));
    assert_eq!(outcome.log.errors().count(), 0);
}

#[test]
fn drawable_vector_background_stays_vector() {
    let (store, dataset) = store_with_csv(b"SKU\nA1");
    let template = template_with_background(
        vec![FieldSpec::text("sku", 5.0, 5.0)],
        BackgroundKind::Vector,
        Some(drawable_svg()),
    );
    let controller = GenerationController::new(&store, &template);
    let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);

    let outcome = controller.run(&mut job).unwrap();
    assert_eq!(page_count(&outcome.pdf), 1);
    // Drawn as path commands, not as an embedded raster.
    assert!(!has_image_xobject(&outcome.pdf));
}

#[test]
fn gradient_vector_background_falls_back_to_raster() {
    let (store, dataset) = store_with_csv(b"SKU\nA1");
    let template = template_with_background(
        vec![FieldSpec::text("sku", 5.0, 5.0)],
        BackgroundKind::Vector,
        Some(gradient_svg()),
    );
    let controller = GenerationController::new(&store, &template);
    let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);

    let outcome = controller.run(&mut job).unwrap();
    assert_eq!(page_count(&outcome.pdf), 1);
    assert!(has_image_xobject(&outcome.pdf));
    assert!(
        outcome
            .log
            .entries()
            .iter()
            .any(|e| e.message.contains("rasterized"))
    );
}

#[test]
fn cancellation_before_the_first_row_yields_cancelled() {
    let (store, dataset) = store_with_csv(b"SKU\nA1\nA2");
    let template = plain_template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
    let controller = GenerationController::new(&store, &template);
    controller.cancel_token().cancel();
    let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);

    assert!(matches!(
        controller.run(&mut job),
        Err(GenerationError::Cancelled)
    ));
    assert_eq!(job.status(), JobStatus::Cancelled);
}

#[test]
fn progress_counters_cover_the_whole_range() {
    let rows: String = (1..=25).map(|i| format!("R{i}\n")).collect();
    let data = format!("SKU\n{rows}");
    let (store, dataset) = store_with_csv(data.as_bytes());
    let template = plain_template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
    let controller = GenerationController::new(&store, &template);
    let progress = controller.progress();
    let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);

    let outcome = controller.run(&mut job).unwrap();
    assert_eq!(page_count(&outcome.pdf), 25);
    assert_eq!(progress.total(), 25);
    assert_eq!(progress.generated(), 25);
    assert_eq!(job.progress_percent, 100);

    // Counters are written every tenth row and on the final row; each write
    // leaves a milestone entry in the job log.
    let milestones: Vec<&str> = outcome
        .log
        .entries()
        .iter()
        .filter(|e| e.message.starts_with("processed "))
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(
        milestones,
        vec![
            "processed 10 of 25 rows",
            "processed 20 of 25 rows",
            "processed 25 of 25 rows",
        ]
    );
}
