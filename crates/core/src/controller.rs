//! The generation controller: preflight validation and the batch run.
//!
//! One controller drives one job sequentially, in row order. It is the sole
//! writer of the job's status and progress fields; pollers observe progress
//! through a shared [`ProgressHandle`] and may request cooperative
//! cancellation through a [`CancelToken`].

use crate::error::GenerationError;
use crate::job::{GenerationJob, JobStatus};
use crate::log::GenerationLog;
use crate::mapping::FieldMapping;
use crate::progress::{CancelToken, ProgressHandle};
use crate::resolve::resolve;
use labelsmith_ingest::{DatasetStatus, DatasetStore, NumberedRow};
use labelsmith_render::{
    ElementContent, LabelDocumentRenderer, PageBackground, PositionedElement, RenderError,
    TextBlock, composite_background, datamatrix_symbol,
};
use labelsmith_template::{FieldKind, FieldSpec, LabelTemplate};
use labelsmith_types::{mm_to_pt, mm_to_px};

/// Progress counters are written every this many rows, plus on the final
/// row, to bound write amplification.
const PROGRESS_EVERY: usize = 10;

/// Target pixel box for a DataMatrix field that declares no size.
const DEFAULT_SYMBOL_PX: u32 = 100;

/// What a completed run produced.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub pdf: Vec<u8>,
    pub pages: usize,
    pub log: GenerationLog,
}

pub struct GenerationController<'a> {
    store: &'a DatasetStore,
    template: &'a LabelTemplate,
    cancel: CancelToken,
    progress: ProgressHandle,
}

impl<'a> GenerationController<'a> {
    pub fn new(store: &'a DatasetStore, template: &'a LabelTemplate) -> Self {
        Self {
            store,
            template,
            cancel: CancelToken::new(),
            progress: ProgressHandle::new(),
        }
    }

    /// Handle for requesting cooperative cancellation; honored at row
    /// boundaries.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Shared view of the run's progress counters.
    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    /// Side-effect-free start validation. Returns every reason the job may
    /// not start; an empty list means the job is ready.
    pub fn preflight(&self, job: &GenerationJob) -> Vec<String> {
        let mut reasons = Vec::new();

        if job.status() != JobStatus::Pending {
            reasons.push(format!("job is not pending (status: {})", job.status()));
        }
        if job.request.mappings.is_empty() {
            reasons.push("no field mappings are configured".to_string());
        }
        if !self.template.is_active() {
            reasons.push(format!("template '{}' is inactive", self.template.name));
        }
        if job.request.range.start.is_some_and(|s| s < 1) {
            reasons.push("start row must be at least 1".to_string());
        }
        if job.request.labels_per_page < 1 {
            reasons.push("labels per page must be at least 1".to_string());
        }

        match self.store.dataset(job.request.dataset) {
            Err(e) => reasons.push(e.to_string()),
            Ok(meta) => {
                if meta.status != DatasetStatus::Completed {
                    reasons.push(format!(
                        "dataset {} is not ready (status: {})",
                        meta.id, meta.status
                    ));
                } else {
                    let (start, end) = job.request.range.bounds(meta.row_count);
                    if start > end {
                        reasons.push(format!(
                            "start row {start} is greater than end row {end}"
                        ));
                    }
                    if start > meta.row_count {
                        reasons.push(format!(
                            "start row {start} is beyond the dataset ({} rows)",
                            meta.row_count
                        ));
                    }
                    for mapping in &job.request.mappings {
                        if mapping.column == 0 || mapping.column > meta.column_count {
                            reasons.push(format!(
                                "mapping '{}' references column {} but the dataset has {} columns",
                                mapping.field, mapping.column, meta.column_count
                            ));
                        }
                    }
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for mapping in &job.request.mappings {
            if self.template.field(&mapping.field).is_none() {
                reasons.push(format!(
                    "mapping references unknown template field '{}'",
                    mapping.field
                ));
            }
            if !seen.insert(mapping.field.as_str()) {
                reasons.push(format!(
                    "template field '{}' is mapped more than once",
                    mapping.field
                ));
            }
        }

        reasons
    }

    /// Runs the job to a terminal status.
    ///
    /// Preflight failures leave the job `pending`. A per-row failure is
    /// logged and skipped; any other failure moves the job to `failed` with
    /// the message stored, cancellation to `cancelled`.
    pub fn run(&self, job: &mut GenerationJob) -> Result<GenerationOutcome, GenerationError> {
        let reasons = self.preflight(job);
        if !reasons.is_empty() {
            return Err(GenerationError::Validation(reasons));
        }

        let mut log = GenerationLog::new();
        match self.execute(job, &mut log) {
            Ok((pdf, pages)) => {
                job.complete()?;
                log.info(format!("generation completed: {pages} pages"));
                log::info!("job {}: completed with {pages} pages", job.id);
                Ok(GenerationOutcome { pdf, pages, log })
            }
            Err(GenerationError::Cancelled) => {
                job.cancel()?;
                log::info!("job {}: cancelled", job.id);
                Err(GenerationError::Cancelled)
            }
            Err(e) => {
                job.fail(e.to_string())?;
                log::error!("job {}: failed: {e}", job.id);
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        job: &mut GenerationJob,
        log: &mut GenerationLog,
    ) -> Result<(Vec<u8>, usize), GenerationError> {
        job.begin(0)?;

        let meta = self.store.dataset(job.request.dataset)?;
        let (start, end) = job.request.range.bounds(meta.row_count);
        let rows = self.store.rows_in_range(job.request.dataset, start, end)?;

        let total = rows.len() as u32;
        job.total = total;
        self.progress.set_total(total);
        log.info(format!("generating rows {start}..={end} ({total} rows)"));

        // The background is identical on every page; prepare it once.
        // Unreadable artwork degrades to a blank page background rather than
        // failing the whole run.
        let background = match composite_background(self.template) {
            Ok(composited) => {
                for note in composited.notes {
                    log.warning(note, None);
                }
                composited.background
            }
            Err(e) => {
                let message =
                    format!("background unavailable ({e}); pages render without background");
                log::warn!("{message}");
                log.warning(message, None);
                PageBackground::None
            }
        };

        let mut renderer =
            LabelDocumentRenderer::new(&self.template.name, self.template.geometry(), &background)?;
        let mappings = job.request.ordered_mappings();

        let mut pages: u32 = 0;
        for (index, row) in rows.iter().enumerate() {
            // Cooperative cancellation at row boundaries only.
            if self.cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }

            let result = self
                .build_row_elements(row, &mappings, log)
                .and_then(|elements| renderer.render_page(&elements));
            match result {
                Ok(()) => pages += 1,
                Err(e) => {
                    log.error(format!("row {}: {e}", row.row), Some(row.row));
                    log::error!("job {}: row {} failed: {e}", job.id, row.row);
                }
            }

            let processed = index + 1;
            if processed % PROGRESS_EVERY == 0 || processed == rows.len() {
                job.update_progress(processed as u32);
                self.progress.set_generated(processed as u32);
                log.info(format!("processed {processed} of {total} rows"));
            }
        }

        let pages = pages as usize;
        debug_assert_eq!(pages, renderer.page_count());
        let pdf = renderer.into_bytes()?;
        Ok((pdf, pages))
    }

    fn build_row_elements(
        &self,
        row: &NumberedRow,
        mappings: &[FieldMapping],
        log: &mut GenerationLog,
    ) -> Result<Vec<PositionedElement>, RenderError> {
        let mut elements = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            // Preflight guarantees the field exists; skip defensively anyway.
            let Some(field) = self.template.field(&mapping.field) else {
                continue;
            };

            let resolution = resolve(mapping, &row.values);
            for note in resolution.notes {
                log.warning(note, Some(row.row));
            }

            if resolution.value.is_empty() {
                if mapping.required || field.required {
                    log.warning(
                        format!("required field '{}' is empty; skipped", mapping.field),
                        Some(row.row),
                    );
                }
                continue;
            }

            elements.push(self.build_element(field, resolution.value)?);
        }
        Ok(elements)
    }

    fn build_element(
        &self,
        field: &FieldSpec,
        value: String,
    ) -> Result<PositionedElement, RenderError> {
        let x = mm_to_pt(field.x_mm);
        let y = mm_to_pt(field.y_mm);
        let width = field.width_mm.map(mm_to_pt);
        let height = field.height_mm.map(mm_to_pt);

        let content = match field.kind {
            FieldKind::DataMatrix => {
                let dpi = self.template.geometry().dpi();
                let target_w = field
                    .width_mm
                    .map(|w| mm_to_px(w, dpi))
                    .unwrap_or(DEFAULT_SYMBOL_PX);
                let target_h = field
                    .height_mm
                    .map(|h| mm_to_px(h, dpi))
                    .unwrap_or(target_w);
                ElementContent::Image(datamatrix_symbol(&value, target_w, target_h)?)
            }
            _ => ElementContent::Text(TextBlock {
                content: value,
                font_size: field.font.size,
                font_family: field.font.family.clone(),
                bold: field.font.bold,
                italic: field.font.italic,
                alignment: field.alignment,
            }),
        };

        Ok(PositionedElement {
            content,
            x,
            y,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{GenerationRequest, RowRange};
    use labelsmith_ingest::{DelimiterSpec, SourceFormat};
    use labelsmith_template::{BackgroundKind, Margins, TemplateGeometry};
    use labelsmith_types::{DatasetId, JobId, OwnerId, Size, TemplateId};

    fn store_with(data: &[u8]) -> (DatasetStore, DatasetId) {
        let mut store = DatasetStore::new();
        let id = store.create_dataset(
            "data.csv",
            SourceFormat::Delimited {
                delimiter: DelimiterSpec::Auto,
            },
            true,
            OwnerId::new(1),
        );
        store.ingest(id, data).unwrap();
        (store, id)
    }

    fn template(fields: Vec<FieldSpec>) -> LabelTemplate {
        let geometry = TemplateGeometry::new(
            Size::new(50.0, 30.0),
            Size::new(50.0, 30.0),
            Margins::zero(),
            300,
        )
        .unwrap();
        LabelTemplate::new(
            TemplateId::new(1),
            "shelf label",
            OwnerId::new(1),
            BackgroundKind::None,
            None,
            geometry,
            fields,
        )
        .unwrap()
    }

    fn job_for(dataset: DatasetId, mappings: Vec<FieldMapping>) -> GenerationJob {
        let mut request =
            GenerationRequest::new("test run", dataset, TemplateId::new(1), OwnerId::new(1));
        request.mappings = mappings;
        GenerationJob::new(JobId::new(1), request)
    }

    #[test]
    fn happy_path_renders_one_page_per_row() {
        let (store, dataset) = store_with(b"SKU,Name\nA1,Widget\nA2,Gadget");
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);

        let outcome = controller.run(&mut job).unwrap();
        assert_eq!(outcome.pages, 2);
        assert!(outcome.pdf.starts_with(b"%PDF"));
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.progress_percent, 100);
        assert_eq!(outcome.log.errors().count(), 0);
    }

    #[test]
    fn preflight_rejects_inverted_row_range() {
        let (store, dataset) = store_with(b"SKU\nA1\nA2\nA3");
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);
        job.request.range = RowRange::new(3, 2);

        let reasons = controller.preflight(&job);
        assert!(
            reasons
                .iter()
                .any(|r| r.contains("start row 3 is greater than end row 2")),
            "got: {reasons:?}"
        );
        assert!(matches!(
            controller.run(&mut job),
            Err(GenerationError::Validation(_))
        ));
        assert_eq!(job.status(), JobStatus::Pending);
    }

    #[test]
    fn preflight_collects_every_reason() {
        let (mut store, _) = store_with(b"SKU\nA1");
        // A second dataset that never completed.
        let stuck = store.create_dataset(
            "stuck.csv",
            SourceFormat::Delimited {
                delimiter: DelimiterSpec::Auto,
            },
            true,
            OwnerId::new(1),
        );
        let mut template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        template.set_active(false);
        let controller = GenerationController::new(&store, &template);
        let job = job_for(stuck, vec![]);

        let reasons = controller.preflight(&job);
        assert!(reasons.iter().any(|r| r.contains("no field mappings")));
        assert!(reasons.iter().any(|r| r.contains("inactive")));
        assert!(reasons.iter().any(|r| r.contains("not ready")));
    }

    #[test]
    fn preflight_checks_mapped_columns_and_fields() {
        let (store, dataset) = store_with(b"SKU\nA1");
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let job = job_for(
            dataset,
            vec![
                FieldMapping::new("sku", 9),
                FieldMapping::new("missing", 1),
            ],
        );

        let reasons = controller.preflight(&job);
        assert!(
            reasons
                .iter()
                .any(|r| r.contains("references column 9") && r.contains("1 columns"))
        );
        assert!(
            reasons
                .iter()
                .any(|r| r.contains("unknown template field 'missing'"))
        );
    }

    #[test]
    fn preflight_rejects_a_field_mapped_twice() {
        let (store, dataset) = store_with(b"SKU,Name\nA1,Widget");
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let job = job_for(
            dataset,
            vec![FieldMapping::new("sku", 1), FieldMapping::new("sku", 2)],
        );

        let reasons = controller.preflight(&job);
        assert!(
            reasons
                .iter()
                .any(|r| r.contains("'sku' is mapped more than once")),
            "got: {reasons:?}"
        );
    }

    #[test]
    fn preflight_rejects_a_zero_start_row() {
        let (store, dataset) = store_with(b"SKU\nA1\nA2");
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);
        job.request.range = RowRange::new(0, 2);

        let reasons = controller.preflight(&job);
        assert!(
            reasons.iter().any(|r| r.contains("at least 1")),
            "got: {reasons:?}"
        );
        assert!(matches!(
            controller.run(&mut job),
            Err(GenerationError::Validation(_))
        ));
        assert_eq!(job.status(), JobStatus::Pending);
    }

    #[test]
    fn preflight_rejects_zero_labels_per_page() {
        let (store, dataset) = store_with(b"SKU\nA1");
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);
        job.request.labels_per_page = 0;

        let reasons = controller.preflight(&job);
        assert!(
            reasons
                .iter()
                .any(|r| r.contains("labels per page must be at least 1")),
            "got: {reasons:?}"
        );
    }

    #[test]
    fn one_bad_row_does_not_abort_the_batch() {
        // Row 2's payload is too large for any DataMatrix symbol; its page
        // is skipped, the rest of the batch renders.
        let oversized = "x".repeat(4000);
        let data = format!("Code\nAAA\n{oversized}\nCCC");
        let (store, dataset) = store_with(data.as_bytes());

        let mut field = FieldSpec::text("code", 5.0, 5.0);
        field.kind = FieldKind::DataMatrix;
        field.width_mm = Some(20.0);
        field.height_mm = Some(20.0);
        let template = template(vec![field]);

        let controller = GenerationController::new(&store, &template);
        let mut job = job_for(dataset, vec![FieldMapping::new("code", 1)]);

        let outcome = controller.run(&mut job).unwrap();
        assert_eq!(outcome.pages, 2);
        assert_eq!(job.status(), JobStatus::Completed);
        let errors: Vec<_> = outcome.log.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(2));
    }

    #[test]
    fn required_empty_field_is_skipped_with_a_warning() {
        let (store, dataset) = store_with(b"SKU,Name\nA1,");
        let template = template(vec![
            FieldSpec::text("sku", 5.0, 5.0),
            FieldSpec::text("name", 5.0, 15.0),
        ]);
        let controller = GenerationController::new(&store, &template);
        let mut job = job_for(
            dataset,
            vec![
                FieldMapping::new("sku", 1),
                FieldMapping::new("name", 2).required(),
            ],
        );

        let outcome = controller.run(&mut job).unwrap();
        assert_eq!(outcome.pages, 1);
        assert_eq!(job.status(), JobStatus::Completed);
        assert!(
            outcome
                .log
                .entries()
                .iter()
                .any(|e| e.message.contains("required field 'name' is empty"))
        );
    }

    #[test]
    fn cancellation_applies_at_the_first_row_boundary() {
        let (store, dataset) = store_with(b"SKU\nA1\nA2");
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
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
    fn progress_reaches_the_total_on_completion() {
        let rows: String = (1..=25).map(|i| format!("R{i}\n")).collect();
        let data = format!("SKU\n{rows}");
        let (store, dataset) = store_with(data.as_bytes());
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let progress = controller.progress();
        let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);

        controller.run(&mut job).unwrap();
        assert_eq!(progress.total(), 25);
        assert_eq!(progress.generated(), 25);
        assert_eq!(progress.percent(), 100);
        assert_eq!(job.generated, 25);
    }

    #[test]
    fn progress_milestones_are_logged_every_ten_rows() {
        let rows: String = (1..=25).map(|i| format!("R{i}\n")).collect();
        let data = format!("SKU\n{rows}");
        let (store, dataset) = store_with(data.as_bytes());
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);

        let outcome = controller.run(&mut job).unwrap();
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

    #[test]
    fn row_range_limits_the_pages() {
        let (store, dataset) = store_with(b"SKU\nA1\nA2\nA3\nA4");
        let template = template(vec![FieldSpec::text("sku", 5.0, 5.0)]);
        let controller = GenerationController::new(&store, &template);
        let mut job = job_for(dataset, vec![FieldMapping::new("sku", 1)]);
        job.request.range = RowRange::new(2, 3);

        let outcome = controller.run(&mut job).unwrap();
        assert_eq!(outcome.pages, 2);
    }
}
