//! The pipeline that ties state, encoding, views and surfaces together.
//!
//! Every mutation that can change what a surface shows runs a render pass
//! before returning, so a surface never displays stale output.

use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, LabelStyle};
use crate::ingest::{self, IngestError, Ingested, RowIssue};
use crate::model::{Action, AppState, CodeKind, LoadTicket, Record};
use crate::surface::{Surface, SurfaceRegistry};
use crate::svg;
use crate::symbology::{self, EncodeError};
use crate::views::{self, LabelCard, LabelSheet, SurfaceFrame};

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("no record at index {index} ({len} loaded)")]
    NoSuchRecord { index: usize, len: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A record whose code could not be encoded. Its surface shows a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeFailure {
    pub index: usize,
    pub code: String,
    pub error: EncodeError,
}

/// What a render pass did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderReport {
    /// Surfaces painted, placeholders included.
    pub drawn: usize,
    /// Records with no surface attached.
    pub skipped: usize,
    /// Surfaces whose paint call failed.
    pub failed: usize,
    pub encode_failures: Vec<EncodeFailure>,
}

impl RenderReport {
    fn absorb(&mut self, other: RenderReport) {
        self.drawn += other.drawn;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.encode_failures.extend(other.encode_failures);
    }
}

/// Result of a finished load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadOutcome {
    /// False when a newer load had started and this result was dropped.
    pub applied: bool,
    pub records: usize,
    pub sheet_name: String,
    pub issues: Vec<RowIssue>,
}

pub struct Studio<S> {
    state: AppState,
    style: LabelStyle,
    surfaces: SurfaceRegistry<S>,
}

impl<S: Surface> Default for Studio<S> {
    fn default() -> Self {
        Self {
            state: AppState::new(),
            style: LabelStyle::default(),
            surfaces: SurfaceRegistry::new(),
        }
    }
}

impl<S: Surface> Studio<S> {
    pub fn new(style: LabelStyle) -> Result<Self, StudioError> {
        style.validate()?;
        Ok(Self {
            style,
            ..Self::default()
        })
    }

    pub fn with_kind(mut self, kind: CodeKind) -> Self {
        self.state.reduce(Action::SelectKind(kind));
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn records(&self) -> &[Record] {
        self.state.records()
    }

    pub fn kind(&self) -> CodeKind {
        self.state.kind()
    }

    pub fn style(&self) -> &LabelStyle {
        &self.style
    }

    pub fn surfaces(&self) -> &SurfaceRegistry<S> {
        &self.surfaces
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.state.begin_load()
    }

    /// Parse `bytes` and apply the result if `ticket` is still the latest.
    /// On a parse error the current records stay untouched.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        bytes: &[u8],
        source: Option<String>,
    ) -> Result<LoadOutcome, IngestError> {
        let ingested = ingest::parse_workbook(bytes).inspect_err(|e| {
            log::warn!("load {ticket:?} failed: {e}");
        })?;
        Ok(self.apply_load(ticket, ingested, source))
    }

    /// Apply already-parsed records.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        ingested: Ingested,
        source: Option<String>,
    ) -> LoadOutcome {
        let sheet_name = ingested.sheet_name.clone();
        let issues = ingested.issues.clone();
        let change = self.state.reduce(Action::RecordsLoaded {
            ticket,
            source,
            ingested,
        });
        let applied = change.needs_render();
        if applied {
            // Surfaces belonged to the old records.
            self.surfaces.clear();
        }
        LoadOutcome {
            applied,
            records: self.state.len(),
            sheet_name,
            issues,
        }
    }

    pub fn clear(&mut self) {
        self.state.reduce(Action::Clear);
        self.surfaces.clear();
    }

    /// Switch code kind and redraw every attached surface.
    pub fn select_kind(&mut self, kind: CodeKind) -> RenderReport {
        let change = self.state.reduce(Action::SelectKind(kind));
        log::debug!("{change:?}");
        self.render_all()
    }

    /// Attach a surface to record `index` and draw it right away.
    pub fn attach(&mut self, index: usize, surface: S) -> Result<RenderReport, StudioError> {
        let len = self.state.len();
        if index >= len {
            return Err(StudioError::NoSuchRecord { index, len });
        }
        self.surfaces.register(index, surface);
        Ok(self.render_one(index))
    }

    pub fn detach(&mut self, index: usize) -> Option<S> {
        self.surfaces.remove(index)
    }

    /// Redraw every record that has a surface.
    pub fn render_all(&mut self) -> RenderReport {
        let mut report = RenderReport::default();
        for index in 0..self.state.len() {
            report.absorb(self.render_one(index));
        }
        if report.failed > 0 || !report.encode_failures.is_empty() {
            log::warn!(
                "render pass: {} drawn, {} failed, {} unencodable",
                report.drawn,
                report.failed,
                report.encode_failures.len()
            );
        }
        report
    }

    fn render_one(&mut self, index: usize) -> RenderReport {
        let mut report = RenderReport::default();
        let Some(record) = self.state.records().get(index) else {
            return report;
        };
        let Some(surface) = self.surfaces.get_mut(index) else {
            report.skipped = 1;
            return report;
        };

        let frame = frame_for(record, self.state.kind(), &self.style);
        if let Some(error) = &frame.error {
            report.encode_failures.push(EncodeFailure {
                index,
                code: record.code.clone(),
                error: error.clone(),
            });
        }
        match surface.paint(&frame) {
            Ok(()) => report.drawn = 1,
            Err(e) => {
                log::warn!("surface {index} ({}): {e}", record.code);
                report.failed = 1;
            }
        }
        report
    }

    /// The frame record `index` shows at the current kind.
    pub fn frame(&self, index: usize) -> Option<SurfaceFrame> {
        let record = self.state.records().get(index)?;
        Some(frame_for(record, self.state.kind(), &self.style))
    }

    pub fn cards(&self) -> Vec<LabelCard> {
        self.state
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let frame = frame_for(record, self.state.kind(), &self.style);
                views::render_label(index, record, &frame, &self.style)
            })
            .collect()
    }

    pub fn print_sheet(&self) -> LabelSheet {
        views::layout_sheet(&self.cards(), self.style.columns, self.style.gap)
    }

    pub fn sheet_svg(&self) -> String {
        let sheet = self.print_sheet();
        svg::render_svg(&sheet.commands, sheet.width, sheet.height)
    }

    pub fn print_html(&self) -> String {
        let title = self.state.source().unwrap_or("Labels");
        svg::render_print_html(&self.cards(), title)
    }
}

/// Encode and render one record's surface.
pub fn frame_for(record: &Record, kind: CodeKind, style: &LabelStyle) -> SurfaceFrame {
    let encoded = symbology::encode(&record.code, kind);
    views::render_surface(&encoded, kind, style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{FrameSurface, SurfaceError};

    fn ingested(codes: &[&str]) -> Ingested {
        Ingested {
            sheet_name: "Sheet1".into(),
            records: codes.iter().map(|c| Record::new(*c)).collect(),
            issues: Vec::new(),
        }
    }

    fn loaded(codes: &[&str]) -> Studio<FrameSurface> {
        let mut studio = Studio::default();
        let ticket = studio.begin_load();
        studio.apply_load(ticket, ingested(codes), None);
        studio
    }

    struct BrokenSurface;

    impl Surface for BrokenSurface {
        fn paint(&mut self, _frame: &SurfaceFrame) -> Result<(), SurfaceError> {
            Err(SurfaceError::Gone)
        }
    }

    #[test]
    fn attach_draws_immediately() {
        let mut studio = loaded(&["A", "B"]);
        let report = studio.attach(1, FrameSurface::new());
        assert!(matches!(report, Ok(RenderReport { drawn: 1, .. })));
        assert_eq!(studio.surfaces().get(1).map(FrameSurface::paints), Some(1));
    }

    #[test]
    fn attach_out_of_range_fails() {
        let mut studio = loaded(&["A"]);
        assert!(matches!(
            studio.attach(3, FrameSurface::new()),
            Err(StudioError::NoSuchRecord { index: 3, len: 1 })
        ));
    }

    #[test]
    fn select_kind_redraws_attached_and_counts_the_rest() {
        let mut studio = loaded(&["A", "B", "C"]);
        let _ = studio.attach(0, FrameSurface::new());
        let _ = studio.attach(2, FrameSurface::new());

        let report = studio.select_kind(CodeKind::QrCode);
        assert_eq!(report.drawn, 2);
        assert_eq!(report.skipped, 1);
        let frame = studio.surfaces().get(2).and_then(|s| s.frame().cloned());
        assert_eq!(frame.map(|f| f.width), Some(studio.style().qr_width));
    }

    #[test]
    fn reload_drops_surfaces() {
        let mut studio = loaded(&["A"]);
        let _ = studio.attach(0, FrameSurface::new());
        let ticket = studio.begin_load();
        let outcome = studio.apply_load(ticket, ingested(&["X", "Y"]), None);
        assert!(outcome.applied);
        assert_eq!(outcome.records, 2);
        assert!(studio.surfaces().is_empty());
    }

    #[test]
    fn stale_load_keeps_surfaces() {
        let mut studio = loaded(&["A"]);
        let stale = studio.begin_load();
        let _latest = studio.begin_load();
        let _ = studio.attach(0, FrameSurface::new());

        let outcome = studio.apply_load(stale, ingested(&["OLD"]), None);
        assert!(!outcome.applied);
        assert_eq!(studio.records()[0].code, "A");
        assert_eq!(studio.surfaces().len(), 1);
    }

    #[test]
    fn unencodable_record_is_isolated() {
        let mut studio = loaded(&["OK-1", "Ñandú", "OK-2"]);
        for i in 0..3 {
            let _ = studio.attach(i, FrameSurface::new());
        }
        let report = studio.render_all();
        assert_eq!(report.drawn, 3);
        assert_eq!(report.encode_failures.len(), 1);
        assert_eq!(report.encode_failures[0].index, 1);

        let placeholder = studio
            .surfaces()
            .get(1)
            .and_then(FrameSurface::frame)
            .map(SurfaceFrame::is_placeholder);
        assert_eq!(placeholder, Some(true));
        let fine = studio
            .surfaces()
            .get(2)
            .and_then(FrameSurface::frame)
            .map(SurfaceFrame::is_placeholder);
        assert_eq!(fine, Some(false));
    }

    #[test]
    fn paint_failures_are_counted() {
        let mut studio: Studio<BrokenSurface> = Studio::default();
        let ticket = studio.begin_load();
        studio.apply_load(ticket, ingested(&["A"]), None);
        let report = studio.attach(0, BrokenSurface);
        assert!(matches!(report, Ok(RenderReport { failed: 1, drawn: 0, .. })));
    }

    #[test]
    fn invalid_style_is_rejected() {
        let style = LabelStyle::default().with_columns(0);
        assert!(matches!(
            Studio::<FrameSurface>::new(style),
            Err(StudioError::Config(ConfigError::NoColumns))
        ));
    }

    #[test]
    fn print_outputs_cover_every_record() {
        let studio = loaded(&["A", "B"]);
        assert_eq!(studio.cards().len(), 2);
        assert_eq!(studio.print_html().matches("<svg").count(), 2);
        assert!(studio.sheet_svg().contains(r#"id="label-1""#));
    }
}
