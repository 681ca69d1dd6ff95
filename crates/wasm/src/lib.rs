//! `wasm-bindgen` bridge for pages that own their `<canvas>` elements.
//!
//! The page creates one [`LabelStudio`], feeds it file bytes, and attaches a
//! canvas per record. Structured results come back as JSON strings.

mod canvas;

use serde::Serialize;
use shelfmark_core::model::CodeKind;
use shelfmark_core::{IngestError, LabelStyle, LoadOutcome, LoadTicket, Studio};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub use canvas::CanvasSurface;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen]
pub struct LabelStudio {
    studio: Studio<CanvasSurface>,
}

impl Default for LabelStudio {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl LabelStudio {
    #[wasm_bindgen(constructor)]
    pub fn new() -> LabelStudio {
        console_error_panic_hook::set_once();
        LabelStudio {
            studio: Studio::default(),
        }
    }

    /// Create a studio with a JSON `LabelStyle`; missing fields keep their
    /// defaults.
    pub fn with_style(style_json: &str) -> Result<LabelStudio, JsError> {
        console_error_panic_hook::set_once();
        let style: LabelStyle =
            serde_json::from_str(style_json).map_err(|e| JsError::new(&e.to_string()))?;
        let studio = Studio::new(style).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(LabelStudio { studio })
    }

    /// Start reading a file. Pass the ticket to `finish_load` once the bytes
    /// are in; results of older tickets are dropped.
    pub fn begin_load(&mut self) -> u32 {
        self.studio.begin_load().0
    }

    /// Parse spreadsheet bytes. Returns the load outcome as JSON. Attached
    /// canvases are released when the records are replaced.
    pub fn finish_load(
        &mut self,
        ticket: u32,
        data: &[u8],
        source: Option<String>,
    ) -> Result<String, JsError> {
        let outcome = self
            .load(LoadTicket(ticket), data, source)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_json(&outcome)
    }

    /// `"barcode"` or `"qr"`. Redraws every attached canvas; returns the
    /// render report as JSON.
    pub fn select_kind(&mut self, kind: &str) -> Result<String, JsError> {
        let kind: CodeKind = kind.parse().map_err(|e: shelfmark_core::model::UnknownCodeKind| {
            JsError::new(&e.to_string())
        })?;
        to_json(&self.studio.select_kind(kind))
    }

    pub fn kind(&self) -> String {
        self.studio.kind().to_string()
    }

    pub fn record_count(&self) -> usize {
        self.studio.records().len()
    }

    pub fn records_json(&self) -> Result<String, JsError> {
        to_json(self.studio.records())
    }

    /// Attach `canvas` to record `index` and draw it immediately.
    pub fn attach_canvas(
        &mut self,
        index: usize,
        canvas: HtmlCanvasElement,
    ) -> Result<String, JsError> {
        let report = self
            .studio
            .attach(index, CanvasSurface::new(canvas))
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_json(&report)
    }

    pub fn detach_canvas(&mut self, index: usize) -> bool {
        self.studio.detach(index).is_some()
    }

    pub fn render_all(&mut self) -> Result<String, JsError> {
        to_json(&self.studio.render_all())
    }

    /// Printable HTML page with one label per record.
    pub fn print_html(&self) -> String {
        self.studio.print_html()
    }

    pub fn sheet_svg(&self) -> String {
        self.studio.sheet_svg()
    }
}

impl LabelStudio {
    fn load(
        &mut self,
        ticket: LoadTicket,
        data: &[u8],
        source: Option<String>,
    ) -> Result<LoadOutcome, IngestError> {
        let outcome = self
            .studio
            .finish_load(ticket, data, source)
            .inspect_err(|e| log::warn!("spreadsheet rejected: {e}"))?;
        if outcome.applied {
            log::info!(
                "{} records from sheet '{}'",
                outcome.records,
                outcome.sheet_name
            );
        } else {
            log::debug!("load {ticket:?} superseded, result dropped");
        }
        Ok(outcome)
    }
}
