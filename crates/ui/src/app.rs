use std::sync::{Arc, Mutex};

use eframe::egui;
use shelfmark_core::model::CodeKind;
use shelfmark_core::views::{self, sheet::EMPTY_PROMPT_HEIGHT};
use shelfmark_core::{FrameSurface, LoadTicket, RowIssue, Studio};

use crate::renderer;
use crate::theme::{self, ThemeMode};

/// File extensions offered by the open dialog.
pub(crate) const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// A file read that finished off the UI thread.
pub(crate) struct PendingLoad {
    pub ticket: LoadTicket,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// How a browser file pick ended.
pub(crate) enum PendingRead {
    Loaded(PendingLoad),
    /// Picker dismissed or the read failed.
    Abandoned(LoadTicket),
}

pub(crate) type PendingSlot = Arc<Mutex<Option<PendingRead>>>;

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Idle,
    Info(String),
    Error(String),
}

/// Main application state.
pub struct LabelApp {
    studio: Studio<FrameSurface>,
    theme_mode: ThemeMode,
    status: Status,
    /// Filled by async reads, drained at the start of each frame.
    pending: PendingSlot,
    /// The pick the spinner is waiting on.
    awaiting: Option<LoadTicket>,
    /// Info line of the last successful load.
    summary: Option<String>,
}

impl LabelApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme_mode = ThemeMode::Light;
        cc.egui_ctx.set_visuals(theme_mode.visuals());
        theme::apply_typography(&cc.egui_ctx);

        Self {
            theme_mode,
            ..Self::blank()
        }
    }

    fn blank() -> Self {
        Self {
            studio: Studio::default(),
            theme_mode: ThemeMode::Light,
            status: Status::Idle,
            pending: Arc::new(Mutex::new(None)),
            awaiting: None,
            summary: None,
        }
    }

    fn load(&mut self, ticket: LoadTicket, name: String, bytes: &[u8]) {
        log::debug!("parsing {} bytes from {name}", bytes.len());
        match self.studio.finish_load(ticket, bytes, Some(name.clone())) {
            Ok(outcome) if !outcome.applied => {
                log::debug!("ignoring superseded read of {name}");
            }
            Ok(outcome) => {
                // Every record is on screen, so every record gets a surface.
                for index in 0..outcome.records {
                    if let Err(e) = self.studio.attach(index, FrameSurface::new()) {
                        log::warn!("{e}");
                    }
                }
                let summary = format!(
                    "{} labels from {name} (sheet '{}')",
                    outcome.records, outcome.sheet_name
                );
                self.summary = Some(summary.clone());
                self.status = Status::Info(summary);
            }
            Err(e) => {
                self.status = Status::Error(format!("Could not read {name}: {e}"));
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_file(&mut self, _ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Spreadsheet", SPREADSHEET_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        let ticket = self.studio.begin_load();
        match std::fs::read(&path) {
            Ok(bytes) => self.load(ticket, display_name(&path), &bytes),
            Err(e) => {
                self.status = Status::Error(format!("Failed to read {}: {e}", path.display()));
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn open_file(&mut self, ctx: &egui::Context) {
        let ticket = self.studio.begin_load();
        match crate::web::pick_file(ticket, self.pending.clone(), ctx.clone()) {
            Ok(()) => self.awaiting = Some(ticket),
            Err(e) => self.status = Status::Error(format!("Could not open file picker: {e:?}")),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn print_or_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG image", &["svg"])
            .add_filter("Printable HTML", &["html"])
            .set_file_name("labels.svg")
            .save_file()
        else {
            return;
        };
        self.status = match self.write_export(&path) {
            Ok(()) => Status::Info(format!("Exported to {}", path.display())),
            Err(e) => Status::Error(format!("{e:#}")),
        };
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write_export(&self, path: &std::path::Path) -> anyhow::Result<()> {
        use anyhow::Context as _;

        let html = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));
        let contents = if html {
            self.studio.print_html()
        } else {
            self.studio.sheet_svg()
        };
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    #[cfg(target_arch = "wasm32")]
    fn print_or_export(&mut self) {
        if let Err(e) = crate::web::print_html(&self.studio.print_html()) {
            self.status = Status::Error(format!("Printing failed: {e:?}"));
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .first()
                .map(|f| (f.name.clone(), f.bytes.clone(), f.path.clone()))
        });
        let Some((name, bytes, path)) = dropped else {
            return;
        };

        let ticket = self.studio.begin_load();
        if let Some(bytes) = bytes {
            self.load(ticket, name, &bytes);
            return;
        }
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = path {
            match std::fs::read(&path) {
                Ok(bytes) => self.load(ticket, display_name(&path), &bytes),
                Err(e) => {
                    self.status =
                        Status::Error(format!("Failed to read {}: {e}", path.display()));
                }
            }
        }
        #[cfg(target_arch = "wasm32")]
        let _ = path;
    }

    fn select_kind(&mut self, kind: CodeKind) {
        let report = self.studio.select_kind(kind);
        self.status = if report.encode_failures.is_empty() {
            self.summary.clone().map_or(Status::Idle, Status::Info)
        } else {
            Status::Error(format!(
                "{} codes cannot be shown as {}",
                report.encode_failures.len(),
                kind.title()
            ))
        };
    }

    fn receive(&mut self, read: PendingRead) {
        let ticket = match read {
            PendingRead::Loaded(PendingLoad {
                ticket,
                name,
                bytes,
            }) => {
                self.load(ticket, name, &bytes);
                ticket
            }
            PendingRead::Abandoned(ticket) => ticket,
        };
        if self.awaiting == Some(ticket) {
            self.awaiting = None;
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("shelfmark");
            ui.separator();

            if ui.button("📂 Open spreadsheet").clicked() {
                let ctx = ui.ctx().clone();
                self.open_file(&ctx);
            }

            ui.separator();

            let current = self.studio.kind();
            for kind in CodeKind::ALL {
                if ui.selectable_label(current == kind, kind.title()).clicked() {
                    self.select_kind(kind);
                }
            }

            ui.separator();

            let label = if cfg!(target_arch = "wasm32") {
                "🖨 Print"
            } else {
                "💾 Export…"
            };
            let has_records = !self.studio.records().is_empty();
            if ui.add_enabled(has_records, egui::Button::new(label)).clicked() {
                self.print_or_export();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "🌙 Dark",
                    ThemeMode::Light => "☀ Light",
                };
                if ui.button(theme_label).clicked() {
                    self.theme_mode = self.theme_mode.toggled();
                    ui.ctx().set_visuals(self.theme_mode.visuals());
                }
                if self.awaiting.is_some() {
                    ui.spinner();
                }
            });
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match &self.status {
                Status::Error(err) => {
                    ui.colored_label(ui.visuals().error_fg_color, err);
                }
                Status::Info(msg) => {
                    ui.label(msg);
                }
                Status::Idle => {
                    ui.label("No spreadsheet loaded. Click Open or drop a file here");
                }
            }

            let issues = self.studio.state().issues();
            if !issues.is_empty() {
                ui.separator();
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    format!("⚠ {} row issues", issues.len()),
                )
                .on_hover_text(issue_list(issues));
            }
        });
    }

    fn label_list(&self, ui: &mut egui::Ui) {
        let style = self.studio.style();

        if self.studio.records().is_empty() {
            let width = ui.available_width();
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(width, EMPTY_PROMPT_HEIGHT as f32),
                egui::Sense::hover(),
            );
            renderer::render_commands(
                ui.painter(),
                &views::render_empty_prompt(width as f64),
                rect.min,
                self.theme_mode,
            );
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, record) in self.studio.records().iter().enumerate() {
                    let Some(frame) = self
                        .studio
                        .surfaces()
                        .get(index)
                        .and_then(FrameSurface::frame)
                    else {
                        continue;
                    };
                    let card = views::render_label(index, record, frame, style);
                    let (rect, response) = ui.allocate_exact_size(
                        egui::vec2(card.width as f32, card.height as f32),
                        egui::Sense::hover(),
                    );
                    if ui.is_rect_visible(rect) {
                        renderer::render_commands(
                            ui.painter(),
                            &card.commands,
                            rect.min,
                            self.theme_mode,
                        );
                    }
                    if let Some(err) = &frame.error {
                        response.on_hover_text(format!("Row {}: {err}", record.row));
                    }
                    ui.add_space(style.gap as f32);
                }
            });
    }
}

impl eframe::App for LabelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for async-loaded spreadsheet data
        let pending = {
            let mut lock = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            lock.take()
        };
        if let Some(read) = pending {
            self.receive(read);
        }

        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.label_list(ui));
    }
}

fn issue_list(issues: &[RowIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(not(target_arch = "wasm32"))]
fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
