use serde::{Deserialize, Serialize};

use crate::ingest::{Ingested, RowIssue};
use crate::model::{CodeKind, Record};

/// Identifies one ingestion attempt.
///
/// File reads are asynchronous in the browser; if the user picks a second
/// file before the first read finishes, only the result carrying the most
/// recent ticket is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadTicket(pub u32);

/// State transitions accepted by [`AppState::reduce`].
#[derive(Debug, Clone)]
pub enum Action {
    /// A spreadsheet finished parsing.
    RecordsLoaded {
        ticket: LoadTicket,
        source: Option<String>,
        ingested: Ingested,
    },
    /// The user picked a code kind.
    SelectKind(CodeKind),
    /// Drop all records.
    Clear,
}

/// What a reduction changed; front ends use it to decide what to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    RecordsReplaced { count: usize },
    KindSelected { kind: CodeKind, changed: bool },
    StaleLoadIgnored { ticket: LoadTicket, latest: LoadTicket },
}

impl Change {
    /// Whether the change calls for a render pass.
    pub fn needs_render(self) -> bool {
        !matches!(self, Change::StaleLoadIgnored { .. })
    }
}

/// The application state: loaded records plus the selected code kind.
///
/// Owned by exactly one front end (studio, egui app, wasm bridge) and only
/// mutated through [`AppState::reduce`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    records: Vec<Record>,
    kind: CodeKind,
    source: Option<String>,
    sheet_name: Option<String>,
    issues: Vec<RowIssue>,
    latest_ticket: u32,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(kind: CodeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    /// Display name of the file the records came from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    /// Rows skipped or degraded during the last load.
    pub fn issues(&self) -> &[RowIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Start a new ingestion attempt. Results from earlier tickets will be
    /// ignored once this one is issued.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket = self.latest_ticket.wrapping_add(1);
        LoadTicket(self.latest_ticket)
    }

    pub fn reduce(&mut self, action: Action) -> Change {
        match action {
            Action::RecordsLoaded {
                ticket,
                source,
                ingested,
            } => {
                let latest = LoadTicket(self.latest_ticket);
                if ticket != latest {
                    log::debug!("dropping load {ticket:?}, latest is {latest:?}");
                    return Change::StaleLoadIgnored { ticket, latest };
                }
                self.records = ingested.records;
                self.issues = ingested.issues;
                self.sheet_name = Some(ingested.sheet_name);
                self.source = source;
                Change::RecordsReplaced {
                    count: self.records.len(),
                }
            }
            Action::SelectKind(kind) => {
                let changed = self.kind != kind;
                self.kind = kind;
                Change::KindSelected { kind, changed }
            }
            Action::Clear => {
                self.records.clear();
                self.issues.clear();
                self.source = None;
                self.sheet_name = None;
                Change::RecordsReplaced { count: 0 }
            }
        }
    }
}
