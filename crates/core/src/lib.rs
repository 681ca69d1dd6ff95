pub mod config;
pub mod ingest;
pub mod model;
pub mod studio;
pub mod surface;
pub mod svg;
pub mod symbology;
pub mod views;

pub use config::{ConfigError, LabelStyle};
pub use ingest::{IngestError, Ingested, RowIssue, parse_workbook};
pub use model::{AppState, CodeKind, LoadTicket, Record};
pub use studio::{LoadOutcome, RenderReport, Studio, StudioError};
pub use surface::{FrameSurface, Surface, SurfaceError, SurfaceRegistry};
