pub mod code_kind;
pub mod record;
pub mod state;

pub use code_kind::{CodeKind, UnknownCodeKind};
pub use record::Record;
pub use state::{Action, AppState, Change, LoadTicket};
