pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

pub use app::clause::{ParsedInput, parse_clause, parse_input};
pub use app::extract::{ExternalTitles, Extractor, TitleCursor};
pub use app::range::parse_range;
pub use app::run::{RunMode, RunOutcome, RunSettings, Session};
pub use app::session::{SessionRecord, SessionStore};
pub use app::table::TableWriter;
pub use domain::errors::{ConfigError, MissingSessionError};
pub use domain::model::{Extraction, LabelMode, Orientation, Selection, WriteOptions};

pub fn init(verbosity: u8) {
    infra::logging::init(verbosity);
}
