pub mod record;

pub use record::{
    matches_target_year, sweep_symbols, AcceptedRow, ExtractedRecord, RunCounters, SymbolOutcome,
};
