pub mod dispatcher;
pub mod extractor;
pub mod sheet_sink;

pub use dispatcher::RowDispatcher;
pub use extractor::extract_record;
pub use sheet_sink::SheetsClient;
