mod dates;
mod errors;
mod locale;

pub use dates::parse_date;
pub use errors::ValueParseError;
pub use locale::parse_decimal;

pub type RowIndex = usize;
pub type IngestionId = String;
