pub mod models;
pub mod record;

pub use record::Record;
