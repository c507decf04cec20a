pub mod format;
pub mod logging;
pub mod pagination;
pub mod response;
