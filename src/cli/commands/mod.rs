pub mod extract;
pub mod init;

pub use extract::{ExtractSummary, extract};
pub use init::init;
