pub mod pg;
pub mod snapshot;
