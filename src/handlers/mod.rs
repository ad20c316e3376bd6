pub mod ask;
pub mod documents;
pub mod memory;
pub mod status;
