pub mod payload;
pub mod record;
