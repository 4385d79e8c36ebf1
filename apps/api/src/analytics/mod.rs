// Analytics engine: pure functions over salary records and skill lists.
// Nothing in here performs I/O or keeps state between calls.

pub mod grouping;
pub mod histogram;
pub mod numeric;
pub mod skills;
