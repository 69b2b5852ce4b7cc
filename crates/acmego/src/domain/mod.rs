//! Editor-independent types: selections, offsets and command outcomes.

pub mod errors;
pub mod model;
pub mod offset;
pub mod selection;
