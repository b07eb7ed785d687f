pub mod letters;
pub mod pipeline;
pub mod roster;
