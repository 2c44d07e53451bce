//! Small helpers shared by the renderers

pub mod links;
pub mod time;
