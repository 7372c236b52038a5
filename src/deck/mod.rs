//! The beat table and the collaborators that walk through it.

pub mod beat;
pub mod nav;
pub mod script;
