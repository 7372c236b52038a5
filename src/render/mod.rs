pub(crate) mod composite;
pub mod frame;
pub mod surface;
