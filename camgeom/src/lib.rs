pub mod error;
pub mod linalg;
pub mod rotation;
pub mod camera;
