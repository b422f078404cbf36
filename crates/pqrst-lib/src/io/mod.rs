pub mod fiducials;
pub mod text;
