pub mod aircraft;
pub mod radar;
