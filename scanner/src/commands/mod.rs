pub mod presets;
pub mod scan;
pub mod version;
