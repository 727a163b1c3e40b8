//! Input processing module
//! Handles file detection, text extraction, and input validation

pub mod file_detector;
pub mod manager;
pub mod text_extractor;
pub mod validation;

pub use manager::InputManager;
pub use validation::validate_inputs;
