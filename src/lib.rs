pub mod csv_loader;
pub mod frame_parser;
pub mod gesture_classifier;
pub mod interrupt;
pub mod scaler;
pub mod serial_reader;
pub mod types;
