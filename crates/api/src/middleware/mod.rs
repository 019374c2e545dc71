/// Error-to-response mapping and the JSON response envelope
pub mod error_handling;
