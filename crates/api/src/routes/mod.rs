/// Staff routes under `/api/admin/entrevistas`
pub mod admin;
/// Applicant routes under `/api/entrevistas`
pub mod entrevistas;
/// Liveness and version probes
pub mod health;
