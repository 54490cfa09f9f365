//! Post-generation fixups.
//!
//! - [`pbxproj`]: strips a local folder dependency out of a generated
//!   `project.pbxproj` so the regenerated project builds without it.
//! - [`db_url`]: formats a PostgreSQL connection string for a Cloud SQL
//!   instance from environment variables.

pub mod db_url;
pub mod pbxproj;
