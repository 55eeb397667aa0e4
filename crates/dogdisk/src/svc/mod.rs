//! Services behind the dogdisk commands.
pub mod scenario;
