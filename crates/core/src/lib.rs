mod assets;

pub mod config;
pub mod disk;

#[cfg(test)]
mod test_utils;

pub use crate::assets::{get_config_dir, get_data_dir};
