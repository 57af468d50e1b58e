//! TOML preference file loading and creation.

mod loader;
mod template;

#[cfg(test)]
mod tests;

pub use loader::{load_default, load_from_path};
