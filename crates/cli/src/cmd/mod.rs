mod build;
mod clean;
mod deps;
mod package;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use deps::cmd_deps;
pub use package::cmd_package;
