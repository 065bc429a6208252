pub mod arch;
pub mod os;
pub mod target;

pub use arch::Arch;
pub use os::Os;
pub use target::{CROSS_MATRIX, PlatformTarget};
