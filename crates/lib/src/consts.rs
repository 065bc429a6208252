//! Project-wide constants shared by the pipeline components.

/// Name of the produced binary (and of the Go module).
pub const PROJECT_NAME: &str = "bilibili-ticket-go";

/// Go module path used for `-ldflags -X` substitutions.
pub const GO_MODULE: &str = "bilibili-ticket-go";

/// Entry point passed to every `go build` invocation.
pub const GO_ENTRYPOINT: &str = "./main.go";

/// Path of the Rust captcha component, relative to the project root.
pub const CAPTCHA_DIR: &[&str] = &["captcha", "biliTicker"];

/// Default logger level injected into release binaries (logrus Info).
pub const DEFAULT_LOG_LEVEL: &str = "4";

/// Module path installed for obfuscated release builds.
pub const GARBLE_MODULE: &str = "mvdan.cc/garble@latest";

/// File extensions bundled from a deps directory when packaging.
pub const SHARED_LIB_EXTENSIONS: &[&str] = &["so", "dll", "dylib"];
