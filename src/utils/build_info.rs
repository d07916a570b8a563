/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub timestamp: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: CLI_VERSION,
        git_hash: option_env!("BUDGET_INSIGHTS_BUILD_HASH").unwrap_or("unknown"),
        timestamp: option_env!("BUDGET_INSIGHTS_BUILD_TIMESTAMP").unwrap_or("unknown"),
        profile: option_env!("BUDGET_INSIGHTS_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("BUDGET_INSIGHTS_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

impl BuildMetadata {
    /// One-line form used by `budget_insights_cli version`.
    pub fn summary(&self) -> String {
        format!(
            "budget_insights {} ({} {}, {})",
            self.version, self.git_hash, self.profile, self.timestamp
        )
    }
}
