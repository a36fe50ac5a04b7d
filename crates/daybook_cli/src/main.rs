//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `daybook_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    let config = daybook_core::CoreConfig::default();
    println!("daybook_core version={}", daybook_core::core_version());
    println!("daybook_core data_dir={}", config.data_dir.display());
}
