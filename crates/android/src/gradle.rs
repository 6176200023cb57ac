//! Gradle build system integration
//!
//! Runs Gradle through the project's own wrapper so builds use the Gradle
//! version the project pins, never a globally installed one.

use skylark_core::error::{Error, Result};
use skylark_core::process::{run_command_in_dir, run_command_streaming_in_dir, CommandResult};
use std::path::Path;

/// The wrapper invocation for this platform
pub fn wrapper() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "./gradlew"
    }
}

fn wrapper_file() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "gradlew"
    }
}

/// Whether the wrapper script is present in the Gradle directory
pub fn has_wrapper(android_dir: &Path) -> bool {
    android_dir.join(wrapper_file()).is_file()
}

fn require_wrapper(android_dir: &Path) -> Result<()> {
    if !has_wrapper(android_dir) {
        return Err(Error::gradle(format!(
            "Gradle wrapper not found in {}",
            android_dir.display()
        ))
        .with_suggestion("Run 'flutter create .' to regenerate the android/ directory"));
    }
    Ok(())
}

/// Run a Gradle task and capture its output
pub fn run_task(android_dir: &Path, task: &str) -> Result<CommandResult> {
    require_wrapper(android_dir)?;
    run_command_in_dir(wrapper(), &[task], android_dir)
}

/// Run a Gradle task, streaming output to the terminal
pub fn run_task_streaming(android_dir: &Path, task: &str) -> Result<i32> {
    require_wrapper(android_dir)?;
    run_command_streaming_in_dir(wrapper(), &[task], android_dir)
}

/// Clean build artifacts
pub fn clean(android_dir: &Path) -> Result<i32> {
    run_task_streaming(android_dir, "clean")
}

/// Ask Gradle for the app module's signing report
///
/// Prints the resolved signing config and certificate digests for every
/// variant, which is the ground truth for what an installed build was
/// actually signed with.
pub fn signing_report(android_dir: &Path) -> Result<CommandResult> {
    run_task(android_dir, ":app:signingReport")
}
