//! Version command.

use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    name: &'a str,
    version: &'a str,
    build: &'a str,
}

const fn build_profile() -> &'static str {
    if cfg!(debug_assertions) { "dev" } else { "release" }
}

/// Print the crate version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        name: "azdo",
        version: env!("CARGO_PKG_VERSION"),
        build: build_profile(),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{} {} ({})", output.name, output.version, output.build);
    }
    Ok(())
}
