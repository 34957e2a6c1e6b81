//! Shell completions.

use crate::cli::{Cli, Shell};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells};
use std::io::{self, Write};

const BIN_NAME: &str = "azdo";

/// Write completions for `shell` to stdout.
pub fn execute(shell: &Shell) -> Result<()> {
    write_completions(shell, &mut io::stdout())
}

/// Write completions for `shell` to any writer.
pub fn write_completions(shell: &Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, BIN_NAME, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, BIN_NAME, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, BIN_NAME, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, BIN_NAME, out),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, BIN_NAME, out),
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let mut buf = Vec::new();
        write_completions(&Shell::Bash, &mut buf).unwrap();

        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("list-completed"));
        assert!(script.contains("list-all"));
    }
}
