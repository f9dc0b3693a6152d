//! Shell completion scripts generated from the clap definition.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Write the completion script for `shell` to `out`
pub fn write_completion<W: Write>(shell: Shell, out: &mut W) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut out = Vec::new();
        write_completion(shell, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_bash_script_covers_flags_and_subcommands() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("bumpkin"));
        assert!(bash.contains("--set-version"));
        assert!(bash.contains("analyze"));
        assert!(bash.contains("completion"));
    }

    #[test]
    fn test_every_shell_produces_a_script() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            assert!(!script(shell).is_empty(), "{} script is empty", shell);
        }
    }
}
