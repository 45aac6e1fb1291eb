use crate::{config::Config, debug_print};
use anyhow::{Context, Result, anyhow, bail};
use nix::{errno::Errno, unistd::execvp};
use std::{convert::Infallible, ffi::CString};

/// Replaces the current process image with the target command.
///
/// The executable is resolved through `PATH` when the command contains no
/// slash. The new image keeps the pid and inherits the namespaces, open
/// descriptors, and environment set up so far. Only returns on failure; the
/// `Infallible` success type makes "control never comes back" explicit.
pub fn replace_process(config: &Config) -> Result<Infallible> {
    let Some(command) = config.command.first() else {
        bail!("No command specified");
    };

    let argv = to_cstring_vec(&config.command)?;

    for arg in &config.command {
        debug_print!(config, "arg: {arg}");
    }

    match execvp(&argv[0], &argv) {
        Ok(never) => match never {},
        Err(errno) => Err(exec_failure(command, errno)),
    }
}

/// Inside a freshly unshared mount namespace ENOENT rarely means a typo: the
/// binary, one of its shared libraries, or its ELF interpreter is simply not
/// visible. Spell that out instead of echoing the bare errno.
fn exec_failure(command: &str, errno: Errno) -> anyhow::Error {
    match errno {
        Errno::ENOENT => anyhow!(
            "{command}: not found ({errno}). Either the binary is absent from the mount \
             namespace, it links against a shared library that is (check with `ldd`), or \
             its ELF interpreter is missing (check with `readelf -l`)"
        ),
        _ => anyhow!("Failed to exec {command}: {errno}"),
    }
}

fn to_cstring_vec(command: &[String]) -> Result<Vec<CString>> {
    command
        .iter()
        .map(|arg| {
            CString::new(arg.as_str())
                .with_context(|| format!("Argument contains an interior NUL byte: {arg:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Config {
        Config::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_exec_nonexistent_binary_fails() {
        let config = config(&["netns-run", "--", "/nonexistent"]);

        // Exec of a missing binary never replaces the test process.
        let error = match replace_process(&config) {
            Ok(never) => match never {},
            Err(error) => error,
        };

        assert!(error.to_string().contains("not found"));
    }

    #[test]
    fn test_enoent_diagnostic_names_common_causes() {
        let message = exec_failure("/bin/tool", Errno::ENOENT).to_string();
        assert!(message.contains("not found"));
        assert!(message.contains("shared library"));
        assert!(message.contains("ELF interpreter"));
    }

    #[test]
    fn test_other_errno_reports_plainly() {
        let message = exec_failure("/bin/tool", Errno::EACCES).to_string();
        assert!(message.contains("Failed to exec /bin/tool"));
        assert!(!message.contains("shared library"));
    }

    #[test]
    fn test_empty_command_errors_instead_of_panicking() {
        let config = config(&["netns-run", "-D"]);

        let error = match replace_process(&config) {
            Ok(never) => match never {},
            Err(error) => error,
        };

        assert!(error.to_string().contains("No command specified"));
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let command = vec!["echo".to_string(), "bad\0arg".to_string()];
        assert!(to_cstring_vec(&command).is_err());
    }

    #[test]
    fn test_cstring_conversion_preserves_order() {
        let command = vec!["id".to_string(), "-u".to_string()];
        let argv = to_cstring_vec(&command).unwrap();
        assert_eq!(argv[0].to_str().unwrap(), "id");
        assert_eq!(argv[1].to_str().unwrap(), "-u");
    }
}
