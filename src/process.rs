use std::{path::Path, process::Command};

use log::debug;

use crate::error::{Error, Result};

/// Runs `command` to completion with inherited stdio.
pub(crate) fn run(mut command: Command) -> Result<()> {
    let program = command.get_program().to_string_lossy().to_string();
    debug!("running {command:?}");
    let status = command.status().map_err(|source| Error::Spawn {
        program: program.clone(),
        source,
    })?;
    if !status.success() {
        return Err(Error::Subprocess { program, status });
    }

    Ok(())
}

pub(crate) fn editor_command(editor: &Path, file: &Path) -> Command {
    let mut command = Command::new(editor);
    command.arg(file);
    command
}

pub(crate) fn launch_editor(editor: &Path, file: &Path) -> Result<()> {
    run(editor_command(editor, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn editor_gets_file_as_sole_argument() {
        let command = editor_command(Path::new("/usr/bin/vi"), Path::new("/tmp/a b/in.md"));
        assert_eq!(command.get_program(), OsStr::new("/usr/bin/vi"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec![OsStr::new("/tmp/a b/in.md")]);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = run(Command::new("/nonexistent/sgb-editor")).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_subprocess_error() {
        assert!(run(Command::new("true")).is_ok());
        let err = run(Command::new("false")).unwrap_err();
        assert!(matches!(err, Error::Subprocess { .. }));
    }
}
