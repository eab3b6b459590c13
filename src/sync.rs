//! Pushing the rendered site to the web server and pulling posts back.
//!
//! Both directions go through `rsync -a` over ssh with a fixed identity file
//! and assume key-based login already works. Arguments are passed as a list,
//! never through a local shell.

use std::{ffi::OsString, process::Command};

use log::info;

use crate::{
    context::{Config, Remote},
    error::Result,
    post::{Location, Repository},
    process::run,
};

/// `path` with a trailing slash, so rsync copies the directory's contents.
fn contents_of(path: impl Into<OsString>) -> OsString {
    let mut path = path.into();
    if !path.to_string_lossy().ends_with('/') {
        path.push("/");
    }
    path
}

fn rsync(remote: &Remote, source: OsString, target: OsString) -> Command {
    let mut command = Command::new("rsync");
    command
        .arg("-e")
        .arg(remote.shell())
        .arg("-a")
        .arg(source)
        .arg(target);
    command
}

pub(crate) fn push_command(config: &Config) -> Command {
    let remote = &config.remote;
    rsync(
        remote,
        contents_of(config.out_dir()),
        contents_of(remote.destination(&remote.root)),
    )
}

pub(crate) fn pull_command(config: &Config) -> Command {
    let remote = &config.remote;
    rsync(
        remote,
        contents_of(remote.destination(&remote.posts_root())),
        contents_of(config.drafts_dir()),
    )
}

/// Empties the remote posts directory. The glob is expanded by the remote shell.
pub(crate) fn remote_clear_command(config: &Config) -> Command {
    let remote = &config.remote;
    let mut command = Command::new("ssh");
    command
        .arg("-i")
        .arg(&remote.identity)
        .arg("-p")
        .arg(remote.port.to_string())
        .arg(remote.login())
        .arg(format!("rm -rf -- {}/*", remote.posts_root()));
    command
}

pub(crate) fn push(config: &Config) -> Result<()> {
    info!(
        "syncing {:?} to {}",
        config.out_dir(),
        config.remote.destination(&config.remote.root)
    );
    run(push_command(config))
}

/// Replaces the local published posts with the remote ones, as drafts.
pub(crate) fn pull(config: &Config) -> Result<()> {
    let repo = Repository::new(config);
    repo.clear(Location::Published)?;

    info!(
        "fetching posts from {}",
        config.remote.destination(&config.remote.posts_root())
    );
    run(pull_command(config))?;
    run(remote_clear_command(config))?;

    let stripped = strip_rendered_drafts(&repo)?;
    info!("fetched posts, dropped {stripped} remotely rendered pages");
    Ok(())
}

/// Removes `index.html` from every draft so pulled posts are rendered
/// locally. Returns how many were removed.
fn strip_rendered_drafts(repo: &Repository) -> Result<usize> {
    let mut stripped = 0;
    for draft in repo.list(Location::Drafts)? {
        if draft?.discard_rendered()? {
            stripped += 1;
        }
    }
    Ok(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::ffi::OsStr;

    fn args(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn push_copies_out_dir_contents() {
        let (_tmp, config) = setup_workspace();
        let command = push_command(&config);
        assert_eq!(command.get_program(), OsStr::new("rsync"));
        assert_eq!(
            args(&command),
            vec![
                "-e".to_string(),
                "ssh -i \"/keys/id_ed25519\" -p 22".to_string(),
                "-a".to_string(),
                format!("{}/", config.out_dir().display()),
                "deploy@blog.example:/var/static/".to_string(),
            ]
        );
    }

    #[test]
    fn pull_fetches_remote_posts_into_drafts() {
        let (_tmp, config) = setup_workspace();
        let command = pull_command(&config);
        assert_eq!(
            &args(&command)[3..],
            &[
                "deploy@blog.example:/var/static/p/".to_string(),
                format!("{}/", config.drafts_dir().display()),
            ]
        );
    }

    #[test]
    fn remote_clear_targets_posts_only() {
        let (_tmp, config) = setup_workspace();
        let command = remote_clear_command(&config);
        assert_eq!(command.get_program(), OsStr::new("ssh"));
        assert_eq!(
            args(&command),
            vec![
                "-i",
                "/keys/id_ed25519",
                "-p",
                "22",
                "deploy@blog.example",
                "rm -rf -- /var/static/p/*",
            ]
        );
    }

    #[test]
    fn pulled_posts_are_left_as_plain_drafts() {
        let (_tmp, config) = setup_workspace();
        let repo = Repository::new(&config);
        write_post(&config.posts_dir(), "local", "Local", 1700000000);
        for slug in ["one", "two"] {
            let dir = write_post(&config.drafts_dir(), slug, slug, 1700000000);
            std::fs::write(dir.join("index.html"), "<p>remote</p>").unwrap();
        }
        write_post(&config.drafts_dir(), "three", "three", 1700000000);

        repo.clear(Location::Published).unwrap();
        assert_eq!(strip_rendered_drafts(&repo).unwrap(), 2);

        assert_eq!(repo.list(Location::Published).unwrap().count(), 0);
        for draft in repo.list(Location::Drafts).unwrap() {
            let draft = draft.unwrap();
            assert!(draft.source_path().is_file());
            assert!(!draft.rendered_path().exists(), "{:?}", draft.dir);
        }
    }

    #[test]
    fn paths_with_shell_characters_stay_single_arguments() {
        let (_tmp, mut config) = setup_workspace();
        config.working_dir = config.working_dir.join("my blog; rm -rf ~");
        let command = push_command(&config);
        assert_eq!(
            args(&command)[3],
            format!("{}/", config.out_dir().display())
        );
    }
}
