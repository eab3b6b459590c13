//! Shared fixtures for the unit tests: a working directory laid out the way
//! `layout::bootstrap` leaves it, with small template fragments.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{
    context::{Config, Remote, Site},
    metadata::Header,
};

pub const HEAD_INDEX: &str = "<html><body class=\"index\">\n";
pub const FOOT_INDEX: &str = "</body></html>\n";
pub const HEAD_POST: &str = "<html><body class=\"post\">\n";
pub const FOOT_POST: &str = "<a href=\"/\">back</a></body></html>\n";

pub fn test_config(working_dir: &Path) -> Config {
    Config {
        working_dir: working_dir.to_owned(),
        editor: PathBuf::from("true"),
        remote: Remote {
            user: "deploy".to_string(),
            host: "blog.example".to_string(),
            port: 22,
            identity: PathBuf::from("/keys/id_ed25519"),
            root: "/var/static".to_string(),
        },
        site: Site {
            blog_name: "test blog".to_string(),
            url: "https://blog.example".to_string(),
            intro: "some words".to_string(),
        },
    }
}

/// Temp working directory with every area and template in place.
pub fn setup_workspace() -> (TempDir, Config) {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    for dir in [
        config.backup_dir(),
        config.drafts_dir(),
        config.posts_dir(),
        config.template_dir(),
    ] {
        fs::create_dir_all(dir).unwrap();
    }
    for (name, content) in [
        ("head_index.html", HEAD_INDEX),
        ("foot_index.html", FOOT_INDEX),
        ("head_post.html", HEAD_POST),
        ("foot_post.html", FOOT_POST),
    ] {
        fs::write(config.template(name), content).unwrap();
    }
    (tmp, config)
}

/// Writes `<area>/<slug>/in.md` with a valid header and a short body.
pub fn write_post(area: &Path, slug: &str, title: &str, created_at: i64) -> PathBuf {
    let dir = area.join(slug);
    fs::create_dir_all(&dir).unwrap();
    let mut source = Header::new(title, created_at).to_markdown();
    source.push_str("Some text.\n");
    fs::write(dir.join("in.md"), source).unwrap();
    dir
}
