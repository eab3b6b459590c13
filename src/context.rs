use std::path::PathBuf;

/// Where and how the rendered site is pushed.
#[derive(Debug, Clone)]
pub(crate) struct Remote {
    pub user: String,
    pub host: String,
    pub port: u16,
    pub identity: PathBuf,
    pub root: String,
}

impl Remote {
    /// `user@host:path`, as understood by rsync.
    pub fn destination(&self, path: &str) -> String {
        format!("{}@{}:{}", self.user, self.host, path)
    }

    pub fn login(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Remote shell handed to `rsync -e`. rsync splits this string itself,
    /// so the identity path is double-quoted.
    pub fn shell(&self) -> String {
        let identity = self
            .identity
            .display()
            .to_string()
            .replace('\\', "\\\\")
            .replace('"', "\\\"");
        format!("ssh -i \"{identity}\" -p {}", self.port)
    }

    pub fn posts_root(&self) -> String {
        format!("{}/p", self.root.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Site {
    pub blog_name: String,
    pub url: String,
    pub intro: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub working_dir: PathBuf,
    pub editor: PathBuf,
    pub remote: Remote,
    pub site: Site,
}

impl Config {
    pub fn backup_dir(&self) -> PathBuf {
        self.working_dir.join("bak")
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.working_dir.join("drafts")
    }

    pub fn template_dir(&self) -> PathBuf {
        self.working_dir.join("templates")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.working_dir.join("out")
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.out_dir().join("p")
    }

    pub fn index_path(&self) -> PathBuf {
        self.out_dir().join("index.html")
    }

    pub fn feed_path(&self) -> PathBuf {
        self.out_dir().join("atom.xml")
    }

    pub fn template(&self, name: &str) -> PathBuf {
        self.template_dir().join(name)
    }
}
