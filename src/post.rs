use std::{
    fs::{self, OpenOptions},
    io::{BufRead, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use log::{debug, info, warn};
use regex::Regex;

use crate::{
    context::Config,
    error::{Error, PathContext, Result},
    metadata::Header,
};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]").unwrap());
static UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").unwrap());

pub(crate) const SOURCE_FILE: &str = "in.md";
pub(crate) const RENDERED_FILE: &str = "index.html";

/// Turns a title into a directory name: spaces become `_`, everything that
/// is not an ASCII word character is dropped, then `_` runs are collapsed.
pub(crate) fn slugify(title: &str) -> String {
    let underscored = title.replace(' ', "_");
    let stripped = NON_WORD.replace_all(&underscored, "");
    UNDERSCORE_RUN.replace_all(&stripped, "_").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    Drafts,
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub slug: String,
    pub dir: PathBuf,
    pub location: Location,
}

impl Post {
    pub fn source_path(&self) -> PathBuf {
        self.dir.join(SOURCE_FILE)
    }

    pub fn rendered_path(&self) -> PathBuf {
        self.dir.join(RENDERED_FILE)
    }

    pub fn header(&self) -> Result<Header> {
        Header::read(&self.source_path())
    }

    /// Removes `index.html` if present. Returns whether anything was removed.
    pub fn discard_rendered(&self) -> Result<bool> {
        let path = self.rendered_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).at(&path),
        }
    }
}

/// Lazy listing of one post area, in directory order.
pub(crate) struct Posts {
    entries: fs::ReadDir,
    root: PathBuf,
    location: Location,
}

impl Iterator for Posts {
    type Item = Result<Post>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e).at(&self.root)),
            };
            match entry.file_type() {
                Ok(t) if t.is_dir() => {
                    return Some(Ok(Post {
                        slug: entry.file_name().to_string_lossy().to_string(),
                        dir: entry.path(),
                        location: self.location,
                    }))
                }
                Ok(_) => warn!("ignoring {:?}: not a post directory", entry.path()),
                Err(e) => return Some(Err(e).at(&entry.path())),
            }
        }
    }
}

pub(crate) struct Repository<'a> {
    config: &'a Config,
}

impl<'a> Repository<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn root(&self, location: Location) -> PathBuf {
        match location {
            Location::Drafts => self.config.drafts_dir(),
            Location::Published => self.config.posts_dir(),
        }
    }

    fn post(&self, location: Location, slug: &str) -> Post {
        Post {
            slug: slug.to_string(),
            dir: self.root(location).join(slug),
            location,
        }
    }

    pub fn list(&self, location: Location) -> Result<Posts> {
        let root = self.root(location);
        let entries = fs::read_dir(&root).at(&root)?;
        Ok(Posts {
            entries,
            root,
            location,
        })
    }

    /// Prints the posts in `location` as an enumerated list, reads a
    /// zero-based index from `input` and resolves it.
    pub fn select<R: BufRead, W: Write>(
        &self,
        location: Location,
        prompt: &str,
        mut input: R,
        mut output: W,
    ) -> Result<Post> {
        let posts = self.list(location)?.collect::<Result<Vec<_>>>()?;

        for (i, post) in posts.iter().enumerate() {
            writeln!(output, "[{i}] {}", post.slug).map_err(Error::Terminal)?;
        }
        write!(output, "{prompt}").map_err(Error::Terminal)?;
        output.flush().map_err(Error::Terminal)?;

        let mut line = String::new();
        input.read_line(&mut line).map_err(Error::Terminal)?;
        let answer = line.trim();

        let index: usize = answer.parse().map_err(|_| Error::InvalidSelection {
            input: answer.to_string(),
            reason: "not a post number".to_string(),
        })?;

        posts
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::InvalidSelection {
                input: answer.to_string(),
                reason: "no post with that number".to_string(),
            })
    }

    /// Creates `drafts/<slug>/in.md` holding only the header lines.
    pub fn create(&self, title: &str, created_at: i64) -> Result<Post> {
        let title = title.replace(['\r', '\n'], "");
        let slug = slugify(&title);
        let create_error = |source| Error::Create {
            slug: slug.clone(),
            source,
        };
        if slug.is_empty() {
            return Err(create_error(std::io::Error::new(
                ErrorKind::InvalidInput,
                "title has no usable characters",
            )));
        }

        if self.post(Location::Published, &slug).dir.exists() {
            return Err(create_error(std::io::Error::new(
                ErrorKind::AlreadyExists,
                "a published post has the same slug",
            )));
        }

        let post = self.post(Location::Drafts, &slug);
        fs::create_dir(&post.dir).map_err(create_error)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(post.source_path())
            .map_err(create_error)?;
        file.write_all(Header::new(&title, created_at).to_markdown().as_bytes())
            .map_err(create_error)?;

        info!("created post {title} in draft dir");
        Ok(post)
    }

    fn relocate(&self, slug: &str, from: Location, to: Location) -> Result<Post> {
        let source = self.post(from, slug);
        if !source.dir.is_dir() {
            return Err(Error::NotFound(slug.to_string()));
        }
        let target = self.post(to, slug);
        if target.dir.exists() {
            return Err(Error::FileSystem {
                path: target.dir,
                source: std::io::Error::new(ErrorKind::AlreadyExists, "post already exists"),
            });
        }
        fs::rename(&source.dir, &target.dir).at(&target.dir)?;
        debug!("moved {slug} from {from:?} to {:?}", target.location);
        Ok(target)
    }

    pub fn move_to_published(&self, slug: &str) -> Result<Post> {
        self.relocate(slug, Location::Drafts, Location::Published)
    }

    pub fn move_to_draft(&self, slug: &str) -> Result<Post> {
        self.relocate(slug, Location::Published, Location::Drafts)
    }

    pub fn delete(&self, slug: &str) -> Result<()> {
        let post = self.post(Location::Published, slug);
        if !post.dir.is_dir() {
            return Err(Error::NotFound(slug.to_string()));
        }
        fs::remove_dir_all(&post.dir).at(&post.dir)?;
        info!("deleted post {slug}");
        Ok(())
    }

    /// Empties a post area.
    pub fn clear(&self, location: Location) -> Result<()> {
        for post in self.list(location)? {
            let post = post?;
            fs::remove_dir_all(&post.dir).at(&post.dir)?;
        }
        Ok(())
    }
}

pub(crate) fn exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}
