use std::{fmt::Display, fs, io::ErrorKind};

use atom_syndication::{EntryBuilder, FeedBuilder, LinkBuilder};
use chrono::TimeZone;
use fs_extra::dir::CopyOptions;
use log::{debug, info, warn};

use crate::{
    context::Config,
    error::{Error, PathContext, Result},
    metadata::Header,
    post::{Location, Post, Repository},
    renderer::{render_index, render_post, Fragments, IndexEntry, Page},
};

mod data;
mod utils;

use data::PublishedPost;
use utils::{feed_time, format_date, modified_time, sort_post, stamp_times};

/// Renders one draft and moves it to the published area.
///
/// Nothing on disk changes until the header is parsed and the page is
/// rendered. If writing `index.html` or moving the directory fails, the
/// rendered file is removed again so the post stays a clean draft.
fn publish_post(repo: &Repository, fragments: &Fragments, draft: &Post) -> Result<Post> {
    draft.discard_rendered()?;

    let source_path = draft.source_path();
    let source = fs::read_to_string(&source_path).at(&source_path)?;
    let header = Header::from_source(&source_path, &source)?;
    let page = render_post(fragments, &source);

    let rendered_path = draft.rendered_path();
    let moved = fs::write(&rendered_path, page)
        .at(&rendered_path)
        .and_then(|()| repo.move_to_published(&draft.slug));
    let published = match moved {
        Ok(published) => published,
        Err(e) => {
            if let Err(cleanup) = draft.discard_rendered() {
                warn!("could not remove {rendered_path:?}: {cleanup}");
            }
            return Err(e);
        }
    };

    stamp_times(&published.dir, header.created_at)?;
    debug!("{:?} stamped with {}", published.dir, header.created_at);
    Ok(published)
}

/// Publishes every draft, then snapshots the published area into `bak/`.
/// Stops at the first post that fails; posts before it stay published.
pub(crate) fn assemble(config: &Config) -> Result<Vec<Post>> {
    let repo = Repository::new(config);
    let drafts = repo.list(Location::Drafts)?.collect::<Result<Vec<_>>>()?;

    let mut published = Vec::with_capacity(drafts.len());
    if !drafts.is_empty() {
        let fragments = Fragments::load(config, Page::Post)?;
        for draft in drafts.iter() {
            let post = publish_post(&repo, &fragments, draft)?;
            info!("published {}", post.slug);
            published.push(post);
        }
    }

    backup(config)?;
    Ok(published)
}

pub(crate) fn backup(config: &Config) -> Result<()> {
    let backup_dir = config.backup_dir();
    fs_extra::dir::create_all(&backup_dir, false)?;

    let mut cp_opts = CopyOptions::new();
    cp_opts.copy_inside = true;
    cp_opts.content_only = true;
    cp_opts.overwrite = true;
    fs_extra::dir::copy(config.posts_dir(), &backup_dir, &cp_opts)?;

    debug!("backed up posts into {backup_dir:?}");
    Ok(())
}

fn published_posts(repo: &Repository) -> Result<Vec<PublishedPost>> {
    let mut posts = repo
        .list(Location::Published)?
        .map(|post| {
            let post = post?;
            Ok(PublishedPost {
                header: post.header()?,
                modified: modified_time(&post.dir)?,
                post,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    posts.sort_by(sort_post);
    Ok(posts)
}

/// Regenerates `out/index.html` and `out/atom.xml` from the published posts.
pub(crate) fn build_index<Tz: TimeZone>(config: &Config, tz: &Tz) -> Result<()>
where
    Tz::Offset: Display,
{
    let index_path = config.index_path();
    match fs::remove_file(&index_path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e).at(&index_path),
        _ => {}
    }

    let repo = Repository::new(config);
    let posts = published_posts(&repo)?;

    let entries = posts
        .iter()
        .map(|p| {
            let date = format_date(p.header.created_at, tz).ok_or_else(|| Error::Parse {
                path: p.post.source_path(),
                reason: format!("timestamp {} is out of range", p.header.created_at),
            })?;
            Ok(IndexEntry {
                slug: p.post.slug.clone(),
                title: p.header.title.clone(),
                date,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let fragments = Fragments::load(config, Page::Index)?;
    let page = render_index(&fragments, &config.site.intro, &entries);
    fs::write(&index_path, page).at(&index_path)?;

    build_feed(config, &posts)?;

    info!("index rebuilt with {} posts", entries.len());
    Ok(())
}

fn build_feed(config: &Config, posts: &[PublishedPost]) -> Result<()> {
    let site = config.site.url.trim_end_matches('/');
    let home = format!("{site}/");

    let entries = posts
        .iter()
        .map(|p| {
            let link = format!("{site}/p/{}/", p.post.slug);
            EntryBuilder::default()
                .title(p.header.title.clone())
                .id(link.clone())
                .updated(feed_time(p.header.created_at))
                .links(vec![LinkBuilder::default().href(link).build()])
                .build()
        })
        .collect::<Vec<_>>();
    let updated = posts
        .iter()
        .map(|p| p.header.created_at)
        .max()
        .unwrap_or(0);

    let feed = FeedBuilder::default()
        .title(config.site.blog_name.clone())
        .id(home.clone())
        .updated(feed_time(updated))
        .links(vec![LinkBuilder::default().href(home).build()])
        .entries(entries)
        .build();

    let feed_path = config.feed_path();
    fs::write(&feed_path, feed.to_string()).at(&feed_path)
}
