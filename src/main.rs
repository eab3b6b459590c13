use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{command, Arg, ArgMatches};
use context::{Config, Remote, Site};
use log::{info, warn};
use post::{Location, Repository};

mod context;
mod error;
mod generator;
mod layout;
mod metadata;
mod post;
mod process;
mod renderer;
mod sync;
#[cfg(test)]
mod test_helpers;

const USAGE: &str = "usage: sgb {
\tn(ew) [title]: create a new post
\te(dit): edit an existing post
\td(elete): delete an existing post
\tp(ublish): move drafts to post directory
\tf(etch): fetch posts from remote host
\ts(ync): use rsync to push local posts to remote web server
}";

fn cli() -> clap::Command {
    let setting = |name: &'static str, env: &'static str, help: &'static str| {
        Arg::new(name).long(name).env(env).help(help)
    };

    command!()
        .args([
            Arg::new("verb").help("One of n, e, d, p, f, s"),
            Arg::new("title")
                .help("Title of the new post (verb n); several words are joined with spaces")
                .num_args(1..),
            setting("dir", "BLOG_DIR", "Working directory [default: ~/Documents/blog]")
                .value_parser(clap::value_parser!(PathBuf)),
            setting("editor", "EDITOR", "Editor executable")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("/usr/bin/vi"),
            setting("ssh-user", "BLOG_SSH_USER", "Remote user").default_value("root"),
            setting("ssh-host", "BLOG_SSH_HOST", "Remote host").default_value("localhost"),
            setting("ssh-port", "BLOG_SSH_PORT", "Remote ssh port")
                .value_parser(clap::value_parser!(u16))
                .default_value("22"),
            setting("identity", "BLOG_SSH_IDENTITY", "Private key [default: ~/.ssh/id_ed25519]")
                .value_parser(clap::value_parser!(PathBuf)),
            setting("remote-root", "BLOG_REMOTE_ROOT", "Web root on the remote host")
                .default_value("/var/static"),
            setting("blog-name", "BLOG_NAME", "Feed title").default_value("blog"),
            setting("site-url", "BLOG_URL", "Public url of the site [default: https://<ssh-host>]"),
            setting("intro", "BLOG_INTRO", "Paragraph above the post list")
                .default_value("some words on pages about stuff"),
        ])
        .after_help(USAGE)
}

fn home() -> anyhow::Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .context("HOME is not set")
}

fn config_from(matches: &ArgMatches) -> anyhow::Result<Config> {
    let string = |name: &str| matches.get_one::<String>(name).cloned().unwrap_or_default();

    let working_dir = match matches.get_one::<PathBuf>("dir") {
        Some(dir) => dir.clone(),
        None => home()?.join("Documents").join("blog"),
    };
    let identity = match matches.get_one::<PathBuf>("identity") {
        Some(identity) => identity.clone(),
        None => home()?.join(".ssh").join("id_ed25519"),
    };
    let host = string("ssh-host");
    let url = matches
        .get_one::<String>("site-url")
        .cloned()
        .unwrap_or_else(|| format!("https://{host}"));

    Ok(Config {
        working_dir,
        editor: matches
            .get_one::<PathBuf>("editor")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("/usr/bin/vi")),
        remote: Remote {
            user: string("ssh-user"),
            host,
            port: matches.get_one::<u16>("ssh-port").copied().unwrap_or(22),
            identity,
            root: string("remote-root"),
        },
        site: Site {
            blog_name: string("blog-name"),
            url,
            intro: string("intro"),
        },
    })
}

fn title_from(matches: &ArgMatches) -> Option<String> {
    matches
        .get_many::<String>("title")
        .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
}

fn prompt_title() -> anyhow::Result<String> {
    print!("> ");
    io::stdout().flush()?;
    let mut title = String::new();
    io::stdin()
        .read_line(&mut title)
        .context("while reading the title")?;
    Ok(title)
}

fn dispatch(config: &Config, verb: &str, title: Option<&str>) -> anyhow::Result<()> {
    let repo = Repository::new(config);
    match verb {
        "n" => {
            let title = match title {
                Some(title) => title.to_string(),
                None => prompt_title()?,
            };
            let post = repo.create(&title, chrono::Utc::now().timestamp())?;
            println!("{}", post.slug);
            process::launch_editor(&config.editor, &post.source_path())?;
        }
        "e" => {
            let post = repo.select(
                Location::Published,
                "post to edit> ",
                io::stdin().lock(),
                io::stdout(),
            )?;
            let draft = repo.move_to_draft(&post.slug)?;
            info!("moved post {} to draft dir", draft.slug);
            draft.discard_rendered()?;
            process::launch_editor(&config.editor, &draft.source_path())?;
        }
        "d" => {
            let post = repo.select(
                Location::Published,
                "post to delete> ",
                io::stdin().lock(),
                io::stdout(),
            )?;
            repo.delete(&post.slug)?;
        }
        "p" => {
            let published = generator::assemble(config).context("while publishing drafts")?;
            info!("published {} drafts", published.len());
        }
        "f" => sync::pull(config).context("while fetching posts")?,
        "s" => sync::push(config).context("while syncing posts")?,
        other => warn!("unknown verb {other:?}, only rebuilding the index"),
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();
    let config = config_from(&matches)?;

    let cwd = std::env::current_dir().context("current directory")?;
    layout::bootstrap(&config, &cwd).context("while preparing the working directory")?;

    let Some(verb) = matches.get_one::<String>("verb") else {
        println!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    dispatch(&config, verb, title_from(&matches).as_deref())?;
    generator::build_index(&config, &chrono::Local).context("while building the index")?;

    Ok(ExitCode::SUCCESS)
}
