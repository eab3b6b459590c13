use maud::html;
use pulldown_cmark::{html::push_html, Options, Parser};

use crate::{
    context::Config,
    error::{PathContext, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Index,
    Post,
}

impl Page {
    fn name(self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Post => "post",
        }
    }
}

/// The fixed head/foot fragments wrapped around every page body.
#[derive(Debug, Clone)]
pub(crate) struct Fragments {
    pub head: String,
    pub foot: String,
}

impl Fragments {
    pub fn load(config: &Config, page: Page) -> Result<Self> {
        let read = |part: &str| {
            let path = config.template(&format!("{part}_{}.html", page.name()));
            std::fs::read_to_string(&path).at(&path)
        };
        Ok(Self {
            head: read("head")?,
            foot: read("foot")?,
        })
    }

    pub fn wrap(&self, body: &str) -> String {
        let mut page = String::with_capacity(self.head.len() + body.len() + self.foot.len());
        page.push_str(&self.head);
        page.push_str(body);
        page.push_str(&self.foot);
        page
    }
}

pub(crate) fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut body = String::new();
    push_html(&mut body, Parser::new_ext(source, options));
    body
}

pub(crate) fn render_post(fragments: &Fragments, source: &str) -> String {
    fragments.wrap(&markdown_to_html(source))
}

/// One line of the index list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexEntry {
    pub slug: String,
    pub title: String,
    pub date: String,
}

pub(crate) fn render_index(fragments: &Fragments, intro: &str, entries: &[IndexEntry]) -> String {
    let body = html! {
        p { (intro) } "\n"
        h2 { "posts" } "\n"
        ul id="posts" {
            "\n"
            @for entry in entries {
                li {
                    a href={ "p/" (entry.slug) } { (entry.title) } "\n"
                    span.date { (entry.date) }
                }
                "\n"
            }
        }
        "\n"
    };
    fragments.wrap(&body.into_string())
}
