use std::borrow::Borrow;
use std::io;
use std::io::ErrorKind;
use std::ops::Deref;

use futures::future::try_join_all;
use markdown::{CompileOptions, Options, ParseOptions};

use crate::content::PostRecord;

pub const MORE_TAG: &str = "<!--more-->";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Excerpt {
    /// Markdown before the first more tag
    pub excerpt: String,
    pub excerpt_html: String,
    pub has_more: bool,
}

/// A post together with its excerpt. Every field of the post is kept as loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PostWithExcerpt {
    pub post: PostRecord,
    pub excerpt: String,
    pub excerpt_html: String,
    pub has_more: bool,
}

impl Deref for PostWithExcerpt {
    type Target = PostRecord;

    fn deref(&self) -> &Self::Target {
        &self.post
    }
}

impl Borrow<PostRecord> for PostWithExcerpt {
    fn borrow(&self) -> &PostRecord {
        &self.post
    }
}

/// Splits the body on the first `<!--more-->` and renders what comes before it.
/// Bodies without the tag have no excerpt.
pub fn extract_excerpt(body: &str) -> io::Result<Excerpt> {
    let Some((excerpt, _rest)) = body.split_once(MORE_TAG) else {
        return Ok(Excerpt::default());
    };

    Ok(Excerpt {
        excerpt: excerpt.to_string(),
        excerpt_html: render_markdown(excerpt)?,
        has_more: true,
    })
}

pub fn render_markdown(md_text: &str) -> io::Result<String> {
    // Raw HTML in posts is trusted
    let options = Options {
        parse: ParseOptions::gfm(),
        compile: CompileOptions {
            allow_dangerous_html: true,
            ..CompileOptions::gfm()
        },
    };

    match markdown::to_html_with_options(md_text, &options) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason)),
    }
}

pub async fn process_post_excerpt(post: PostRecord) -> io::Result<PostWithExcerpt> {
    let Excerpt { excerpt, excerpt_html, has_more } = extract_excerpt(&post.body)?;
    Ok(PostWithExcerpt {
        post,
        excerpt,
        excerpt_html,
        has_more,
    })
}

/// Output keeps the input order. The first failure fails the whole batch.
pub async fn process_posts_excerpts(posts: Vec<PostRecord>) -> io::Result<Vec<PostWithExcerpt>> {
    try_join_all(posts.into_iter().map(process_post_excerpt)).await
}
