use lazy_static::lazy_static;
use regex::Regex;

pub const BLOG_PATH: &str = "/blog/";

lazy_static! {
    static ref DATE_PREFIX_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}-").unwrap();
    static ref EXTENSION_REGEX: Regex = Regex::new(r"\.mdx?$").unwrap();
}

/// Removes the `yyyy-MM-dd-` prefix and the `.md`/`.mdx` extension from a post id.
/// Ids without them are returned as they are.
///
/// `2017-06-30-get-adobject-pscx-memberof.md` -> `get-adobject-pscx-memberof`
pub fn derive_slug(post_id: &str) -> String {
    let without_date = DATE_PREFIX_REGEX.replace(post_id, "");
    EXTENSION_REGEX.replace(&without_date, "").into_owned()
}

/// `2017-06-30-get-adobject-pscx-memberof.md` -> `/blog/get-adobject-pscx-memberof`
pub fn derive_post_url(post_id: &str) -> String {
    format!("{}{}", BLOG_PATH, derive_slug(post_id))
}
