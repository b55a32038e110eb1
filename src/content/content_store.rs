use std::io;

use crate::content::PostRecord;

pub const BLOG_COLLECTION: &str = "blog";

/// Source of post records. Implementations must return every post of the
/// collection; ordering is not significant.
pub trait ContentStore: Send + Sync {
    fn get_all_posts(&self, collection: &str) -> io::Result<Vec<PostRecord>>;
}

/// Keeps already loaded posts in memory.
#[derive(Default)]
pub struct StaticContentStore {
    posts: Vec<PostRecord>,
}

impl StaticContentStore {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        StaticContentStore {
            posts,
        }
    }

    /// Loads one collection of `source` up front, so later reads do no I/O.
    pub fn snapshot(source: &dyn ContentStore, collection: &str) -> io::Result<Self> {
        Ok(StaticContentStore::new(source.get_all_posts(collection)?))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl ContentStore for StaticContentStore {
    fn get_all_posts(&self, collection: &str) -> io::Result<Vec<PostRecord>> {
        let posts = self.posts.iter()
            .filter(|post| post.collection == collection)
            .cloned()
            .collect();
        Ok(posts)
    }
}
