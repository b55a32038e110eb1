use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

pub mod content_store;
pub mod dir_store;
pub mod front_matter;

/// Identifier of a post inside its collection, e.g. `2017-06-30-get-adobject-pscx-memberof.md`.
#[derive(Debug, Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct PostId(pub String);

impl PostId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostMeta {
    pub title: String,
    pub date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub categories: Option<String>,
    pub hero_image: Option<String>,
    pub draft: bool,
}

impl PostMeta {
    pub fn new(title: &str, date: DateTime<Utc>) -> Self {
        PostMeta {
            title: title.to_string(),
            date,
            updated_date: None,
            description: None,
            tags: vec![],
            categories: None,
            hero_image: None,
            draft: false,
        }
    }
}

/// A post as loaded from a content store. Never modified after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: PostId,
    pub collection: String,
    pub body: String,
    pub data: PostMeta,
}

impl PostRecord {
    pub fn new(id: &str, collection: &str, body: &str, data: PostMeta) -> Self {
        PostRecord {
            id: PostId(id.to_string()),
            collection: collection.to_string(),
            body: body.to_string(),
            data,
        }
    }
}

impl Display for PostRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, collection={}, date={}\ntitle={}\nbody:\n{}",
               self.id,
               self.collection,
               self.data.date,
               self.data.title,
               self.body
        )
    }
}
