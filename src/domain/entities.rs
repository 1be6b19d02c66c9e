//! Domain entities mirrored from persistent storage.

/// A stored blog post. `id` and `date` are assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}
