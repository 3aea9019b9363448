// Wire types for the WordPress REST endpoints this crate consumes.
//
// Only the fields we read are declared; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// The authenticated user, as returned by `users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpUser {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

/// REST collections confirmed usable at last validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCapabilities {
    pub categories: bool,
    pub tags: bool,
    pub media: bool,
}

impl SiteCapabilities {
    /// All collections available. Validation reports this without probing
    /// the individual endpoints.
    pub const fn assumed() -> Self {
        Self {
            categories: true,
            tags: true,
            media: true,
        }
    }
}

/// Outcome of a successful connection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteValidation {
    pub user: WpUser,
    pub capabilities: SiteCapabilities,
}

/// A category or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpTerm {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub count: u64,
}

/// Publication status of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
    Pending,
    Private,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
            Self::Pending => "pending",
            Self::Private => "private",
        }
    }
}

/// Request body for `POST posts`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}

/// `{ "rendered": "..." }` wrapper used for titles and content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// A post as returned after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpPost {
    pub id: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: Rendered,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_ignores_extra_fields() {
        let user: WpUser = serde_json::from_value(json!({
            "id": 1,
            "name": "Admin",
            "slug": "admin",
            "avatar_urls": { "24": "https://x/a.png" },
            "_links": {}
        }))
        .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.slug, "admin");
    }

    #[test]
    fn new_post_omits_empty_optionals() {
        let post = NewPost {
            title: "Hello".into(),
            content: "<p>hi</p>".into(),
            ..NewPost::default()
        };
        assert_eq!(
            serde_json::to_value(&post).unwrap(),
            json!({ "title": "Hello", "content": "<p>hi</p>", "status": "draft" })
        );
    }

    #[test]
    fn assumed_capabilities_are_all_true() {
        let caps = SiteCapabilities::assumed();
        assert!(caps.categories && caps.tags && caps.media);
        assert_eq!(SiteCapabilities::default(), SiteCapabilities {
            categories: false,
            tags: false,
            media: false,
        });
    }
}
