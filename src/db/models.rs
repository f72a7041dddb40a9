use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::models::{deserialize_role_lenient, Role};

/// A document that lives in one collection of the document store.
pub trait StoredDocument:
    Serialize + serde::de::DeserializeOwned + Clone + Send + Sync + Unpin + 'static
{
    /// Collection name in the document store.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Generate a fresh document identifier, independent of any human-readable field.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A blog article stored in the `articles` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Raw Markdown body.
    pub content: String,
    #[serde(default)]
    pub description: String,
    /// Cover image URL.
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub img_alt: String,
    #[serde(default)]
    pub label: String,
    /// Whether the article is featured as popular.
    #[serde(default)]
    pub popularity: bool,
    /// Free-form read-time string (e.g. "5 min").
    #[serde(default)]
    pub read: String,
    pub slug: String,
    /// Denormalized copy of the author's display name.
    pub author_name: String,
    pub author_uid: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Display timestamp, refreshed on every edit.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    /// Whether the public site presents the article as live.
    #[serde(default)]
    pub published: bool,
}

impl StoredDocument for Article {
    const COLLECTION: &'static str = "articles";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A short news headline stored in the `news` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl StoredDocument for NewsItem {
    const COLLECTION: &'static str = "news";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Free-text biography shown on the public team page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biography {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub summary: String,
}

/// A team member profile stored in the `authors` collection.
///
/// The document id is the identity-service UID, so the profile of the
/// signed-in user can be fetched directly from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub uid: String,
    #[serde(default)]
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatar_alt: String,
    #[serde(default)]
    pub biography: Biography,
    /// `None` when the stored value is missing or not a recognized role.
    #[serde(default, deserialize_with = "deserialize_role_lenient")]
    pub role: Option<Role>,
    #[serde(default)]
    pub slug: String,
    /// Platform name to profile URL.
    #[serde(default)]
    pub socials: BTreeMap<String, String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl StoredDocument for Author {
    const COLLECTION: &'static str = "authors";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Form payload for creating or overwriting an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub img_alt: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub popularity: bool,
    #[serde(default)]
    pub read: String,
    /// Empty means "derive from the title".
    #[serde(default)]
    pub slug: String,
    pub author_name: String,
    #[serde(default)]
    pub published: bool,
}

/// Form payload for creating or overwriting a news item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsInput {
    pub title: String,
}

/// Form payload for provisioning a new team member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMemberInput {
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub job: String,
    /// Raw role value from the select; validated server-side.
    pub role: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub slug: String,
}

/// Form payload for editing a team member or one's own profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberInput {
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatar_alt: String,
    #[serde(default)]
    pub biography: Biography,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub socials: BTreeMap<String, String>,
    /// Only honoured when the acting user may change roles.
    #[serde(default)]
    pub role: Option<Role>,
}

impl MemberInput {
    /// Prefill an edit form from an existing profile.
    pub fn from_author(author: &Author) -> Self {
        Self {
            name: author.name.clone(),
            city: author.city.clone(),
            job: author.job.clone(),
            avatar: author.avatar.clone(),
            avatar_alt: author.avatar_alt.clone(),
            biography: author.biography.clone(),
            slug: author.slug.clone(),
            socials: author.socials.clone(),
            role: author.role,
        }
    }
}

impl ArticleInput {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
            description: article.description.clone(),
            img: article.img.clone(),
            img_alt: article.img_alt.clone(),
            label: article.label.clone(),
            popularity: article.popularity,
            read: article.read.clone(),
            slug: article.slug.clone(),
            author_name: article.author_name.clone(),
            published: article.published,
        }
    }
}
