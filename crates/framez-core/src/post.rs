//! Post composition: the consumer of a confirmed crop.
//!
//! A [`PostDraft`] collects text and the working image; [`publish`] uploads
//! the image and hands a [`NewPost`] record to the post store. Upload failures
//! do not block the post, it is created without an image instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::service::ImageUri;

/// Maximum post text length, in characters.
pub const MAX_POST_CHARS: usize = 500;

const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostError {
    #[error("A post needs text or an image")]
    EmptyPost,

    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("Failed to save post: {0}")]
    Store(String),
}

/// Text and image of a post being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    text: String,
    image: Option<ImageUri>,
}

impl PostDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text, keeping at most [`MAX_POST_CHARS`] characters.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(MAX_POST_CHARS).collect();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Characters used, for a `n/500` counter.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn attach_image(&mut self, uri: ImageUri) {
        self.image = Some(uri);
    }

    pub fn remove_image(&mut self) -> Option<ImageUri> {
        self.image.take()
    }

    pub fn image(&self) -> Option<&ImageUri> {
        self.image.as_ref()
    }

    pub fn is_submittable(&self) -> bool {
        !self.text.trim().is_empty() || self.image.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The signed-in user a post is published as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            photo_url: None,
        }
    }

    /// Display name, or `"Anonymous"` when unset or blank.
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => ANONYMOUS,
        }
    }
}

/// Record handed to the post store. Absent optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub author_id: String,
    pub author_name: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_photo_url: Option<String>,
}

/// Identifier assigned by the post store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

/// Uploads a local image and returns its public URL.
#[allow(async_fn_in_trait)]
pub trait ImageUploader {
    async fn upload(&self, uri: &ImageUri) -> Result<String, PostError>;
}

/// Persists post records.
#[allow(async_fn_in_trait)]
pub trait PostStore {
    async fn create_post(&self, post: &NewPost) -> Result<PostId, PostError>;
}

/// Publish `draft` as `author`.
///
/// # Errors
///
/// - [`PostError::EmptyPost`] if the draft has neither text nor image
/// - whatever the store returns if saving fails
pub async fn publish<U, S>(
    draft: &PostDraft,
    author: &Author,
    uploader: &U,
    store: &S,
) -> Result<PostId, PostError>
where
    U: ImageUploader,
    S: PostStore,
{
    if !draft.is_submittable() {
        return Err(PostError::EmptyPost);
    }

    let image_url = match draft.image() {
        Some(uri) => match uploader.upload(uri).await {
            Ok(url) => {
                debug!(%uri, %url, "post image uploaded");
                Some(url)
            }
            Err(err) => {
                warn!(%uri, error = %err, "image upload failed, posting without image");
                None
            }
        },
        None => None,
    };

    let post = NewPost {
        author_id: author.id.clone(),
        author_name: author.name().to_string(),
        text: draft.text().to_string(),
        image_url,
        author_photo_url: author.photo_url.clone().filter(|url| !url.is_empty()),
    };

    match store.create_post(&post).await {
        Ok(id) => {
            info!(post_id = %id.0, has_image = post.image_url.is_some(), "post created");
            Ok(id)
        }
        Err(err) => {
            warn!(error = %err, "failed to save post");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeUploader {
        fail: bool,
        uploaded: RefCell<Vec<ImageUri>>,
    }

    impl ImageUploader for FakeUploader {
        async fn upload(&self, uri: &ImageUri) -> Result<String, PostError> {
            self.uploaded.borrow_mut().push(uri.clone());
            if self.fail {
                Err(PostError::Upload("network down".into()))
            } else {
                Ok(format!("https://cdn.example.com/{}", self.uploaded.borrow().len()))
            }
        }
    }

    #[derive(Default)]
    struct FakeStore {
        fail: bool,
        posts: RefCell<Vec<NewPost>>,
    }

    impl PostStore for FakeStore {
        async fn create_post(&self, post: &NewPost) -> Result<PostId, PostError> {
            if self.fail {
                return Err(PostError::Store("permission denied".into()));
            }
            self.posts.borrow_mut().push(post.clone());
            Ok(PostId(format!("post-{}", self.posts.borrow().len())))
        }
    }

    fn author() -> Author {
        Author {
            id: "u1".into(),
            display_name: Some("Ada".into()),
            photo_url: Some("https://cdn.example.com/ada.png".into()),
        }
    }

    #[test]
    fn test_text_truncated() {
        let mut draft = PostDraft::new();
        draft.set_text(&"é".repeat(600));
        assert_eq!(draft.char_count(), MAX_POST_CHARS);
    }

    #[test]
    fn test_submittable() {
        let mut draft = PostDraft::new();
        assert!(!draft.is_submittable());

        draft.set_text("   \n");
        assert!(!draft.is_submittable());

        draft.attach_image(ImageUri::from("file:///tmp/a-crop-1.jpg"));
        assert!(draft.is_submittable());

        draft.remove_image();
        draft.set_text("hello");
        assert!(draft.is_submittable());

        draft.clear();
        assert_eq!(draft, PostDraft::default());
    }

    #[test]
    fn test_author_name_fallback() {
        assert_eq!(author().name(), "Ada");
        assert_eq!(Author::new("u2").name(), "Anonymous");

        let blank = Author {
            display_name: Some("  ".into()),
            ..Author::new("u3")
        };
        assert_eq!(blank.name(), "Anonymous");
    }

    #[test]
    fn test_publish_with_image() {
        let mut draft = PostDraft::new();
        draft.set_text("sunset");
        draft.attach_image(ImageUri::from("file:///tmp/a-crop-1.jpg"));
        let uploader = FakeUploader::default();
        let store = FakeStore::default();

        let id = block_on(publish(&draft, &author(), &uploader, &store)).unwrap();
        assert_eq!(id, PostId("post-1".into()));

        let posts = store.posts.borrow();
        assert_eq!(posts[0].image_url.as_deref(), Some("https://cdn.example.com/1"));
        assert_eq!(posts[0].author_name, "Ada");
        assert_eq!(posts[0].text, "sunset");
    }

    #[test]
    fn test_upload_failure_posts_without_image() {
        let mut draft = PostDraft::new();
        draft.set_text("still posting");
        draft.attach_image(ImageUri::from("file:///tmp/a.jpg"));
        let uploader = FakeUploader {
            fail: true,
            ..Default::default()
        };
        let store = FakeStore::default();

        block_on(publish(&draft, &author(), &uploader, &store)).unwrap();
        assert_eq!(uploader.uploaded.borrow().len(), 1);
        assert_eq!(store.posts.borrow()[0].image_url, None);
    }

    #[test]
    fn test_empty_draft_rejected() {
        let uploader = FakeUploader::default();
        let store = FakeStore::default();

        let err = block_on(publish(&PostDraft::new(), &author(), &uploader, &store)).unwrap_err();
        assert_eq!(err, PostError::EmptyPost);
        assert!(store.posts.borrow().is_empty());
    }

    #[test]
    fn test_store_failure_returned() {
        let mut draft = PostDraft::new();
        draft.set_text("hi");
        let store = FakeStore {
            fail: true,
            ..Default::default()
        };

        let err = block_on(publish(&draft, &author(), &FakeUploader::default(), &store)).unwrap_err();
        assert!(matches!(err, PostError::Store(_)));
    }

    #[test]
    fn test_new_post_omits_absent_fields() {
        let post = NewPost {
            author_id: "u1".into(),
            author_name: "Anonymous".into(),
            text: "hi".into(),
            image_url: None,
            author_photo_url: None,
        };
        let text = toml::to_string(&post).unwrap();
        assert!(text.contains("authorId = \"u1\""));
        assert!(!text.contains("imageUrl"));
        assert!(!text.contains("authorPhotoUrl"));
    }
}
