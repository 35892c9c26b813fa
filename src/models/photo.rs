use serde::{Deserialize, Serialize};

/// A single photo as returned by the provider, mapped into our own shape.
///
/// Visibility flags stay integers: Flickr reports them as `0`/`1` and may omit
/// them, so `0` doubles as "unknown".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoRecord {
    pub id: String,

    pub owner: String,

    pub secret: String,

    pub server: String,

    pub farm: i64,

    pub title: String,

    pub is_public: i32,

    pub is_friend: i32,

    pub is_family: i32,
}

impl PhotoRecord {
    /// Static image URL following Flickr's farm addressing scheme.
    #[must_use]
    pub fn image_url(&self) -> String {
        image_url(&self.server, &self.id, &self.secret, self.farm)
    }
}

#[must_use]
pub fn image_url(server: &str, id: &str, secret: &str, farm: i64) -> String {
    format!("https://farm{farm}.staticflickr.com/{server}/{id}_{secret}.jpg")
}
