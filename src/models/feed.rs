use serde::{Deserialize, Serialize};

const DEFAULT_BACKGROUND_COLOR: &str = "#FCF1EE";
const DEFAULT_BODY_COLOR: &str = "#FCF1EE";
const DEFAULT_TITLE_COLOR: &str = "#333";

/// A `basic` feed item.
///
/// https://getmondo.co.uk/docs/#create-feed-item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub image_url: String,
    pub background_color: String,
    pub body_color: String,
    pub title_color: String,
    pub body: String,
}

impl FeedItem {
    pub fn new(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: image_url.into(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            body_color: DEFAULT_BODY_COLOR.to_string(),
            title_color: DEFAULT_TITLE_COLOR.to_string(),
            body: String::new(),
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn body_color(mut self, color: impl Into<String>) -> Self {
        self.body_color = color.into();
        self
    }

    pub fn title_color(mut self, color: impl Into<String>) -> Self {
        self.title_color = color.into();
        self
    }

    /// Form fields for `POST /feed`.
    pub(crate) fn form_fields(&self, account_id: &str) -> Vec<(String, String)> {
        [
            ("account_id", account_id),
            ("type", "basic"),
            ("params[title]", self.title.as_str()),
            ("params[image_url]", self.image_url.as_str()),
            ("params[background_color]", self.background_color.as_str()),
            ("params[body_color]", self.body_color.as_str()),
            ("params[title_color]", self.title_color.as_str()),
            ("params[body]", self.body.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let item = FeedItem::new("Hello", "https://example.com/logo.png");
        assert_eq!(item.background_color, "#FCF1EE");
        assert_eq!(item.body_color, "#FCF1EE");
        assert_eq!(item.title_color, "#333");
        assert_eq!(item.body, "");
    }

    #[test]
    fn test_form_fields() {
        let item = FeedItem::new("Hello", "https://example.com/logo.png")
            .body("World")
            .title_color("#000");
        let fields = item.form_fields("acc_1");

        let get = |key: &str| {
            fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("account_id"), Some("acc_1"));
        assert_eq!(get("type"), Some("basic"));
        assert_eq!(get("params[title]"), Some("Hello"));
        assert_eq!(get("params[body]"), Some("World"));
        assert_eq!(get("params[title_color]"), Some("#000"));
        assert_eq!(fields.len(), 8);
    }
}
