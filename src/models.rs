use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    /// Absent field deserializes to "" and takes the same validation path.
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// One page's extracted fields, serialized flat as the 200 response body.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ScrapedRecord {
    pub title: String,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
}
