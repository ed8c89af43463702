use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Article,
    Video,
    Course,
}

impl ResourceKind {
    /// Lenient mapping from the label the resource service returns.
    /// Anything unrecognised is shown as an article.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "video" => Self::Video,
            "course" => Self::Course,
            _ => Self::Article,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Video => "Video",
            Self::Course => "Course",
        }
    }
}

/// A related learning link for the current step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub title: String,
    pub kind: ResourceKind,
    pub url: Url,
}

/// Search links shown when the resource service cannot suggest anything.
#[must_use]
pub fn fallback_resources(topic: &str, step_title: &str) -> Vec<Resource> {
    let candidates = [
        (
            format!("Introduction to {step_title}"),
            ResourceKind::Article,
            Url::parse_with_params("https://www.google.com/search", [("q", step_title)]),
        ),
        (
            format!("Deep dive into {topic}"),
            ResourceKind::Video,
            Url::parse_with_params(
                "https://www.youtube.com/results",
                [("search_query", topic)],
            ),
        ),
    ];

    candidates
        .into_iter()
        .filter_map(|(title, kind, url)| url.ok().map(|url| Resource { title, kind, url }))
        .collect()
}
