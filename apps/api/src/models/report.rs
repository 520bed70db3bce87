use serde::{Deserialize, Deserializer, Serialize};

/// One related article inside a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub news_id: String,
    pub title: String,
    pub origin_url: String,
}

/// A group of related news items representing one issue, as returned by the upstream API.
///
/// `size` is the upstream's display metric and is independent of `items.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: i64,
    pub category_id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    pub representative_title: String,
    pub score: Option<f64>,
    pub size: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(default)]
    pub items: Vec<NewsItem>,
}

impl Cluster {
    /// Score used for ordering. A missing score sorts as zero.
    pub fn sort_score(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Envelope returned by `GET /api/report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Cluster>,
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Category enumeration
// ────────────────────────────────────────────────────────────────────────────

/// The six fixed report categories. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Category {
    Domestic = 1,
    China = 2,
    Overseas = 3,
    RawMaterialsRisk = 4,
    TechRnd = 5,
    PolicyRegulation = 6,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Domestic,
        Category::China,
        Category::Overseas,
        Category::RawMaterialsRisk,
        Category::TechRnd,
        Category::PolicyRegulation,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Display label shown in the header bar and the table of contents.
    pub fn label(self) -> &'static str {
        match self {
            Category::Domestic => "국내동향",
            Category::China => "중국동향",
            Category::Overseas => "해외동향",
            Category::RawMaterialsRisk => "원자재·RISK",
            Category::TechRnd => "기술·R&D",
            Category::PolicyRegulation => "정책·규제",
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Category::ALL
            .into_iter()
            .find(|c| i64::from(c.id()) == id)
    }
}

impl From<Category> for u8 {
    fn from(category: Category) -> u8 {
        category.id()
    }
}

impl TryFrom<u8> for Category {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Category::from_id(i64::from(id)).ok_or_else(|| format!("unknown category id {id}"))
    }
}
