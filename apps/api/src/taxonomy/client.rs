/// O*NET Web Services client — the single point of entry for all occupational
/// taxonomy calls.
///
/// Credentials are HTTP Basic Auth from the environment. A non-200 response is
/// the only distinguished failure; there is no retry logic here. Callers that
/// can degrade (ingestion) absorb a failed category into zero elements.
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const ONET_BASE_URL: &str = "https://services.onetcenter.org/ws/online";
/// Scale identifier for importance ratings (1.0–5.0) in O*NET element data.
const IMPORTANCE_SCALE: &str = "IM";

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Element category in the source taxonomy. The three categories carry
/// deliberately different importance floors and selection shares — domain
/// knowledge differentiates competence far better than generic abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    Knowledge,
    Skill,
    Ability,
}

impl ElementCategory {
    pub const ALL: [ElementCategory; 3] = [
        ElementCategory::Knowledge,
        ElementCategory::Skill,
        ElementCategory::Ability,
    ];

    /// URL path segment under `/occupations/{soc}/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ElementCategory::Knowledge => "knowledge",
            ElementCategory::Skill => "skills",
            ElementCategory::Ability => "abilities",
        }
    }

    /// Minimum importance for an element of this category to be considered.
    /// Abilities are least assessable via quiz, so the bar is highest.
    pub fn importance_floor(&self) -> f64 {
        match self {
            ElementCategory::Knowledge => 3.0,
            ElementCategory::Skill => 3.5,
            ElementCategory::Ability => 4.0,
        }
    }

    /// Skill-table category label for elements of this kind.
    pub fn skill_category_label(&self) -> &'static str {
        match self {
            ElementCategory::Knowledge => "Knowledge",
            ElementCategory::Skill => "Professional Skill",
            ElementCategory::Ability => "Ability",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::Knowledge => "knowledge",
            ElementCategory::Skill => "skill",
            ElementCategory::Ability => "ability",
        }
    }
}

/// One taxonomy element with its importance rating.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyElement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: f64,
    pub category: ElementCategory,
}

/// Provider seam for the external taxonomy. `OnetClient` is the production
/// implementation; tests substitute an in-memory fake.
#[async_trait]
pub trait TaxonomyProvider: Send + Sync {
    async fn fetch_elements(
        &self,
        soc_code: &str,
        category: ElementCategory,
    ) -> Result<Vec<TaxonomyElement>, TaxonomyError>;
}

#[derive(Debug, Deserialize)]
struct ElementsResponse {
    #[serde(default)]
    element: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    scale: Option<RawScale>,
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawScale {
    id: String,
}

#[derive(Clone)]
pub struct OnetClient {
    client: Client,
    username: String,
    password: String,
}

impl OnetClient {
    pub fn new(username: String, password: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            username,
            password,
        }
    }
}

#[async_trait]
impl TaxonomyProvider for OnetClient {
    async fn fetch_elements(
        &self,
        soc_code: &str,
        category: ElementCategory,
    ) -> Result<Vec<TaxonomyElement>, TaxonomyError> {
        let url = format!(
            "{}/occupations/{}/{}",
            ONET_BASE_URL,
            soc_code,
            category.path_segment()
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TaxonomyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ElementsResponse = response.json().await?;
        let elements = parse_elements(parsed, category);

        debug!(
            "Fetched {} {} elements for {soc_code}",
            elements.len(),
            category.as_str()
        );

        Ok(elements)
    }
}

/// Keeps only importance-scale entries and normalizes them. Elements without
/// an importance rating cannot be weighted and are dropped.
fn parse_elements(response: ElementsResponse, category: ElementCategory) -> Vec<TaxonomyElement> {
    response
        .element
        .into_iter()
        .filter_map(|raw| {
            let is_importance = raw
                .scale
                .as_ref()
                .map(|s| s.id == IMPORTANCE_SCALE)
                .unwrap_or(false);
            match (is_importance, raw.value) {
                (true, Some(value)) => Some(TaxonomyElement {
                    id: raw.id,
                    name: raw.name,
                    description: raw.description.unwrap_or_default(),
                    importance: value,
                    category,
                }),
                _ => None,
            }
        })
        .collect()
}
