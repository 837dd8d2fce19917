use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub api_key: String,
}

impl SearchConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_SEARCH_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self { api_key })
    }
}

/// Best-effort web search used to ground generated quizzes in fresh facts.
///
/// Any failure (missing key, network error, bad payload) degrades to an
/// empty context string so generation can proceed without it.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    config: Option<SearchConfig>,
}

impl SearchClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(SearchConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<SearchConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Fetch a context blurb for the given query, or an empty string.
    pub async fn context_for(&self, query: &str) -> String {
        let Some(config) = self.config.as_ref() else {
            return String::new();
        };

        let payload = SearchRequest {
            api_key: config.api_key.clone(),
            query: query.to_string(),
            search_depth: "basic",
            max_results: 5,
            include_answer: true,
        };

        let response = match self
            .client
            .post("https://api.tavily.com/search")
            .json(&payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            _ => return String::new(),
        };

        match response.json::<SearchResponse>().await {
            Ok(body) => format_context(&body),
            Err(_) => String::new(),
        }
    }
}

fn format_context(body: &SearchResponse) -> String {
    let mut out = String::new();

    if let Some(answer) = body.answer.as_deref() {
        let answer = answer.trim();
        if !answer.is_empty() {
            out.push_str("WEB SEARCH SUMMARY:\n");
            out.push_str(answer);
            out.push('\n');
        }
    }

    let snippets: Vec<&str> = body
        .results
        .iter()
        .filter_map(|r| {
            let content = r.content.trim();
            (!content.is_empty()).then_some(content)
        })
        .collect();
    if !snippets.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("RELEVANT INFORMATION:\n");
        for snippet in snippets {
            out.push_str("- ");
            out.push_str(snippet);
            out.push('\n');
        }
    }

    out
}

#[derive(Debug, Serialize)]
struct SearchRequest {
    api_key: String,
    query: String,
    search_depth: &'static str,
    max_results: u32,
    include_answer: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    content: String,
}
