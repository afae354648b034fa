//! Dictionary translation fetching
//!
//! Fetches definitions and phonetics for a term from the Baidu
//! text-translation dictionary API when creating or re-translating items.
//!
//! Credentials and endpoints come from [`DictionaryConfig`]; the client
//! holds no global state. Lookup failures degrade gracefully to `None`,
//! which callers treat as a no-op merge.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use ebb_core::{DictionaryConfig, Translation};

/// A dictionary lookup client
pub struct DictClient {
    http: reqwest::Client,
    config: DictionaryConfig,
}

impl DictClient {
    /// Build a client from the configured credentials and endpoints
    pub fn new(config: &DictionaryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0 (compatible; ebb/0.3)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Look up a term, returning `None` when no usable definition exists
    ///
    /// Returns `None` on network errors, unconfigured credentials, terms
    /// already in the target language, and responses without dictionary
    /// content.
    pub async fn lookup(&self, term: &str) -> Option<Translation> {
        match self.lookup_inner(term).await {
            Ok(translation) => translation,
            Err(e) => {
                warn!("Dictionary lookup for '{}' failed: {}", term, e);
                None
            }
        }
    }

    async fn lookup_inner(&self, term: &str) -> Result<Option<Translation>> {
        if !self.config.is_configured() {
            bail!("Dictionary API credentials are not configured");
        }

        let query = standardize_query(term);
        if query.is_empty() {
            return Ok(None);
        }

        let token = self.access_token().await?;
        let url = format!("{}?access_token={}", self.config.endpoint, token);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "from": "en",
                "to": "zh",
                "q": query,
            }))
            .send()
            .await
            .context("Translation request failed")?;

        if !response.status().is_success() {
            bail!("Translation request returned HTTP {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Translation response was not valid JSON")?;

        debug!("Dictionary response received for '{}'", query);
        Ok(parse_lookup_response(&body))
    }

    /// Exchange the API key/secret for an access token
    async fn access_token(&self) -> Result<String> {
        let key = self
            .config
            .api_key
            .as_deref()
            .context("Missing dictionary API key")?;
        let secret = self
            .config
            .api_secret
            .as_deref()
            .context("Missing dictionary API secret")?;

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .query(&[
                ("grant_type", "client_credentials"),
                ("client_id", key),
                ("client_secret", secret),
            ])
            .send()
            .await
            .context("Token request failed")?;

        if !response.status().is_success() {
            bail!("Token request returned HTTP {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Token response was not valid JSON")?;

        body.get("access_token")
            .and_then(Value::as_str)
            .map(String::from)
            .context("Token response did not contain access_token")
    }
}

/// Normalize a query: trim and collapse internal whitespace runs
pub fn standardize_query(term: &str) -> String {
    term.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a full translation API response into a `Translation`
///
/// Returns `None` when the response carries no dictionary content or when
/// the term turned out to be in the target language already.
fn parse_lookup_response(body: &Value) -> Option<Translation> {
    let trans_result = body
        .get("result")?
        .get("trans_result")?
        .as_array()?
        .first()?;

    // The dict field is a JSON document embedded as a string
    let dict_json = trans_result.get("dict")?.as_str()?;

    let tts_url = trans_result
        .get("src_tts")
        .and_then(Value::as_str)
        .filter(|url| is_trusted_tts_url(url))
        .map(String::from);

    parse_dict_payload(dict_json, tts_url)
}

/// Parse the embedded dictionary payload
fn parse_dict_payload(dict_json: &str, tts_url: Option<String>) -> Option<Translation> {
    let dict: Value = serde_json::from_str(dict_json).ok()?;

    // lang == "0" means the input was already in the target language
    if dict.get("lang").and_then(Value::as_str) == Some("0") {
        return None;
    }

    let simple_means = dict.get("word_result")?.get("simple_means")?;
    let symbols = simple_means
        .get("symbols")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut translation = Translation {
        tts_url,
        ..Translation::default()
    };

    for symbol in &symbols {
        if translation.uk_phonetic.is_none() {
            translation.uk_phonetic = symbol
                .get("ph_en")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from);
        }
        if translation.us_phonetic.is_none() {
            translation.us_phonetic = symbol
                .get("ph_am")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from);
        }

        let parts = symbol
            .get("parts")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for detail in &parts {
            let part = detail.get("part").and_then(Value::as_str).unwrap_or("");
            let means = collect_means(detail.get("means"));
            if !part.is_empty() && !means.is_empty() {
                translation
                    .lines
                    .push(format!("{} {}", part, means.join("; ")));
            }
        }
    }

    // No per-sense definitions: fall back to the plain word meanings
    if translation.lines.is_empty() {
        let word_means = collect_means(simple_means.get("word_means"));
        if !word_means.is_empty() {
            translation.lines.push(word_means.join("; "));
        }
    }

    if translation.is_empty() {
        None
    } else {
        Some(translation)
    }
}

/// Meanings arrive either as plain strings or as objects with a `mean` key
fn collect_means(means: Option<&Value>) -> Vec<String> {
    means
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => obj
                        .get("mean")
                        .and_then(Value::as_str)
                        .map(String::from),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Accept pronunciation audio only over https from the provider's domain
fn is_trusted_tts_url(url: &str) -> bool {
    url.starts_with("https://") && url.contains("baidu.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict_payload() -> String {
        serde_json::json!({
            "lang": "1",
            "word_result": {
                "simple_means": {
                    "word_means": ["猫", "猫科动物"],
                    "symbols": [{
                        "ph_en": "kæt",
                        "ph_am": "kæt",
                        "parts": [{
                            "part": "n.",
                            "means": ["猫", {"mean": "猫科动物"}]
                        }]
                    }]
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_parse_dict_payload() {
        let translation = parse_dict_payload(&dict_payload(), None).unwrap();
        assert_eq!(translation.uk_phonetic.as_deref(), Some("kæt"));
        assert_eq!(translation.us_phonetic.as_deref(), Some("kæt"));
        assert_eq!(translation.lines, vec!["n. 猫; 猫科动物"]);
    }

    #[test]
    fn test_parse_target_language_input() {
        let payload = serde_json::json!({
            "lang": "0",
            "word_result": { "simple_means": { "word_means": ["cat"] } }
        })
        .to_string();
        assert!(parse_dict_payload(&payload, None).is_none());
    }

    #[test]
    fn test_parse_word_means_fallback() {
        let payload = serde_json::json!({
            "lang": "1",
            "word_result": {
                "simple_means": {
                    "word_means": ["猫", "猫科动物"],
                    "symbols": []
                }
            }
        })
        .to_string();

        let translation = parse_dict_payload(&payload, None).unwrap();
        assert_eq!(translation.lines, vec!["猫; 猫科动物"]);
        assert!(translation.uk_phonetic.is_none());
    }

    #[test]
    fn test_parse_empty_payload() {
        let payload = serde_json::json!({
            "lang": "1",
            "word_result": { "simple_means": { "symbols": [] } }
        })
        .to_string();
        assert!(parse_dict_payload(&payload, None).is_none());
    }

    #[test]
    fn test_parse_full_response() {
        let body = serde_json::json!({
            "result": {
                "trans_result": [{
                    "dst": "猫",
                    "src": "cat",
                    "dict": dict_payload(),
                    "src_tts": "https://fanyi.baidu.com/tts/cat.mp3"
                }]
            }
        });

        let translation = parse_lookup_response(&body).unwrap();
        assert_eq!(
            translation.tts_url.as_deref(),
            Some("https://fanyi.baidu.com/tts/cat.mp3")
        );
        assert_eq!(translation.lines.len(), 1);
    }

    #[test]
    fn test_parse_response_without_dict() {
        let body = serde_json::json!({
            "result": { "trans_result": [{ "dst": "跑步", "src": "running" }] }
        });
        assert!(parse_lookup_response(&body).is_none());
    }

    #[test]
    fn test_standardize_query() {
        assert_eq!(standardize_query("  take   off \n"), "take off");
        assert_eq!(standardize_query("cat"), "cat");
        assert_eq!(standardize_query("   "), "");
    }

    #[test]
    fn test_trusted_tts_url() {
        assert!(is_trusted_tts_url("https://fanyi.baidu.com/tts/cat.mp3"));
        assert!(!is_trusted_tts_url("http://fanyi.baidu.com/tts/cat.mp3"));
        assert!(!is_trusted_tts_url("https://example.com/tts/cat.mp3"));
    }
}
