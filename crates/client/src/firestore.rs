//! A [`DocumentStore`] backed by Cloud Firestore, using the v1 REST API.
//!
//! See: https://firebase.google.com/docs/firestore/reference/rest
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

use crate::{Document, DocumentStore, Result, StoreError};

pub const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1/";

/// Documents fetched per request when listing a collection
const PAGE_SIZE: u32 = 300;

/// Where to find the database, and how to authenticate to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,

    #[serde(default = "default_database")]
    pub database: String,

    /// Web API key, sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,

    /// OAuth2 / ID token, sent as a bearer token
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// `host:port` of a local emulator. Used over plain http instead of Google's endpoint.
    #[serde(default)]
    pub emulator_host: Option<String>,
}

fn default_database() -> String {
    "(default)".to_string()
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: default_database(),
            api_key: None,
            bearer_token: None,
            emulator_host: None,
        }
    }
}

/// Talks to Firestore over HTTP
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    config: FirestoreConfig,
    http: reqwest::Client,
    base: Url,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        let base = match &config.emulator_host {
            Some(host) => format!("http://{}/v1/", host),
            None => FIRESTORE_BASE.to_string(),
        };
        let base = Url::parse(&base).map_err(|e| StoreError::Other(e.to_string()))?;

        Ok(Self {
            config,
            http: reqwest::Client::new(),
            base,
        })
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// URL of a collection, or a document in it if `key` is given.
    fn url(&self, collection: &str, key: Option<&str>) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Other(format!("bad base url: {}", self.base)))?;
            segments.pop_if_empty().extend([
                "projects",
                self.config.project_id.as_str(),
                "databases",
                self.config.database.as_str(),
                "documents",
                collection,
            ]);
            if let Some(key) = key {
                segments.push(key);
            }
        }

        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(key) = &self.config.api_key {
            req = req.query(&[("key", key)]);
        }
        if let Some(token) = &self.config.bearer_token {
            req = req.bearer_auth(token);
        }

        req
    }
}

#[derive(Deserialize)]
struct ListResp {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RawDocument {
    /// Full resource name, ending in the document key
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorResp {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turn non-2xx responses into errors, using Google's error message where we can find one.
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResp>(&text) {
        Ok(e) => e.error.message,
        Err(_) if text.is_empty() => status.canonical_reason().unwrap_or("").to_string(),
        Err(_) => text,
    };

    Err(StoreError::Status {
        code: status.as_u16(),
        message,
    })
}

async fn parse<T: for<'a> Deserialize<'a>>(resp: Response) -> Result<T> {
    if log::log_enabled!(log::Level::Debug) {
        let s = resp.text().await?;
        debug!("response: {}", s);
        Ok(serde_json::from_str(&s)?)
    } else {
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str) -> Result<Vec<Document>> {
        let url = self.url(collection, None)?;
        let mut docs = vec![];
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .request(Method::GET, url.clone())
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }

            let page: ListResp = parse(check(req.send().await?).await?).await?;
            docs.extend(page.documents.into_iter().map(|d| {
                let key = d.name.rsplit('/').next().unwrap_or_default().to_string();
                Document::new(key, decode_fields(d.fields))
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("listed {} documents from {}", docs.len(), collection);
        Ok(docs)
    }

    async fn set(&self, collection: &str, key: &str, body: Map<String, Value>) -> Result<()> {
        // PATCH without an update mask replaces the whole document, creating it if needed
        let url = self.url(collection, Some(key))?;
        let req = self
            .request(Method::PATCH, url)
            .json(&json!({ "fields": encode_fields(body) }));

        check(req.send().await?).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let url = self.url(collection, Some(key))?;
        match check(self.request(Method::DELETE, url).send().await?).await {
            Ok(_) => Ok(()),
            Err(StoreError::Status { code: 404, .. }) => Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

/// Convert plain JSON fields to Firestore's typed representation
pub fn encode_fields(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(k, v)| (k, encode_value(v)))
        .collect()
}

fn encode_value(v: Value) -> Value {
    match v {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // 64-bit integers go over the wire as strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(vs) => json!({
            "arrayValue": { "values": vs.into_iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

/// Convert Firestore's typed fields back to plain JSON
pub fn decode_fields(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(k, v)| (k, decode_value(v)))
        .collect()
}

fn decode_value(v: Value) -> Value {
    let Value::Object(typed) = v else {
        return v;
    };
    let Some((kind, inner)) = typed.into_iter().next() else {
        return Value::Null;
    };

    match (kind.as_str(), inner) {
        ("nullValue", _) => Value::Null,
        ("integerValue", Value::String(s)) => s
            .parse::<i64>()
            .map(|i| Value::Number(i.into()))
            .unwrap_or(Value::String(s)),
        ("doubleValue", Value::String(s)) => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::String(s)),
        ("arrayValue", Value::Object(mut arr)) => match arr.remove("values") {
            Some(Value::Array(vs)) => Value::Array(vs.into_iter().map(decode_value).collect()),
            _ => Value::Array(vec![]),
        },
        ("mapValue", Value::Object(mut map)) => match map.remove("fields") {
            Some(Value::Object(fields)) => Value::Object(decode_fields(fields)),
            _ => Value::Object(Map::new()),
        },
        // strings, booleans, and anything we don't model (timestamps, references, bytes...)
        (_, inner) => inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn as_map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_encode_course_fields() {
        let encoded = encode_fields(as_map(json!({
            "courseID": "abc",
            "courseName": "Algebra",
        })));

        assert_eq!(
            Value::Object(encoded),
            json!({
                "courseID": { "stringValue": "abc" },
                "courseName": { "stringValue": "Algebra" },
            })
        );
    }

    #[test]
    fn test_encode_nested() {
        let encoded = encode_fields(as_map(json!({
            "n": 3,
            "f": 1.5,
            "tags": ["a", null],
            "meta": { "ok": true },
        })));

        assert_eq!(
            Value::Object(encoded),
            json!({
                "n": { "integerValue": "3" },
                "f": { "doubleValue": 1.5 },
                "tags": { "arrayValue": { "values": [
                    { "stringValue": "a" },
                    { "nullValue": null },
                ] } },
                "meta": { "mapValue": { "fields": { "ok": { "booleanValue": true } } } },
            })
        );
    }

    #[test]
    fn test_decode_reverses_encode() {
        let plain = json!({
            "courseName": "Algebra",
            "n": -12,
            "tags": ["a", 2, false],
            "meta": { "inner": { "x": null } },
        });

        assert_eq!(
            Value::Object(decode_fields(encode_fields(as_map(plain.clone())))),
            plain
        );
    }

    #[test]
    fn test_decode_unmodelled_kinds() {
        let decoded = decode_fields(as_map(json!({
            "at": { "timestampValue": "2024-01-01T00:00:00Z" },
            "empty": { "arrayValue": {} },
            "bad": {},
        })));

        assert_eq!(
            Value::Object(decoded),
            json!({
                "at": "2024-01-01T00:00:00Z",
                "empty": [],
                "bad": null,
            })
        );
    }

    #[test]
    fn test_document_urls() {
        let store = FirestoreStore::new(FirestoreConfig::new("my-project")).unwrap();

        assert_eq!(
            store.url("Courses", None).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/my-project/databases/(default)/documents/Courses"
        );
        assert_eq!(
            store.url("Courses", Some("a b")).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/my-project/databases/(default)/documents/Courses/a%20b"
        );
    }

    #[test]
    fn test_emulator_url() {
        let mut config = FirestoreConfig::new("demo");
        config.emulator_host = Some("localhost:8080".into());
        let store = FirestoreStore::new(config).unwrap();

        assert_eq!(
            store.url("Courses", Some("k")).unwrap().as_str(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents/Courses/k"
        );
    }
}
