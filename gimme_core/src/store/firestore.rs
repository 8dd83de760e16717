use super::error::{self, Error, ErrorResp};
use super::SnippetStore;
use crate::snippet::{Lookup, Snippet};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

/// The public Firestore endpoint. Point `endpoint` at an emulator (e.g.
/// `http://localhost:8080`) to develop without touching a real project.
pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";

/// Where snippets live unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "snippets";

/// Client for a Firestore-compatible document store, speaking the v1 REST API.
#[derive(Debug, Clone)]
pub struct Client {
    /// Shared HTTP client, so that connections can be reused across calls.
    http: reqwest::Client,

    /// Protocol and host, e.g. `https://firestore.googleapis.com`.
    endpoint: String,

    /// The project the database belongs to.
    project_id: String,

    /// The collection snippets are kept in.
    collection: String,

    /// Web API key, sent along with every request if present.
    api_key: Option<String>,
}

impl Client {
    /// Construct a new client for the default collection.
    pub fn new(http: reqwest::Client, endpoint: String, project_id: String) -> Self {
        Self {
            http,
            endpoint,
            project_id,
            collection: DEFAULT_COLLECTION.to_owned(),
            api_key: None,
        }
    }

    /// Use a different collection.
    #[must_use]
    pub fn with_collection(mut self, collection: String) -> Self {
        self.collection = collection;
        self
    }

    /// Authenticate requests with an API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Build the URL of the document for a reference code. The key always
    /// lands in a single path segment.
    ///
    /// ## Errors
    ///
    /// - `Error::InvalidKey` if the store can't address this key
    /// - `Error::UrlParse` if the endpoint is not a valid base URL
    pub fn document_url(&self, key: &str) -> error::Result<Url> {
        if !is_addressable(key) {
            return Err(Error::InvalidKey(key.to_owned()));
        }

        let mut url = Url::parse(&self.endpoint)?;

        url.path_segments_mut()
            .map_err(|()| Error::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                self.collection.as_str(),
                key,
            ]);

        if let Some(api_key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", api_key);
        }

        Ok(url)
    }

    /// Turn a non-success response into an error, using the store's own
    /// message when it sends one.
    async fn error_from(resp: reqwest::Response) -> Error {
        let status = resp.status();

        let message = if status.is_client_error() || status.is_server_error() {
            match resp.json::<ErrorResp>().await {
                Ok(body) => body.error.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_owned(),
            }
        } else {
            // the store is not supposed to issue redirects or informational
            // responses.
            "unexpected response".to_owned()
        };

        tracing::warn!(%status, reason = %message, "store returned an error");

        Error::Service { status, message }
    }
}

impl SnippetStore for Client {
    #[tracing::instrument(skip(self, code), fields(code_len = code.len()))]
    async fn write(&self, key: &str, code: &str) -> error::Result<()> {
        let url = self.document_url(key)?;
        let body = Document::from(Snippet::new(code.to_owned()));

        tracing::debug!(%url, "writing snippet");

        // PATCH without an update mask replaces every field, creating the
        // document if it doesn't exist yet.
        let resp = self.http.patch(url).json(&body).send().await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(resp).await)
        }
    }

    #[tracing::instrument(skip(self))]
    async fn read(&self, key: &str) -> error::Result<Lookup> {
        let url = self.document_url(key)?;

        tracing::debug!(%url, "reading snippet");

        let resp = self.http.get(url).send().await?;

        match resp.status() {
            status if status.is_success() => {
                let doc: Document = resp.json().await?;
                Ok(Lookup::Found(doc.into()))
            }
            StatusCode::NOT_FOUND => {
                // a missing project or database is a 404 too, and that's
                // not the same as nobody having shared anything yet.
                let err = Self::error_from(resp).await;

                if is_missing_document(&err) {
                    Ok(Lookup::NotFound)
                } else {
                    Err(err)
                }
            }
            _ => Err(Self::error_from(resp).await),
        }
    }
}

/// Can this key be used as a Firestore document ID? IDs can't contain
/// slashes, can't be `.` or `..`, and can't look like `__reserved__`.
fn is_addressable(key: &str) -> bool {
    !(key.is_empty()
        || key.contains('/')
        || key == "."
        || key == ".."
        || (key.len() >= 4 && key.starts_with("__") && key.ends_with("__")))
}

/// Is this the store telling us the document itself doesn't exist? Firestore
/// says `Document "projects/.../snippets/key" not found.` for those.
fn is_missing_document(err: &Error) -> bool {
    matches!(
        err,
        Error::Service { status: StatusCode::NOT_FOUND, message } if message.starts_with("Document ")
    )
}

/// A snippet as Firestore encodes it: every field wrapped in a typed value.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Full resource name. Only ever set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The fields we care about
    pub fields: Fields,
}

/// The fields of a snippet document.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Fields {
    /// The shared code
    pub code: StringValue,

    /// When it was shared
    pub created_at: TimestampValue,
}

/// A Firestore string value.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StringValue {
    /// The string
    pub string_value: String,
}

/// A Firestore timestamp value.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimestampValue {
    /// The timestamp, as RFC 3339 on the wire
    pub timestamp_value: DateTime<Utc>,
}

impl From<Snippet> for Document {
    fn from(snippet: Snippet) -> Self {
        Self {
            name: None,
            fields: Fields {
                code: StringValue {
                    string_value: snippet.code,
                },
                created_at: TimestampValue {
                    timestamp_value: snippet.created_at,
                },
            },
        }
    }
}

impl From<Document> for Snippet {
    fn from(doc: Document) -> Self {
        Snippet::at(
            doc.fields.code.string_value,
            doc.fields.created_at.timestamp_value,
        )
    }
}
