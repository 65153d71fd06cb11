use std::time::Duration;

use reqwest::StatusCode;

use roster_core::{Person, PersonId, RemoteError, RemoteSource};

/// HTTP remote source.
///
/// `GET <base>` returns the whole collection, `GET <base>/<id>` a single
/// person. A 404 on the single lookup is `NotFound`; every other failure,
/// including non-success statuses, is `Network`.
pub struct HttpRemoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Build a source whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn person_url(&self, id: PersonId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

impl RemoteSource for HttpRemoteSource {
    async fn fetch_all(&self) -> Result<Vec<Person>, RemoteError> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RemoteError::Network(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let people: Vec<Person> = response
            .json()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(people)
    }

    async fn fetch_one(&self, id: PersonId) -> Result<Person, RemoteError> {
        let response = self
            .client
            .get(self.person_url(id))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(id));
        }

        if !response.status().is_success() {
            return Err(RemoteError::Network(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let person: Person = response
            .json()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(person)
    }
}
