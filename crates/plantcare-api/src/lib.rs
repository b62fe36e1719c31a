// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use plantcare_app::{DeleteAck, InsertAck, PlantId, PlantRecord, PlantStore, UpdateAck};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Blocking client for the plant storage API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        if timeout.is_zero() {
            bail!("api.timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn plants_url(&self, id: Option<&PlantId>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| anyhow!("api.base_url {} cannot hold a path", self.base_url))?;
            segments.pop_if_empty().push("plants");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), "plant API request failed");
            return Err(clean_error_response(status, &body));
        }
        Ok(response)
    }
}

impl PlantStore for Client {
    fn list_plants(&mut self, limit: Option<usize>) -> Result<Vec<PlantRecord>> {
        let mut url = self.plants_url(None)?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        debug!(%url, "listing plants");

        let response = self.send(self.http.get(url))?;
        let mut plants: Vec<PlantRecord> = response.json().context("decode plant list")?;
        if let Some(limit) = limit {
            plants.truncate(limit);
        }
        Ok(plants)
    }

    fn get_plant(&mut self, id: &PlantId) -> Result<Option<PlantRecord>> {
        let url = self.plants_url(Some(id))?;
        debug!(%url, "fetching plant");

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let body = response.text().context("read plant response")?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body).with_context(|| format!("decode plant {id}"))
    }

    fn create_plant(&mut self, record: &PlantRecord) -> Result<InsertAck> {
        let url = self.plants_url(None)?;
        debug!(%url, plant = %record.plant_name, "creating plant");

        let response = self.send(self.http.post(url).json(record))?;
        response.json().context("decode create acknowledgment")
    }

    fn update_plant(&mut self, id: &PlantId, record: &PlantRecord) -> Result<UpdateAck> {
        let url = self.plants_url(Some(id))?;
        debug!(%url, "updating plant");

        // The id travels in the path only.
        let body = PlantRecord {
            id: None,
            ..record.clone()
        };
        let response = self.send(self.http.put(url).json(&body))?;
        response.json().context("decode update acknowledgment")
    }

    fn delete_plant(&mut self, id: &PlantId) -> Result<DeleteAck> {
        let url = self.plants_url(Some(id))?;
        debug!(%url, "deleting plant");

        let response = self.send(self.http.delete(url))?;
        response.json().context("decode delete acknowledgment")
    }
}

/// Validates a configured base URL: absolute, http or https, with a host.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("api.base_url must not be empty -- set it in the config file or PLANTCARE_API_URL");
    }
    let url = Url::parse(trimmed)
        .with_context(|| format!("api.base_url {trimmed:?} is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "api.base_url must use http or https, got {:?} -- fix the URL and retry",
            url.scheme()
        );
    }
    if url.host_str().is_none_or(str::is_empty) {
        bail!("api.base_url {trimmed:?} has no host");
    }
    if url.query().is_some() || url.fragment().is_some() {
        bail!("api.base_url {trimmed:?} must not carry a query or fragment");
    }
    Ok(url)
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach plant API at {} -- check api.base_url and that the server is running ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.error.or(parsed.message)
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') && !body.contains('<') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response, parse_base_url};
    use anyhow::Result;
    use plantcare_app::PlantId;
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn plants_url_appends_to_base_path() -> Result<()> {
        let client = Client::new("https://plants.example.com/api/", Duration::from_secs(1))?;
        assert_eq!(client.base_url(), "https://plants.example.com/api");
        assert_eq!(
            client.plants_url(None)?.as_str(),
            "https://plants.example.com/api/plants"
        );
        assert_eq!(
            client.plants_url(Some(&PlantId::new("64f1 a/b")))?.as_str(),
            "https://plants.example.com/api/plants/64f1%20a%2Fb"
        );
        Ok(())
    }

    #[test]
    fn plants_url_on_bare_host() -> Result<()> {
        let client = Client::new("http://localhost:3000", Duration::from_secs(1))?;
        assert_eq!(
            client.plants_url(Some(&PlantId::new("abc")))?.as_str(),
            "http://localhost:3000/plants/abc"
        );
        Ok(())
    }

    #[test]
    fn base_url_validation() {
        for bad in ["", "   ", "localhost:3000", "ftp://example.com", "http://h/?q=1"] {
            assert!(parse_base_url(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(parse_base_url("https://example.vercel.app").is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let error = Client::new("http://localhost:3000", Duration::ZERO)
            .expect_err("zero timeout should fail");
        assert!(error.to_string().contains("timeout"));
    }

    #[test]
    fn clean_error_prefers_json_error_then_message() {
        let error = clean_error_response(StatusCode::BAD_REQUEST, r#"{"error":"bad id"}"#);
        assert_eq!(error.to_string(), "server error (400): bad id");

        let error = clean_error_response(StatusCode::NOT_FOUND, r#"{"message":"no such plant"}"#);
        assert_eq!(error.to_string(), "server error (404): no such plant");
    }

    #[test]
    fn clean_error_keeps_short_text_and_drops_markup() {
        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(error.to_string(), "server error (502): upstream down");

        let error = clean_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html><body>Internal Server Error</body></html>",
        );
        assert_eq!(error.to_string(), "server returned 500");

        let error = clean_error_response(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(error.to_string(), "server returned 503");
    }
}
