use std::time::Duration;

use dashboard_core::{CandidateMatchRecord, CandidateStatus, Job, JobDraft, ParseOutcome, ParsedProfile};
use dashboard_logging::{dash_debug, dash_info, dash_warn, mask_email};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::normalize::{normalize_jobs, normalize_matches};
use crate::ApiError;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
const RESUME_FIELD: &str = "resume";
const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub matches_timeout: Duration,
    pub upload_timeout: Duration,
    pub jobs_limit: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            matches_timeout: Duration::from_secs(15),
            upload_timeout: Duration::from_secs(30),
            jobs_limit: 50,
        }
    }
}

/// Backend operations used by the dashboard.
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_matches(&self) -> Result<Vec<CandidateMatchRecord>, ApiError>;

    async fn update_status(&self, email: &str, status: CandidateStatus) -> Result<(), ApiError>;

    /// `status` is passed through as the server-side filter; `None` lists all.
    async fn fetch_jobs(&self, status: Option<&str>) -> Result<Vec<Job>, ApiError>;

    async fn create_job(&self, draft: &JobDraft) -> Result<(), ApiError>;

    async fn update_job(&self, id: &str, draft: &JobDraft) -> Result<(), ApiError>;

    async fn delete_job(&self, id: &str) -> Result<(), ApiError>;

    async fn parse_resume(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<ParseOutcome, ApiError>;
}

#[derive(Serialize)]
struct StatusUpdate<'a> {
    email: &'a str,
    status: CandidateStatus,
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::InvalidRequest(format!("{}: {err}", settings.base_url)))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::InvalidRequest(err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        endpoint(&self.base, segments)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, Value), ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|err| {
                dash_warn!("Response from server ({status}) is not JSON: {err}");
                Value::Null
            })
        };
        Ok((status, value))
    }

    /// Sends `request` and fails on any non-success status.
    async fn send_checked(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let (status, body) = self.send(request).await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(server_error(status, &body))
        }
    }

    async fn write_job(&self, method: Method, url: Url, draft: &JobDraft) -> Result<(), ApiError> {
        dash_info!("{method} {url} ({})", draft.title);
        self.send_checked(self.client.request(method, url).json(draft))
            .await
            .map(|_| ())
    }
}

#[async_trait::async_trait]
impl DashboardApi for ReqwestApi {
    async fn fetch_matches(&self) -> Result<Vec<CandidateMatchRecord>, ApiError> {
        let url = self.endpoint(&["resume_matches"])?;
        dash_debug!("GET {url}");
        let body = self
            .send_checked(self.client.get(url).timeout(self.settings.matches_timeout))
            .await?;
        let records = normalize_matches(body);
        dash_info!("Fetched {} candidate records", records.len());
        Ok(records)
    }

    async fn update_status(&self, email: &str, status: CandidateStatus) -> Result<(), ApiError> {
        let url = self.endpoint(&["update_status"])?;
        dash_info!("Setting status of {} to {status}", mask_email(email));
        self.send_checked(
            self.client
                .post(url)
                .json(&StatusUpdate { email, status }),
        )
        .await
        .map(|_| ())
    }

    async fn fetch_jobs(&self, status: Option<&str>) -> Result<Vec<Job>, ApiError> {
        let mut url = self.endpoint(&["jobs"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(status) = status {
                query.append_pair("status", status);
            }
            query.append_pair("limit", &self.settings.jobs_limit.to_string());
        }
        dash_debug!("GET {url}");
        let body = self.send_checked(self.client.get(url)).await?;
        let jobs = normalize_jobs(body);
        dash_info!("Fetched {} jobs", jobs.len());
        Ok(jobs)
    }

    async fn create_job(&self, draft: &JobDraft) -> Result<(), ApiError> {
        let url = self.endpoint(&["add_job"])?;
        self.write_job(Method::POST, url, draft).await
    }

    async fn update_job(&self, id: &str, draft: &JobDraft) -> Result<(), ApiError> {
        let url = self.endpoint(&["jobs", id])?;
        self.write_job(Method::PUT, url, draft).await
    }

    async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["jobs", id])?;
        dash_info!("DELETE {url}");
        self.send_checked(self.client.delete(url)).await.map(|_| ())
    }

    async fn parse_resume(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ParseOutcome, ApiError> {
        let url = self.endpoint(&["parse_resume"])?;
        dash_info!("Uploading {file_name} ({} bytes)", bytes.len());
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(PDF_MIME)
            .map_err(|err| ApiError::InvalidRequest(err.to_string()))?;
        let form = Form::new().part(RESUME_FIELD, part);
        let (status, body) = self
            .send(
                self.client
                    .post(url)
                    .multipart(form)
                    .timeout(self.settings.upload_timeout),
            )
            .await?;

        if status.is_success() {
            return Ok(ParseOutcome {
                profile: decode_profile(&body).unwrap_or_default(),
                partial: false,
                details: Vec::new(),
            });
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            if let Some(profile) = decode_profile(&body) {
                let details = detail_list(body.get("details"));
                dash_warn!("Resume parsed with {} warnings", details.len());
                return Ok(ParseOutcome {
                    profile,
                    partial: true,
                    details,
                });
            }
        }
        Err(server_error(status, &body))
    }
}

/// Browser-openable URL of the stored resume for `email`.
pub fn resume_file_url(base_url: &str, email: &str) -> Result<Url, ApiError> {
    let base = Url::parse(base_url)
        .map_err(|err| ApiError::InvalidRequest(format!("{base_url}: {err}")))?;
    endpoint(&base, &["resume_file", email])
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidRequest(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn decode_profile(body: &Value) -> Option<ParsedProfile> {
    match body.get("profile") {
        None | Some(Value::Null) => None,
        Some(profile) => match serde_json::from_value(profile.clone()) {
            Ok(profile) => Some(profile),
            Err(err) => {
                dash_warn!("Ignoring malformed profile: {err}");
                None
            }
        },
    }
}

fn detail_list(details: Option<&Value>) -> Vec<String> {
    match details {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(text)) if !text.is_empty() => vec![text.clone()],
        _ => Vec::new(),
    }
}

/// The message comes from the body's `error` field when present, otherwise
/// it is the numeric status code.
fn server_error(status: StatusCode, body: &Value) -> ApiError {
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string());
    dash_warn!("Server answered {status}: {message}");
    ApiError::Server {
        status: status.as_u16(),
        message,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    if err.is_builder() {
        return ApiError::InvalidRequest(err.to_string());
    }
    ApiError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_escapes_path_segments() {
        let base = Url::parse("http://localhost:5000/api/").unwrap();
        let url = endpoint(&base, &["jobs", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/jobs/a%2Fb%20c");
    }

    #[test]
    fn resume_url_keeps_email_readable() {
        let url = resume_file_url("http://localhost:5000", "jane.doe@example.com").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/resume_file/jane.doe@example.com"
        );
        assert!(resume_file_url("not a url", "a@x.com").is_err());
    }

    #[test]
    fn server_error_prefers_body_message() {
        let err = server_error(StatusCode::NOT_FOUND, &json!({ "error": "Job not found" }));
        assert_eq!(
            err,
            ApiError::Server {
                status: 404,
                message: "Job not found".to_string()
            }
        );
        let err = server_error(StatusCode::INTERNAL_SERVER_ERROR, &Value::Null);
        assert_eq!(
            err,
            ApiError::Server {
                status: 500,
                message: "500".to_string()
            }
        );
    }

    #[test]
    fn details_accept_list_or_text() {
        assert_eq!(
            detail_list(Some(&json!(["phone missing", null, 3]))),
            vec!["phone missing".to_string(), "3".to_string()]
        );
        assert_eq!(
            detail_list(Some(&json!("no education"))),
            vec!["no education".to_string()]
        );
        assert!(detail_list(None).is_empty());
    }
}
