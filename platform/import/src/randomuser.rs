//! Reqwest-backed client for the randomuser.me API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::{Candidate, ImportError, ImportSource, check_count};

pub const DEFAULT_BASE_URL: &str = "https://randomuser.me/api/";
pub const DEFAULT_NATIONALITY: &str = "es";
const INCLUDED_FIELDS: &str = "name,email,phone,dob,picture,login";

#[derive(Debug, Deserialize)]
struct RandomUserResponse {
    #[serde(default)]
    results: Vec<RandomUserDto>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RandomUserDto {
    name: NameDto,
    email: String,
    phone: String,
    dob: DobDto,
    picture: PictureDto,
    login: LoginDto,
}

#[derive(Debug, Deserialize)]
struct NameDto {
    first: String,
    last: String,
}

#[derive(Debug, Deserialize)]
struct DobDto {
    age: i32,
}

#[derive(Debug, Deserialize)]
struct PictureDto {
    medium: String,
}

#[derive(Debug, Deserialize)]
struct LoginDto {
    uuid: String,
}

impl From<RandomUserDto> for Candidate {
    fn from(dto: RandomUserDto) -> Self {
        Self {
            source_id: dto.login.uuid,
            first_name: dto.name.first,
            last_name: dto.name.last,
            age: dto.dob.age,
            email: dto.email,
            phone: dto.phone,
            photo_url: dto.picture.medium,
        }
    }
}

/// Import source that performs one GET per fetch against a randomuser.me
/// compatible endpoint.
#[derive(Clone, Debug)]
pub struct RandomUserClient {
    client: Client,
    base_url: Url,
    nationality: String,
}

impl RandomUserClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        nationality: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hr-suite/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            nationality: nationality.into(),
        })
    }
}

#[async_trait]
impl ImportSource for RandomUserClient {
    #[instrument(
        name = "hr.import.randomuser.fetch",
        skip(self),
        fields(base_url = %self.base_url)
    )]
    async fn fetch(&self, count: i64) -> Result<Vec<Candidate>, ImportError> {
        check_count(count)?;
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("results", count.to_string().as_str()),
                ("nat", self.nationality.as_str()),
                ("inc", INCLUDED_FIELDS),
            ])
            .send()
            .await
            .map_err(|err| ImportError::upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::upstream(format!("HTTP {status}")));
        }

        let body: RandomUserResponse = response
            .json()
            .await
            .map_err(|err| ImportError::upstream(format!("malformed response: {err}")))?;
        if let Some(message) = body.error {
            return Err(ImportError::upstream(message));
        }

        debug!(received = body.results.len(), "randomuser response decoded");
        Ok(body
            .results
            .into_iter()
            .take(count as usize)
            .map(Candidate::from)
            .collect())
    }
}
