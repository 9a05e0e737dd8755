use crate::error::{Result, StatsError};
use crate::github::link::parse_next_link;
use crate::github::rate_limit::RateLimitState;
use crate::github::transport::{HttpResponse, Transport, UreqTransport};
use crate::model::{Branch, CommitDetail, CommitSummary, PullRequest, Tree};
use crate::progress::{Progress, Silent};
use serde::de::DeserializeOwned;
use std::fmt;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const PAGE_SIZE: u32 = 100;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestCategory {
    RateLimit,
    PullRequests,
    Commits,
    IndividualCommit,
    Branch,
    Tree,
    File,
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestCategory::RateLimit => "Rate Limit",
            RequestCategory::PullRequests => "Pull Requests",
            RequestCategory::Commits => "Commits",
            RequestCategory::IndividualCommit => "Individual Commit",
            RequestCategory::Branch => "Branch",
            RequestCategory::Tree => "Tree",
            RequestCategory::File => "File",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api: String,
    pub raw: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_URL.to_string(),
            raw: DEFAULT_RAW_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(api: &str, raw: &str) -> Self {
        Self {
            api: api.trim_end_matches('/').to_string(),
            raw: raw.trim_end_matches('/').to_string(),
        }
    }
}

/// One authenticated session against a single repository. Owns the
/// rate-limit state; every call goes through [`GitHubClient::request`].
pub struct GitHubClient<T: Transport = UreqTransport> {
    transport: T,
    repo: RepoRef,
    endpoints: Endpoints,
    token: String,
    user_agent: String,
    rate_limit: RateLimitState,
    requests_made: u64,
    progress: Box<dyn Progress>,
}

impl GitHubClient<UreqTransport> {
    /// Build a client on the real network and seed the rate-limit state.
    pub fn connect(
        repo: RepoRef,
        token: impl Into<String>,
        endpoints: Endpoints,
        progress: Box<dyn Progress>,
    ) -> Result<Self> {
        let mut client = Self::with_transport(UreqTransport::new(), repo, token, endpoints)
            .with_progress(progress);
        client.refresh_rate_limit()?;
        Ok(client)
    }
}

impl<T: Transport> GitHubClient<T> {
    pub fn with_transport(
        transport: T,
        repo: RepoRef,
        token: impl Into<String>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            transport,
            repo,
            endpoints,
            token: token.into(),
            user_agent: format!("repo-stats/{VERSION}"),
            rate_limit: RateLimitState::default(),
            requests_made: 0,
            progress: Box::new(Silent),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_rate_limit(mut self, state: RateLimitState) -> Self {
        self.rate_limit = state;
        self
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn rate_limit(&self) -> &RateLimitState {
        &self.rate_limit
    }

    pub fn requests_made(&self) -> u64 {
        self.requests_made
    }

    pub fn progress(&self) -> &dyn Progress {
        self.progress.as_ref()
    }

    /// Issue a GET, waiting first if the quota is exhausted, then fold the
    /// response headers into the rate-limit state.
    pub fn request(&mut self, category: RequestCategory, url: &str) -> Result<HttpResponse> {
        self.progress
            .on_request(category, self.rate_limit.remaining, url);

        if self.rate_limit.is_exhausted() {
            let wait = self.rate_limit.wait_time(chrono::Utc::now());
            if !wait.is_zero() {
                self.progress.on_wait(wait);
            }
            self.rate_limit.wait_if_exhausted();
        }

        tracing::debug!(
            category = %category,
            remaining = self.rate_limit.remaining,
            url,
            "GET"
        );

        let auth = format!("Bearer {}", self.token);
        let headers = [
            ("Accept", "application/vnd.github+json"),
            ("Authorization", auth.as_str()),
            ("X-GitHub-Api-Version", "2022-11-28"),
            ("User-Agent", self.user_agent.as_str()),
        ];
        let response = self.transport.get(url, &headers)?;
        self.requests_made += 1;
        tracing::trace!(
            status = response.status,
            bytes = response.body.len(),
            "Response received"
        );
        self.rate_limit.update(&response)?;
        Ok(response)
    }

    pub fn get_json<D: DeserializeOwned>(
        &mut self,
        category: RequestCategory,
        url: &str,
    ) -> Result<D> {
        let response = self.request(category, url)?;
        decode(&response.body, url)
    }

    /// Follow `Link: rel="next"` until exhausted, concatenating pages in
    /// fetch order. Any failing page aborts the whole listing.
    pub fn get_paginated<D: DeserializeOwned>(
        &mut self,
        category: RequestCategory,
        url: &str,
    ) -> Result<Vec<D>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());
        let mut pages = 0usize;

        while let Some(page_url) = next.take() {
            let response = self.request(category, &page_url)?;
            let page: Vec<D> = decode(&response.body, &page_url)?;
            items.extend(page);
            pages += 1;
            next = response.header("link").and_then(parse_next_link);
        }

        tracing::debug!(category = %category, pages, items = items.len(), "Pagination complete");
        Ok(items)
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.endpoints.api, self.repo.owner, self.repo.name, suffix
        )
    }

    pub fn refresh_rate_limit(&mut self) -> Result<()> {
        let url = format!("{}/rate_limit", self.endpoints.api);
        self.request(RequestCategory::RateLimit, &url)?;
        Ok(())
    }

    pub fn pull_requests(&mut self) -> Result<Vec<PullRequest>> {
        let url = self.repo_url(&format!("pulls?state=all&per_page={PAGE_SIZE}"));
        self.get_paginated(RequestCategory::PullRequests, &url)
    }

    pub fn commits(&mut self) -> Result<Vec<CommitSummary>> {
        let url = self.repo_url(&format!("commits?per_page={PAGE_SIZE}"));
        self.get_paginated(RequestCategory::Commits, &url)
    }

    pub fn commit_detail(&mut self, commit: &CommitSummary) -> Result<CommitDetail> {
        let url = if commit.url.is_empty() {
            self.repo_url(&format!("commits/{}", commit.sha))
        } else {
            commit.url.clone()
        };
        self.get_json(RequestCategory::IndividualCommit, &url)
    }

    pub fn branch(&mut self, branch: &str) -> Result<Branch> {
        let url = self.repo_url(&format!("branches/{branch}"));
        self.get_json(RequestCategory::Branch, &url)
    }

    pub fn tree(&mut self, sha: &str) -> Result<Tree> {
        let url = self.repo_url(&format!("git/trees/{sha}?recursive=1"));
        self.get_json(RequestCategory::Tree, &url)
    }

    pub fn raw_url(&self, branch: &str, path: &str) -> String {
        let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
        format!(
            "{}/{}/{}/{}/{}",
            self.endpoints.raw,
            self.repo.owner,
            self.repo.name,
            branch,
            encoded.join("/")
        )
    }

    pub fn raw_file(&mut self, url: &str) -> Result<Vec<u8>> {
        Ok(self.request(RequestCategory::File, url)?.body)
    }
}

fn decode<D: DeserializeOwned>(body: &[u8], url: &str) -> Result<D> {
    serde_json::from_slice(body).map_err(|e| StatsError::parse(format!("response from {url}"), e))
}
