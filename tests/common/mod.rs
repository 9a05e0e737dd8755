#![allow(dead_code)]

use repo_stats::error::{Result, StatsError};
use repo_stats::github::{Endpoints, GitHubClient, HttpResponse, RepoRef, Transport};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

pub const API: &str = "https://api.test";
pub const RAW: &str = "https://raw.test";

#[derive(Clone)]
pub struct Recorded {
    pub url: String,
    pub at: Instant,
    pub authorization: Option<String>,
}

/// Serves canned responses by exact URL; anything unknown is a 404.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    routes: Rc<RefCell<HashMap<String, HttpResponse>>>,
    calls: Rc<RefCell<Vec<Recorded>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: &str, body: &str, headers: &[(&str, &str)]) -> &Self {
        let response = HttpResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
            body: body.as_bytes().to_vec(),
        };
        self.routes.borrow_mut().insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.borrow().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.url.clone()).collect()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.calls.borrow_mut().push(Recorded {
            url: url.to_string(),
            at: Instant::now(),
            authorization: headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("authorization"))
                .map(|(_, v)| v.to_string()),
        });
        self.routes
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| StatsError::HttpStatus {
                code: 404,
                url: url.to_string(),
            })
    }
}

pub fn client(transport: &ScriptedTransport) -> GitHubClient<ScriptedTransport> {
    GitHubClient::with_transport(
        transport.clone(),
        RepoRef::new("octo", "demo"),
        "secret",
        Endpoints::new(API, RAW),
    )
}

pub fn repo_url(suffix: &str) -> String {
    format!("{API}/repos/octo/demo/{suffix}")
}
