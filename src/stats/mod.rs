pub mod filter;
pub mod rank;

pub use filter::IgnoreRules;
pub use rank::top_n;

use crate::error::{Result, StatsError};
use crate::model::{
    CommitSummary, FileRecord, PullRequest, RankEntry, Rankings, ReportOutput, Totals,
    SCHEMA_VERSION,
};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Committer identity GitHub uses for merges made through the web UI.
pub const AUTOMATED_COMMITTER: &str = "GitHub";
pub const DEFAULT_BOT_LOGINS: &[&str] = &["dependabot[bot]"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Empty,
    PullRequests,
    Commits,
    Files,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Empty => "nothing",
            Phase::PullRequests => "pull requests",
            Phase::Commits => "commits",
            Phase::Files => "files",
        }
    }
}

pub type Attribution = HashMap<String, u64>;

/// Aggregates are built in three ordered phases: pull requests, then
/// commits, then file maps. A phase may be replayed once reached.
#[derive(Debug, Clone)]
pub struct Stats {
    pub owner: String,
    pub repo: String,
    rules: IgnoreRules,
    bot_logins: HashSet<String>,
    phase: Phase,
    num_prs: usize,
    num_commits: usize,
    num_merges: usize,
    total_lines_of_code: u64,
    pr_attribution: Attribution,
    commit_attribution: Attribution,
    file_urls: BTreeMap<String, String>,
    file_sizes: HashMap<String, u64>,
    file_changes: HashMap<String, u64>,
}

impl Stats {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, rules: IgnoreRules) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            rules,
            bot_logins: DEFAULT_BOT_LOGINS.iter().map(|s| s.to_string()).collect(),
            phase: Phase::Empty,
            num_prs: 0,
            num_commits: 0,
            num_merges: 0,
            total_lines_of_code: 0,
            pr_attribution: HashMap::new(),
            commit_attribution: HashMap::new(),
            file_urls: BTreeMap::new(),
            file_sizes: HashMap::new(),
            file_changes: HashMap::new(),
        }
    }

    pub fn with_bot_logins<I, S>(mut self, logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bot_logins.extend(logins.into_iter().map(Into::into));
        self
    }

    fn require(&self, phase: Phase, requires: Phase) -> Result<()> {
        if self.phase < requires {
            return Err(StatsError::OutOfOrder {
                phase: phase.name(),
                requires: requires.name(),
            });
        }
        Ok(())
    }

    fn advance(&mut self, phase: Phase) {
        self.phase = self.phase.max(phase);
    }

    pub fn set_prs(&mut self, prs: &[PullRequest]) {
        self.num_prs = prs.len();
        self.pr_attribution.clear();
        for user in prs.iter().filter_map(|pr| pr.user.as_ref()) {
            if user.is_bot() || self.bot_logins.contains(&user.login) {
                continue;
            }
            *self.pr_attribution.entry(user.login.clone()).or_insert(0) += 1;
        }
        self.advance(Phase::PullRequests);
    }

    pub fn set_commits(&mut self, commits: &[CommitSummary]) -> Result<()> {
        self.require(Phase::Commits, Phase::PullRequests)?;
        self.num_commits = commits.len();
        self.num_merges = commits.iter().filter(|c| c.is_merge()).count();
        self.commit_attribution.clear();
        for name in commits.iter().filter_map(CommitSummary::committer_name) {
            if name == AUTOMATED_COMMITTER {
                continue;
            }
            *self.commit_attribution.entry(name.to_string()).or_insert(0) += 1;
        }
        self.advance(Phase::Commits);
        Ok(())
    }

    pub fn set_file_urls(&mut self, urls: &BTreeMap<String, String>) -> Result<()> {
        self.require(Phase::Files, Phase::Commits)?;
        self.file_urls = urls
            .iter()
            .filter(|(path, _)| !self.rules.excludes(path))
            .map(|(p, u)| (p.clone(), u.clone()))
            .collect();
        self.advance(Phase::Files);
        Ok(())
    }

    pub fn set_file_sizes(&mut self, sizes: &HashMap<String, u64>) -> Result<()> {
        self.require(Phase::Files, Phase::Commits)?;
        self.file_sizes = self.rules.filter_files(sizes);
        self.total_lines_of_code = self.file_sizes.values().sum();
        self.advance(Phase::Files);
        Ok(())
    }

    pub fn set_file_changes(&mut self, changes: &HashMap<String, u64>) -> Result<()> {
        self.require(Phase::Files, Phase::Commits)?;
        self.file_changes = self.rules.filter_files(changes);
        self.advance(Phase::Files);
        Ok(())
    }

    pub fn num_prs(&self) -> usize {
        self.num_prs
    }

    pub fn num_commits(&self) -> usize {
        self.num_commits
    }

    pub fn num_merges(&self) -> usize {
        self.num_merges
    }

    pub fn total_lines_of_code(&self) -> u64 {
        self.total_lines_of_code
    }

    pub fn pr_attribution(&self) -> &Attribution {
        &self.pr_attribution
    }

    pub fn commit_attribution(&self) -> &Attribution {
        &self.commit_attribution
    }

    pub fn file_urls(&self) -> &BTreeMap<String, String> {
        &self.file_urls
    }

    pub fn top_prs(&self, n: usize) -> Vec<RankEntry> {
        top_n(&self.pr_attribution, n)
    }

    pub fn top_commits(&self, n: usize) -> Vec<RankEntry> {
        top_n(&self.commit_attribution, n)
    }

    pub fn largest_files(&self, n: usize) -> Vec<RankEntry> {
        top_n(&self.file_sizes, n)
    }

    pub fn most_changed_files(&self, n: usize) -> Vec<RankEntry> {
        top_n(&self.file_changes, n)
    }

    /// Union of sized and changed paths, sorted by path. Paths only seen
    /// in history carry no size.
    pub fn file_records(&self) -> Vec<FileRecord> {
        let paths: BTreeSet<&String> = self
            .file_sizes
            .keys()
            .chain(self.file_changes.keys())
            .collect();
        paths
            .into_iter()
            .map(|path| FileRecord {
                path: path.clone(),
                size_in_lines: self.file_sizes.get(path).copied(),
                changed_lines: self.file_changes.get(path).copied().unwrap_or(0),
            })
            .collect()
    }

    pub fn report(
        &self,
        branch: &str,
        top: usize,
        requests_made: u64,
        rate_limit_remaining: u32,
    ) -> ReportOutput {
        ReportOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            branch: branch.to_string(),
            totals: Totals {
                lines_of_code: self.total_lines_of_code,
                commits: self.num_commits,
                merges: self.num_merges,
                pull_requests: self.num_prs,
                requests_made,
                rate_limit_remaining,
            },
            rankings: Rankings {
                pull_request_authors: self.top_prs(top),
                commit_authors: self.top_commits(top),
                largest_files: self.largest_files(top),
                most_changed_files: self.most_changed_files(top),
            },
            files: self.file_records(),
        }
    }
}
