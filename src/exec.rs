use crate::github::{extract_file_data, Endpoints, GitHubClient, RepoRef, Transport};
use crate::model::ReportOutput;
use crate::progress::{ConsoleProgress, Progress, Silent};
use crate::report::{output_json, output_report, Palette};
use crate::stats::{IgnoreRules, Stats};
use anyhow::Context;

pub struct RunOptions {
    pub repo: RepoRef,
    pub token: String,
    pub branch: String,
    pub top: usize,
    pub rules: IgnoreRules,
    pub bot_logins: Vec<String>,
    pub endpoints: Endpoints,
    pub json: bool,
    pub quiet: bool,
    pub palette: Palette,
}

pub fn exec(options: RunOptions) -> anyhow::Result<()> {
    let progress: Box<dyn Progress> = if options.quiet || options.json {
        Box::new(Silent)
    } else {
        Box::new(ConsoleProgress::new(options.palette.clone()))
    };

    let mut client = GitHubClient::connect(
        options.repo.clone(),
        options.token.clone(),
        options.endpoints.clone(),
        progress,
    )
    .context("connect: failed while reading the initial rate limit")?;

    let report = collect(&mut client, &options)?;

    // Nothing reaches stdout until every fetch has succeeded.
    let mut stdout = std::io::stdout().lock();
    if options.json {
        output_json(&mut stdout, &report)?;
    } else {
        output_report(&mut stdout, &report, &options.palette)?;
    }
    Ok(())
}

/// Fetch everything for one repository and aggregate it into a report.
pub fn collect<T: Transport>(
    client: &mut GitHubClient<T>,
    options: &RunOptions,
) -> anyhow::Result<ReportOutput> {
    let mut stats = Stats::new(
        options.repo.owner.clone(),
        options.repo.name.clone(),
        options.rules.clone(),
    )
    .with_bot_logins(options.bot_logins.iter().cloned());
    tracing::info!(repo = %client.repo(), branch = %options.branch, "Collecting statistics");

    let prs = client
        .pull_requests()
        .context("pull_requests: failed while paginating pull requests")?;
    stats.set_prs(&prs);
    tracing::info!(
        pull_requests = prs.len(),
        requests = client.requests_made(),
        "Pull requests retrieved"
    );

    let commits = client
        .commits()
        .context("commits: failed while paginating commits")?;
    stats
        .set_commits(&commits)
        .context("set_commits: failed while attributing commits")?;
    tracing::info!(
        commits = commits.len(),
        requests = client.requests_made(),
        "Commits retrieved"
    );

    let files = extract_file_data(client, &commits, &options.branch)
        .context("extract_file_data: failed while reading commit and file data")?;
    stats
        .set_file_urls(&files.urls)
        .context("set_file_urls: failed while storing file URLs")?;
    stats
        .set_file_sizes(&files.sizes)
        .context("set_file_sizes: failed while filtering file sizes")?;
    stats
        .set_file_changes(&files.changes)
        .context("set_file_changes: failed while filtering file changes")?;
    tracing::info!(
        lines_of_code = stats.total_lines_of_code(),
        requests = client.requests_made(),
        "File data retrieved"
    );

    Ok(stats.report(
        &options.branch,
        options.top,
        client.requests_made(),
        client.rate_limit().remaining,
    ))
}
