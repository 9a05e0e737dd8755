use crate::error::Result;
use crate::github::client::GitHubClient;
use crate::github::transport::Transport;
use crate::model::CommitSummary;
use std::collections::{BTreeMap, HashMap};

/// Per-path maps gathered from the API, before any ignore rules apply.
#[derive(Debug, Clone, Default)]
pub struct FileData {
    pub urls: BTreeMap<String, String>,
    pub sizes: HashMap<String, u64>,
    pub changes: HashMap<String, u64>,
}

/// Newline count, plus one for an unterminated last line. Empty input
/// therefore counts as one line.
pub fn count_lines(content: &[u8]) -> u64 {
    let newlines = content.iter().filter(|&&b| b == b'\n').count() as u64;
    if content.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    }
}

/// One detail call per commit; `changes` summed per path.
pub fn file_changes<T: Transport>(
    client: &mut GitHubClient<T>,
    commits: &[CommitSummary],
) -> Result<HashMap<String, u64>> {
    let mut changes: HashMap<String, u64> = HashMap::new();

    client
        .progress()
        .begin("Reading commit details", commits.len() as u64);
    for commit in commits {
        let detail = client.commit_detail(commit)?;
        for file in detail.files {
            *changes.entry(file.filename).or_insert(0) += file.changes;
        }
        client.progress().advance();
    }
    client.progress().finish("Commit details read");

    tracing::info!(
        commits = commits.len(),
        files = changes.len(),
        "Collected file changes"
    );
    Ok(changes)
}

/// Blob paths of the branch head's recursive tree.
pub fn default_branch_files<T: Transport>(
    client: &mut GitHubClient<T>,
    branch: &str,
) -> Result<Vec<String>> {
    let head = client.branch(branch)?;
    let tree = client.tree(&head.commit.sha)?;
    if tree.truncated {
        tracing::warn!(
            sha = %head.commit.sha,
            "Tree listing truncated by the API, some files will be missing"
        );
    }
    Ok(tree
        .tree
        .into_iter()
        .filter(|entry| entry.is_blob())
        .map(|entry| entry.path)
        .collect())
}

pub fn file_urls<T: Transport>(
    client: &GitHubClient<T>,
    branch: &str,
    paths: Vec<String>,
) -> BTreeMap<String, String> {
    paths
        .into_iter()
        .map(|path| {
            let url = client.raw_url(branch, &path);
            (path, url)
        })
        .collect()
}

/// One raw-content GET per file, used only to count its lines.
pub fn file_sizes<T: Transport>(
    client: &mut GitHubClient<T>,
    urls: &BTreeMap<String, String>,
) -> Result<HashMap<String, u64>> {
    let mut sizes = HashMap::with_capacity(urls.len());

    client.progress().begin("Counting lines", urls.len() as u64);
    for (path, url) in urls {
        let content = client.raw_file(url)?;
        sizes.insert(path.clone(), count_lines(&content));
        client.progress().advance();
    }
    client.progress().finish("Lines counted");

    Ok(sizes)
}

pub fn extract_file_data<T: Transport>(
    client: &mut GitHubClient<T>,
    commits: &[CommitSummary],
    branch: &str,
) -> Result<FileData> {
    let changes = file_changes(client, commits)?;
    let paths = default_branch_files(client, branch)?;
    let urls = file_urls(client, branch, paths);
    let sizes = file_sizes(client, &urls)?;
    tracing::info!(files = sizes.len(), branch, "Sized default branch files");
    Ok(FileData {
        urls,
        sizes,
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_terminated_and_unterminated_lines() {
        assert_eq!(count_lines(b"a\nb\nc"), 3);
        assert_eq!(count_lines(b"a\nb\nc\n"), 3);
        assert_eq!(count_lines(b"\n"), 1);
        assert_eq!(count_lines(b"\n\n"), 2);
    }

    #[test]
    fn empty_input_counts_as_one_line() {
        assert_eq!(count_lines(b""), 1);
    }

    #[test]
    fn non_utf8_content_is_counted() {
        assert_eq!(count_lines(&[0xff, b'\n', 0xfe]), 2);
    }
}
