use crate::config::{resolve_token, split_list, value_or_prompt};
use crate::exec::RunOptions;
use crate::github::client::{DEFAULT_API_URL, DEFAULT_RAW_URL};
use crate::github::{Endpoints, RepoRef};
use crate::report::Palette;
use crate::stats::IgnoreRules;
use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repo-stats")]
#[command(about = "Pull request, commit and file statistics for a GitHub repository")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Repository owner (prompted for if omitted)")]
    pub owner: Option<String>,

    #[arg(long, help = "Repository name (prompted for if omitted)")]
    pub repo: Option<String>,

    #[arg(long, help = "Env file holding GITHUB_TOKEN", default_value = ".env")]
    pub env_file: PathBuf,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "API token, skips the env file"
    )]
    pub token: Option<String>,

    #[arg(long, help = "Branch used as the file snapshot", default_value = "main")]
    pub branch: String,

    #[arg(long, help = "Entries per ranking", default_value_t = 5)]
    pub top: usize,

    #[arg(
        long = "ignore-ext",
        value_name = "EXT",
        help = "File extensions to leave out of file rankings"
    )]
    pub ignore_ext: Vec<String>,

    #[arg(
        long = "ignore-file",
        value_name = "NAME",
        help = "File names to leave out of file rankings"
    )]
    pub ignore_file: Vec<String>,

    #[arg(
        long = "ignore-dir",
        value_name = "DIR",
        help = "Directories to leave out of file rankings"
    )]
    pub ignore_dir: Vec<String>,

    #[arg(
        long = "bot",
        value_name = "LOGIN",
        help = "Extra bot logins excluded from pull request attribution"
    )]
    pub bots: Vec<String>,

    #[arg(long, help = "API root", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, help = "Raw content root", default_value = DEFAULT_RAW_URL)]
    pub raw_url: String,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(short, long, help = "Hide per-request progress")]
    pub quiet: bool,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let options = self.into_options().context("Failed to resolve configuration")?;
        crate::exec::exec(options)
    }

    fn into_options(self) -> Result<RunOptions> {
        let term = Term::stderr();
        let owner = value_or_prompt(self.owner, "Enter GitHub owner", &term)?;
        let name = value_or_prompt(self.repo, "Enter GitHub repository", &term)?;
        let token = resolve_token(self.token.as_deref(), &self.env_file)?;

        let rules = IgnoreRules::new(
            split_list(&self.ignore_ext),
            split_list(&self.ignore_file),
            split_list(&self.ignore_dir),
        );

        Ok(RunOptions {
            repo: RepoRef::new(owner, name),
            token,
            branch: self.branch,
            top: self.top,
            rules,
            bot_logins: split_list(&self.bots),
            endpoints: Endpoints::new(&self.api_url, &self.raw_url),
            json: self.json,
            quiet: self.quiet,
            palette: Palette::for_terminal(self.no_color),
        })
    }
}
