pub mod client;
pub mod files;
pub mod link;
pub mod rate_limit;
pub mod transport;

pub use client::{Endpoints, GitHubClient, RepoRef, RequestCategory};
pub use files::{count_lines, extract_file_data, FileData};
pub use link::parse_next_link;
pub use rate_limit::RateLimitState;
pub use transport::{HttpResponse, Transport, UreqTransport};
