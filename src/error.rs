use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("HTTP status {code} from {url}")]
    HttpStatus { code: u16, url: String },
    #[error("Parse error in {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed header {name}: {value:?}")]
    MalformedHeader { name: String, value: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot set {phase} before {requires}")]
    OutOfOrder {
        phase: &'static str,
        requires: &'static str,
    },
}

impl StatsError {
    pub fn network(url: impl Into<String>, err: ureq::Error) -> Self {
        StatsError::Network {
            url: url.into(),
            source: Box::new(err),
        }
    }

    pub fn parse(what: impl Into<String>, err: serde_json::Error) -> Self {
        StatsError::Parse {
            what: what.into(),
            source: err,
        }
    }

    /// True for failures decoding a payload or header.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            StatsError::Parse { .. } | StatsError::MalformedHeader { .. }
        )
    }
}
