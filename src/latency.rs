//! Confirmation-latency measurement from transaction logs

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

const RECEIVED_PREFIX: &str = "Received trans hash";
const CONFIRMED_PREFIX: &str = "Confirmed trans hash";

/// Confirmation-latency statistics extracted from a set of node logs.
///
/// Delays are reported in the timestamp unit of the logs themselves; the
/// nodes log microseconds since the epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySummary {
    /// Number of node logs the summary was computed over.
    pub nodes: usize,
    /// Transactions confirmed by at least one node.
    pub confirmed: usize,
    /// Transactions confirmed by every node.
    pub fully_confirmed: usize,
    /// Mean receive-to-confirm delay over fully confirmed transactions.
    pub mean: f64,
    /// Population standard deviation of the same delays.
    pub std_dev: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum LatencyError {
    #[error("no log files were given")]
    NoLogsGiven,
    #[error("no transaction was confirmed by every node")]
    NoFullyConfirmed,
    #[error("could not read log file {}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed log line {line} in {}: {reason}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        reason: &'static str,
    },
}

/// Receive and confirm times observed by one node, keyed by transaction
/// hash. Repeated lines for a hash keep the latest timestamp.
#[derive(Debug, Default)]
struct NodeObservations {
    received: HashMap<String, i64>,
    confirmed: HashMap<String, i64>,
}

impl LatencySummary {
    /// Computes the summary over one log file per observing node.
    ///
    /// A node observes a transaction's latency when its log carries both a
    /// `Received trans hash ...` and a `Confirmed trans hash ...` line for
    /// the hash; the delay is the difference of the two trailing
    /// timestamps. Only transactions observed by every node enter the mean
    /// and standard deviation.
    pub fn from_logs<I, P>(logs: I) -> Result<Self, LatencyError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut nodes = Vec::new();
        for path in logs {
            let path = path.as_ref();
            let file =
                File::open(path).map_err(|source| LatencyError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;

            nodes.push(parse_log(BufReader::new(file), path)?);
        }

        Self::from_observations(nodes)
    }

    fn from_observations(
        nodes: Vec<NodeObservations>,
    ) -> Result<Self, LatencyError> {
        use LatencyError::*;

        if nodes.is_empty() {
            return Err(NoLogsGiven);
        }

        let mut delays: HashMap<&str, Vec<i64>> = HashMap::new();
        for node in &nodes {
            for (hash, receive) in &node.received {
                if let Some(confirm) = node.confirmed.get(hash) {
                    delays
                        .entry(hash.as_str())
                        .or_default()
                        .push(confirm - receive);
                }
            }
        }

        let confirmed = delays.len();
        let complete: Vec<f64> = delays
            .values()
            .filter(|node_delays| node_delays.len() == nodes.len())
            .flat_map(|node_delays| node_delays.iter().map(|&d| d as f64))
            .collect();

        if complete.is_empty() {
            return Err(NoFullyConfirmed);
        }

        let fully_confirmed = complete.len() / nodes.len();
        let mean = complete.iter().sum::<f64>() / complete.len() as f64;
        let variance = complete
            .iter()
            .map(|delay| (delay - mean).powi(2))
            .sum::<f64>()
            / complete.len() as f64;

        Ok(Self {
            nodes: nodes.len(),
            confirmed,
            fully_confirmed,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

/// Extracts the receive and confirm timestamps from one node's log. Lines
/// that match neither prefix are ignored; matching lines carry the
/// transaction hash as their fourth field and the timestamp as their last.
fn parse_log<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<NodeObservations, LatencyError> {
    use LatencyError::*;

    let mut node = NodeObservations::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let times = if line.starts_with(RECEIVED_PREFIX) {
            &mut node.received
        } else if line.starts_with(CONFIRMED_PREFIX) {
            &mut node.confirmed
        } else {
            continue;
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 5 {
            return Err(MalformedLine {
                path: path.to_path_buf(),
                line: index + 1,
                reason: "expected at least 5 fields",
            });
        }

        let timestamp = tokens[tokens.len() - 1].parse::<i64>().map_err(
            |_| MalformedLine {
                path: path.to_path_buf(),
                line: index + 1,
                reason: "timestamp is not an integer",
            },
        )?;

        times.insert(tokens[3].to_string(), timestamp);
    }

    Ok(node)
}
