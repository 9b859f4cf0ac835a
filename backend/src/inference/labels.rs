use std::path::{Path, PathBuf};

pub const LABEL_COUNT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("failed to read labels from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("expected {expected} labels, found {actual}")]
    Count { expected: usize, actual: usize },
}

/// Ordered trait names; index `i` names output `i` of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LabelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// One label per line. Blank lines are skipped and a leading numeric
    /// index (`0 Openness`) is dropped.
    pub fn parse(contents: &str) -> Result<Self, LabelError> {
        let labels: Vec<String> = contents
            .lines()
            .map(strip_index)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if labels.len() != LABEL_COUNT {
            return Err(LabelError::Count {
                expected: LABEL_COUNT,
                actual: labels.len(),
            });
        }
        Ok(Self { labels })
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

fn strip_index(line: &str) -> &str {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((index, rest)) if index.chars().all(|c| c.is_ascii_digit()) => rest.trim(),
        _ => line,
    }
}
