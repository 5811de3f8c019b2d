//! Class label set loading.

use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, SnapError};

/// Ordered, immutable list of class names.
///
/// Position `i` names the class scored at position `i` of the model output.
/// Cloning is cheap; the names are shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Arc<[String]>,
}

impl LabelSet {
    /// Load labels from a file with one label per line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            SnapError::ModelLoad(format!("Failed to open labels {}: {}", path.display(), e))
        })?;
        let labels = Self::from_reader(std::io::BufReader::new(file))?;

        debug!("Loaded {} labels from {}", labels.len(), path.display());
        Ok(labels)
    }

    /// Read labels line by line.
    ///
    /// Empty lines are kept so indices stay aligned with the model output.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let labels = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        Ok(Self::from_iter(labels))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Index of the first label equal to `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl FromStr for LabelSet {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        Ok(text.lines().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_lines() {
        let labels: LabelSet = "background\ntench\ngoldfish\n".parse().unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.get(1), Some("tench"));
        assert_eq!(labels.get(3), None);
        assert_eq!(labels.position("goldfish"), Some(2));
    }

    #[test]
    fn test_keeps_empty_lines() {
        let labels: LabelSet = "cat\n\ndog".parse().unwrap();
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec!["cat", "", "dog"]);
    }

    #[test]
    fn test_crlf_reader() {
        let labels = LabelSet::from_reader("cat\r\ndog\r\n".as_bytes()).unwrap();
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec!["cat", "dog"]);
    }

    #[test]
    fn test_empty_resource() {
        let labels: LabelSet = "".parse().unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cat").unwrap();
        writeln!(file, "dog").unwrap();

        let labels = LabelSet::from_file(file.path()).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(0), Some("cat"));
    }

    #[test]
    fn test_missing_file() {
        let err = LabelSet::from_file(Path::new("/nonexistent/labels.txt")).unwrap_err();
        assert!(matches!(err, SnapError::ModelLoad(_)));
    }
}
