//! # Job description document.
//!
//! ```json
//! { "jobs": [ { "type": "log", "count": 2, "args": { "message": "hi" } } ] }
//! ```
//!
//! - `type` names a job in the [`JobRegistry`](crate::JobRegistry);
//! - `count` is the requested number of replicas; anything below 1 means 1;
//! - `args` is passed to every replica untouched (`null` when absent).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a [`JobList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Job type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Requested replica count, as written in the document.
    #[serde(default)]
    pub count: i64,
    /// Opaque arguments.
    #[serde(default)]
    pub args: Value,
}

impl JobDescriptor {
    /// Descriptor with `null` arguments.
    pub fn new(kind: impl Into<String>, count: i64) -> Self {
        Self {
            kind: kind.into(),
            count,
            args: Value::Null,
        }
    }

    /// Returns a new descriptor with updated arguments.
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    /// Number of workers to launch: `count` normalized to at least 1.
    ///
    /// ```
    /// use jobvisor::JobDescriptor;
    ///
    /// assert_eq!(JobDescriptor::new("a", 3).replicas(), 3);
    /// assert_eq!(JobDescriptor::new("a", 0).replicas(), 1);
    /// assert_eq!(JobDescriptor::new("a", -7).replicas(), 1);
    /// ```
    pub fn replicas(&self) -> usize {
        usize::try_from(self.count.max(1)).unwrap_or(usize::MAX)
    }
}

/// Ordered list of descriptors acquired in one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobList {
    /// Descriptors in dispatch order.
    #[serde(default)]
    pub jobs: Vec<JobDescriptor>,
}

impl JobList {
    /// Wraps descriptors.
    pub fn new(jobs: Vec<JobDescriptor>) -> Self {
        Self { jobs }
    }

    /// Decodes a JSON document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// True if there are no descriptors.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Descriptors in dispatch order.
    pub fn iter(&self) -> std::slice::Iter<'_, JobDescriptor> {
        self.jobs.iter()
    }
}

impl FromIterator<JobDescriptor> for JobList {
    fn from_iter<I: IntoIterator<Item = JobDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a JobList {
    type Item = &'a JobDescriptor;
    type IntoIter = std::slice::Iter<'a, JobDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_document_with_defaults() {
        let doc = br#"{"jobs":[{"type":"log","count":2,"args":{"message":"hi"}},{"type":"idle"}]}"#;
        let list = JobList::from_slice(doc).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.jobs[0].kind, "log");
        assert_eq!(list.jobs[0].replicas(), 2);
        assert_eq!(list.jobs[0].args, json!({ "message": "hi" }));
        assert_eq!(list.jobs[1].count, 0);
        assert_eq!(list.jobs[1].replicas(), 1);
        assert!(list.jobs[1].args.is_null());
    }

    #[test]
    fn missing_jobs_key_is_empty_list() {
        let list = JobList::from_slice(b"{}").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn missing_type_is_rejected() {
        assert!(JobList::from_slice(br#"{"jobs":[{"count":1}]}"#).is_err());
    }

    #[test]
    fn preserves_order() {
        let list: JobList = ["c", "a", "b"]
            .into_iter()
            .map(|k| JobDescriptor::new(k, 1))
            .collect();
        let kinds: Vec<&str> = list.iter().map(|d| d.kind.as_str()).collect();
        assert_eq!(kinds, vec!["c", "a", "b"]);
    }
}
