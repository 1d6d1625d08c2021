use serde::{Deserialize, Serialize};
use twig_types::{ObjectId, Timestamp};

use crate::error::ObjectError;
use crate::object::{ObjectKind, Tree};

/// An immutable snapshot: a tree sealed with author, message, and time.
///
/// The commit owns its tree and only hands out `&Tree`, so a sealed tree can
/// never be mutated. The id covers the tree id, author, message, and time;
/// changing any of them changes the id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CommitRecord", try_from = "CommitRecord")]
pub struct Commit {
    id: ObjectId,
    tree: Tree,
    author: String,
    message: String,
    time: Timestamp,
}

impl Commit {
    /// Seal `tree` at the given time.
    pub fn new(
        tree: Tree,
        author: impl Into<String>,
        message: impl Into<String>,
        time: Timestamp,
    ) -> Self {
        let author = author.into();
        let message = message.into();
        let id = compute_id(&tree, &author, &message, &time);
        Self {
            id,
            tree,
            author,
            message,
            time,
        }
    }

    /// Seal `tree` at the current wall-clock time.
    pub fn now(tree: Tree, author: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(tree, author, message, Timestamp::now())
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }
}

fn compute_id(tree: &Tree, author: &str, message: &str, time: &Timestamp) -> ObjectId {
    let tree_id = tree.id();
    ObjectKind::Commit.hasher().hash_fields([
        &tree_id.as_bytes()[..],
        author.as_bytes(),
        message.as_bytes(),
        &time.physical_ms.to_le_bytes()[..],
        &time.logical.to_le_bytes()[..],
    ])
}

/// Wire shape of a commit. The id travels with the record and is checked on
/// the way back in.
#[derive(Serialize, Deserialize)]
struct CommitRecord {
    id: ObjectId,
    tree: Tree,
    author: String,
    message: String,
    time: Timestamp,
}

impl From<Commit> for CommitRecord {
    fn from(commit: Commit) -> Self {
        Self {
            id: commit.id,
            tree: commit.tree,
            author: commit.author,
            message: commit.message,
            time: commit.time,
        }
    }
}

impl TryFrom<CommitRecord> for Commit {
    type Error = ObjectError;

    fn try_from(record: CommitRecord) -> Result<Self, Self::Error> {
        let commit = Commit::new(record.tree, record.author, record.message, record.time);
        if commit.id != record.id {
            return Err(ObjectError::HashMismatch {
                claimed: record.id,
                computed: commit.id,
            });
        }
        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Blob, Entry};

    fn tree() -> Tree {
        Tree::from_entries([("file.txt", Blob::from("Hello, world!"))])
    }

    fn base() -> Commit {
        Commit::new(tree(), "A", "Initial commit", Timestamp::new(1_000, 0))
    }

    #[test]
    fn identical_fields_identical_id() {
        assert_eq!(base().id(), base().id());
        assert_eq!(base(), base());
    }

    #[test]
    fn every_field_contributes_to_the_id() {
        let time = Timestamp::new(1_000, 0);
        let other_tree = Tree::from_entries([("file.txt", Blob::from("Goodbye"))]);

        let variants = [
            Commit::new(other_tree, "A", "Initial commit", time),
            Commit::new(tree(), "B", "Initial commit", time),
            Commit::new(tree(), "A", "Second commit", time),
            Commit::new(tree(), "A", "Initial commit", Timestamp::new(1_001, 0)),
            Commit::new(tree(), "A", "Initial commit", time.successor()),
        ];
        for variant in &variants {
            assert_ne!(variant.id(), base().id(), "{variant:?}");
        }
    }

    #[test]
    fn author_message_boundary_is_significant() {
        let time = Timestamp::new(5, 0);
        let a = Commit::new(tree(), "ab", "c", time);
        let b = Commit::new(tree(), "a", "bc", time);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn commit_id_differs_from_tree_id() {
        let commit = base();
        assert_ne!(commit.id(), commit.tree().id());
    }

    #[test]
    fn accessors_expose_sealed_fields() {
        let commit = base();
        assert_eq!(commit.author(), "A");
        assert_eq!(commit.message(), "Initial commit");
        assert_eq!(commit.time(), Timestamp::new(1_000, 0));
        let entry = commit.tree().get("file.txt").unwrap();
        assert_eq!(entry.kind(), ObjectKind::Blob);
        assert_eq!(entry.id(), Blob::from("Hello, world!").id());
    }

    #[test]
    fn now_stamps_current_time() {
        let before = Timestamp::now();
        let commit = Commit::now(tree(), "A", "msg");
        assert!(!commit.time().is_before(&before));
    }

    #[test]
    fn nested_tree_commit() {
        let inner = tree();
        let outer = Tree::from_entries([("dir", Entry::from(inner.clone()))]);
        let commit = Commit::new(outer, "A", "nested", Timestamp::zero());
        let sub = commit.tree().get("dir").and_then(Entry::as_tree).unwrap();
        assert_eq!(sub, &inner);
    }

    #[test]
    fn serde_json_keeps_commit_identity() {
        let commit = base();
        let json = serde_json::to_string(&commit).unwrap();
        let decoded: Commit = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, commit);
        assert_eq!(decoded.id(), commit.id());
    }

    #[test]
    fn tampered_record_is_rejected() {
        let mut value = serde_json::to_value(base()).unwrap();
        value["message"] = serde_json::Value::String("rewritten".into());
        let err = serde_json::from_value::<Commit>(value).unwrap_err();
        assert!(err.to_string().contains("hash mismatch"), "{err}");
    }
}
