use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use twig_crypto::ContentHasher;
use twig_types::ObjectId;

/// The kind of an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Raw content (file contents, arbitrary data).
    Blob,
    /// Named entries mapping to blobs or nested trees.
    Tree,
    /// A sealed tree plus authorship metadata.
    Commit,
}

impl ObjectKind {
    /// Lowercase name, also used as the entry tag inside tree digests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    /// The domain-separated hasher for objects of this kind.
    pub fn hasher(&self) -> &'static ContentHasher {
        match self {
            Self::Blob => &ContentHasher::BLOB,
            Self::Tree => &ContentHasher::TREE,
            Self::Commit => &ContentHasher::COMMIT,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object (analogous to git blob).
///
/// The id is computed once, when the blob is built. Deserialized blobs hash
/// lazily on first access.
#[derive(Clone, Serialize, Deserialize)]
pub struct Blob {
    data: Vec<u8>,
    #[serde(skip)]
    id: OnceLock<ObjectId>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let id = OnceLock::from(ObjectKind::Blob.hasher().hash(&data));
        Self { data, id }
    }

    /// Content-addressed id of this blob.
    pub fn id(&self) -> ObjectId {
        *self
            .id
            .get_or_init(|| ObjectKind::Blob.hasher().hash(&self.data))
    }

    /// The payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The payload as UTF-8, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl PartialEq for Blob {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Blob {}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("id", &self.id())
            .field("len", &self.data.len())
            .finish()
    }
}

impl From<&str> for Blob {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}

impl From<String> for Blob {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Blob {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// The value stored under a name in a tree: a blob or a nested tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "object", rename_all = "snake_case")]
pub enum Entry {
    /// A file.
    Blob(Blob),
    /// A sub-directory.
    Subtree(Tree),
}

impl Entry {
    /// Id of the referenced object.
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Blob(blob) => blob.id(),
            Self::Subtree(tree) => tree.id(),
        }
    }

    /// Kind of the referenced object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Subtree(_) => ObjectKind::Tree,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Self::Blob(blob) => Some(blob),
            Self::Subtree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Blob(_) => None,
            Self::Subtree(tree) => Some(tree),
        }
    }
}

impl From<Blob> for Entry {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Tree> for Entry {
    fn from(tree: Tree) -> Self {
        Self::Subtree(tree)
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// Directory object (analogous to git tree).
///
/// Entries are kept sorted by name so iteration and hashing are
/// deterministic. The id covers every entry's name, kind, and child id, so
/// it changes whenever anything below it changes. Nested trees are never
/// handed out mutably, which keeps a cached parent id valid.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Tree {
    entries: BTreeMap<String, Entry>,
    /// Cached id (invalidated on changes).
    #[serde(skip)]
    id: OnceLock<ObjectId>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree from `(name, entry)` pairs. Later duplicates win.
    pub fn from_entries<I, K, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Entry>,
    {
        entries.into_iter().collect()
    }

    /// Content-addressed id of this tree.
    pub fn id(&self) -> ObjectId {
        *self.id.get_or_init(|| self.compute_id())
    }

    fn compute_id(&self) -> ObjectId {
        let child_ids: Vec<ObjectId> = self.entries.values().map(Entry::id).collect();
        let fields = self
            .entries
            .iter()
            .zip(&child_ids)
            .flat_map(|((name, entry), id)| {
                [
                    entry.kind().as_str().as_bytes(),
                    name.as_bytes(),
                    &id.as_bytes()[..],
                ]
            });
        ObjectKind::Tree.hasher().hash_fields(fields)
    }

    /// Insert or overwrite an entry. Returns the replaced entry, if any.
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Option<Entry> {
        self.id.take();
        self.entries.insert(name.into(), entry.into())
    }

    /// Merge entries into this tree, overwriting existing names.
    pub fn merge<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Entry)>,
    {
        self.id.take();
        self.entries.extend(entries);
    }

    /// Returns `true` if every given `(name, entry)` pair is already present
    /// with an equal value. Vacuously `true` for no pairs.
    pub fn contains_all<'a, I>(&self, entries: I) -> bool
    where
        I: IntoIterator<Item = (&'a String, &'a Entry)>,
    {
        entries
            .into_iter()
            .all(|(name, entry)| self.entries.get(name) == Some(entry))
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Returns `true` if an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entries in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Entry> {
        self.entries.iter()
    }

    /// Entry names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Tree {}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("id", &self.id())
            .field("entries", &self.entries)
            .finish()
    }
}

impl<K, E> FromIterator<(K, E)> for Tree
where
    K: Into<String>,
    E: Into<Entry>,
{
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, entry)| (name.into(), entry.into()))
                .collect(),
            id: OnceLock::new(),
        }
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Entry);
    type IntoIter = btree_map::Iter<'a, String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn nested(leaf: &str) -> Tree {
        let inner = Tree::from_entries([("deep.txt", Blob::from(leaf))]);
        let middle = Tree::from_entries([
            ("inner", Entry::from(inner)),
            ("sibling.txt", Entry::from(Blob::from("unchanged"))),
        ]);
        Tree::from_entries([
            ("middle", Entry::from(middle)),
            ("README", Entry::from(Blob::from("top"))),
        ])
    }

    #[test]
    fn equal_blobs_share_an_id() {
        let blob1 = Blob::from("Hello, world!");
        let blob2 = Blob::new(b"Hello, world!".to_vec());
        assert_eq!(blob1, blob2);
        assert_eq!(blob1.id(), blob2.id());
        assert_eq!(blob1.id(), ContentHasher::BLOB.hash(b"Hello, world!"));
    }

    #[test]
    fn blob_text_and_len() {
        let blob = Blob::from("abc");
        assert_eq!(blob.text(), Some("abc"));
        assert_eq!(blob.len(), 3);
        assert!(!blob.is_empty());
        assert_eq!(Blob::new(vec![0xff, 0xfe]).text(), None);
    }

    #[test]
    fn trees_with_equal_content_hash_equal() {
        let tree1 = Tree::from_entries([("file.txt", Blob::from("Hello, world!"))]);
        let mut tree2 = Tree::new();
        tree2.insert("file.txt", Blob::from("Hello, world!"));
        assert_eq!(tree1, tree2);
        assert_eq!(tree1.id(), tree2.id());
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = Tree::from_entries([("a", Blob::from("1")), ("b", Blob::from("2"))]);
        let b = Tree::from_entries([("b", Blob::from("2")), ("a", Blob::from("1"))]);
        assert_eq!(a.id(), b.id());
        assert_eq!(a.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn deep_leaf_change_changes_root_id() {
        assert_ne!(nested("v1").id(), nested("v2").id());
        assert_eq!(nested("v1").id(), nested("v1").id());
    }

    #[test]
    fn name_change_changes_id() {
        let a = Tree::from_entries([("a.txt", Blob::from("x"))]);
        let b = Tree::from_entries([("b.txt", Blob::from("x"))]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn entry_kind_is_part_of_the_id() {
        let as_blob = Tree::from_entries([("x", Entry::from(Blob::from("")))]);
        let as_tree = Tree::from_entries([("x", Entry::from(Tree::new()))]);
        assert_ne!(as_blob.id(), as_tree.id());
    }

    #[test]
    fn id_cache_invalidated_on_insert() {
        let mut tree = Tree::from_entries([("a.txt", Blob::from("a"))]);
        let before = tree.id();
        tree.insert("b.txt", Blob::from("b"));
        let after = tree.id();
        assert_ne!(before, after);
        assert_eq!(
            after,
            Tree::from_entries([("a.txt", Blob::from("a")), ("b.txt", Blob::from("b"))]).id()
        );
    }

    #[test]
    fn id_cache_invalidated_on_merge() {
        let mut tree = Tree::from_entries([("a.txt", Blob::from("a"))]);
        let before = tree.id();
        tree.merge([("a.txt".to_string(), Entry::from(Blob::from("changed")))]);
        assert_ne!(before, tree.id());
    }

    #[test]
    fn insert_overwrites_existing_name() {
        let mut tree = Tree::new();
        assert!(tree.insert("f", Blob::from("old")).is_none());
        let replaced = tree.insert("f", Blob::from("new")).unwrap();
        assert_eq!(replaced.as_blob().unwrap().text(), Some("old"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn contains_all_requires_key_and_value() {
        let tree = Tree::from_entries([("a.txt", Blob::from("a"))]);

        let same: BTreeMap<String, Entry> =
            [("a.txt".to_string(), Entry::from(Blob::from("a")))].into();
        let other_value: BTreeMap<String, Entry> =
            [("a.txt".to_string(), Entry::from(Blob::from("b")))].into();
        let other_key: BTreeMap<String, Entry> =
            [("copy.txt".to_string(), Entry::from(Blob::from("a")))].into();

        assert!(tree.contains_all(&same));
        assert!(!tree.contains_all(&other_value));
        assert!(!tree.contains_all(&other_key));
        assert!(tree.contains_all(&BTreeMap::<String, Entry>::new()));
    }

    #[test]
    fn entry_accessors() {
        let blob = Entry::from(Blob::from("x"));
        let tree = Entry::from(Tree::new());
        assert_eq!(blob.kind(), ObjectKind::Blob);
        assert_eq!(tree.kind(), ObjectKind::Tree);
        assert!(blob.as_blob().is_some() && blob.as_tree().is_none());
        assert!(tree.as_tree().is_some() && tree.as_blob().is_none());
        assert_eq!(tree.id(), Tree::new().id());
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(!tree.id().is_null());
    }

    #[test]
    fn serde_json_keeps_tree_id() {
        let tree = nested("serde");
        let json = serde_json::to_string(&tree).unwrap();
        let decoded: Tree = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, tree);
        assert_eq!(decoded.id(), tree.id());
    }

    #[test]
    fn object_kind_display() {
        assert_eq!(format!("{}", ObjectKind::Blob), "blob");
        assert_eq!(format!("{}", ObjectKind::Tree), "tree");
        assert_eq!(format!("{}", ObjectKind::Commit), "commit");
    }

    proptest! {
        #[test]
        fn single_leaf_change_is_visible_at_the_root(
            a in "[a-z]{0,16}",
            b in "[a-z]{0,16}",
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(nested(&a).id(), nested(&b).id());
        }

        #[test]
        fn rebuilt_trees_hash_identically(
            files in proptest::collection::btree_map("[a-z]{1,8}", "[ -~]{0,32}", 0..8),
        ) {
            let t1 = Tree::from_entries(files.iter().map(|(k, v)| (k.clone(), Blob::from(v.as_str()))));
            let t2 = Tree::from_entries(files.iter().rev().map(|(k, v)| (k.clone(), Blob::from(v.as_str()))));
            prop_assert_eq!(t1.id(), t2.id());
        }
    }
}
