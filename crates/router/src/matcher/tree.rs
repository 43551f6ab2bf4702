use super::pattern::{self, Segment, WILDCARD};
use super::Matched;
use crate::error::PatternError;
use crate::request::PathParams;
use std::collections::HashMap;

/// A segment trie mapping patterns to payloads.
///
/// Lookup walks the path one segment at a time, trying a static child first, then the
/// parameter child, then a trailing wildcard, backtracking whenever a branch dead-ends.
/// This makes the most specific pattern win without any explicit ranking.
///
/// Parameter names are not part of a pattern's identity: `/users/:id` and `/users/:name`
/// occupy the same slot, and inserting the second replaces the first.
#[derive(Debug)]
pub struct PathTree<T> {
    root: Node<T>,
}

#[derive(Debug)]
struct Node<T> {
    statics: HashMap<String, Node<T>>,
    param: Option<Box<Node<T>>>,
    leaf: Option<Leaf<T>>,
    wildcard: Option<Leaf<T>>,
}

#[derive(Debug)]
struct Leaf<T> {
    names: Vec<String>,
    payload: T,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self { statics: HashMap::new(), param: None, leaf: None, wildcard: None }
    }
}

impl<T> Default for PathTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathTree<T> {
    pub fn new() -> Self {
        Self { root: Node::default() }
    }

    /// Inserts `payload` under `pattern`, returning the payload it replaced.
    ///
    /// # Errors
    /// Fails when `pattern` has an unnamed parameter or a wildcard before its last segment.
    pub fn insert(&mut self, pattern: &str, payload: T) -> Result<Option<T>, PatternError> {
        let segments = pattern::parse(pattern)?;

        let mut names = Vec::new();
        let mut node = &mut self.root;
        for segment in segments {
            match segment {
                Segment::Static(text) => node = node.statics.entry(text.to_owned()).or_default(),
                Segment::Param(name) => {
                    names.push(name.to_owned());
                    node = &mut **node.param.get_or_insert_with(Box::default);
                }
                // parse() guarantees the wildcard is the last segment
                Segment::Wildcard => {
                    return Ok(node.wildcard.replace(Leaf { names, payload }).map(|leaf| leaf.payload));
                }
            }
        }

        Ok(node.leaf.replace(Leaf { names, payload }).map(|leaf| leaf.payload))
    }

    /// Finds the most specific pattern matching `path`.
    pub fn at(&self, path: &str) -> Option<Matched<'_, T>> {
        let segments = pattern::split_segments(path).collect::<Vec<_>>();
        let mut values = Vec::with_capacity(segments.len());

        let (leaf, rest) = self.root.find(&segments, &mut values)?;

        let mut params = leaf
            .names
            .iter()
            .cloned()
            .zip(values.into_iter().map(str::to_owned))
            .collect::<HashMap<_, _>>();
        if let Some(rest) = rest {
            params.insert(WILDCARD.to_owned(), rest);
        }

        Some(Matched::new(&leaf.payload, PathParams::from(params)))
    }
}

impl<T> Node<T> {
    /// Returns the leaf and, for wildcard leaves, the joined remainder of the path.
    fn find<'t, 'p>(&'t self, segments: &[&'p str], values: &mut Vec<&'p str>) -> Option<(&'t Leaf<T>, Option<String>)> {
        let Some((&head, tail)) = segments.split_first() else {
            return self
                .leaf
                .as_ref()
                .map(|leaf| (leaf, None))
                .or_else(|| self.wildcard.as_ref().map(|leaf| (leaf, Some(String::new()))));
        };

        if let Some(found) = self.statics.get(head).and_then(|child| child.find(tail, values)) {
            return Some(found);
        }

        if let Some(child) = &self.param {
            values.push(head);
            if let Some(found) = child.find(tail, values) {
                return Some(found);
            }
            values.pop();
        }

        self.wildcard.as_ref().map(|leaf| (leaf, Some(segments.join("/"))))
    }
}

#[cfg(test)]
mod tests {
    use super::PathTree;

    fn tree(patterns: &[&'static str]) -> PathTree<&'static str> {
        let mut tree = PathTree::new();
        for pattern in patterns {
            tree.insert(pattern, *pattern).unwrap();
        }
        tree
    }

    #[test]
    fn test_named_params() {
        let tree = tree(&["/foo/:a/:b"]);
        let matched = tree.at("/foo/aa/bb").unwrap();

        assert_eq!(*matched.payload(), "/foo/:a/:b");
        assert_eq!(matched.params().len(), 2);
        assert_eq!(matched.params().get("a"), Some("aa"));
        assert_eq!(matched.params().get("b"), Some("bb"));
    }

    #[test]
    fn test_param_and_wildcard() {
        let tree = tree(&["/foo/:bar/*"]);
        let matched = tree.at("/foo/x/aa/bb").unwrap();

        assert_eq!(matched.params().len(), 2);
        assert_eq!(matched.params().get("bar"), Some("x"));
        assert_eq!(matched.params().get("*"), Some("aa/bb"));
    }

    #[test]
    fn test_wildcard_matches_zero_segments() {
        let tree = tree(&["/foo/*"]);

        let matched = tree.at("/foo").unwrap();
        assert_eq!(matched.params().get("*"), Some(""));

        assert!(tree.at("/bar").is_none());
    }

    #[test]
    fn test_exact_leaf_beats_wildcard() {
        let tree = tree(&["/foo", "/foo/*"]);

        assert_eq!(*tree.at("/foo").unwrap().payload(), "/foo");
        assert_eq!(*tree.at("/foo/bar").unwrap().payload(), "/foo/*");
    }

    #[test]
    fn test_static_beats_param_beats_wildcard() {
        let tree = tree(&["/users/me", "/users/:id", "/users/*"]);

        assert_eq!(*tree.at("/users/me").unwrap().payload(), "/users/me");
        assert_eq!(*tree.at("/users/42").unwrap().payload(), "/users/:id");
        assert_eq!(*tree.at("/users/42/posts").unwrap().payload(), "/users/*");
    }

    #[test]
    fn test_backtracks_out_of_static_branch() {
        let tree = tree(&["/a/b/d", "/a/:x/c"]);

        let matched = tree.at("/a/b/c").unwrap();
        assert_eq!(*matched.payload(), "/a/:x/c");
        assert_eq!(matched.params().get("x"), Some("b"));
        assert_eq!(*tree.at("/a/b/d").unwrap().payload(), "/a/b/d");
    }

    #[test]
    fn test_more_specific_mount_wins() {
        let tree = tree(&["/", "/*", "/foo", "/foo/*"]);

        assert_eq!(*tree.at("/").unwrap().payload(), "/");
        assert_eq!(*tree.at("/bar/baz").unwrap().payload(), "/*");
        assert_eq!(*tree.at("/foo/bar").unwrap().payload(), "/foo/*");
    }

    #[test]
    fn test_same_shape_replaces() {
        let mut tree = PathTree::new();
        assert_eq!(tree.insert("/users/:id", 1).unwrap(), None);
        assert_eq!(tree.insert("/users/:name", 2).unwrap(), Some(1));

        let matched = tree.at("/users/bob").unwrap();
        assert_eq!(*matched.payload(), 2);
        assert_eq!(matched.params().get("name"), Some("bob"));
        assert_eq!(matched.params().get("id"), None);
    }

    #[test]
    fn test_lookup_ignores_repeated_separators() {
        let tree = tree(&["/a/b"]);
        assert!(tree.at("//a//b/").is_some());
    }
}
