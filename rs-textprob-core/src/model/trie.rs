//! Persisted form of a [`ContextLexicon`].
//!
//! Contexts are stored as a trie keyed by their elements in order, so that
//! contexts sharing a prefix share the branches of that prefix. The lexicon
//! following a context sits in the leaf reached by its last element.
//!
//! Every node carries an explicit tag (`branch` or `leaf`). A serialized
//! lexicon can therefore never be mistaken for a nested branch.
//!
//! ```json
//! { "t": { "branch": { "h": { "leaf": [{ "e": 3 }, 3] } } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::lexicon::{ContextLexicon, Lexicon};
use super::probability::{NGram, Unit};
use crate::error::{Error, Result};

/// A node of the context trie.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TrieNode {
	/// Children indexed by the next context element.
	Branch(BTreeMap<Unit, TrieNode>),
	/// The lexicon following the context spelled by the path to this node.
	Leaf(Lexicon),
}

/// Root of the context trie: first context elements mapped to their nodes.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Trie(BTreeMap<Unit, TrieNode>);

impl Trie {
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Encodes a context lexicon as a trie.
pub fn encode(context_lexicon: &ContextLexicon) -> Trie {
	Trie::from(context_lexicon.clone())
}

/// Decodes a trie into a context lexicon.
///
/// # Errors
/// Returns [`Error::MalformedTrie`] if leaves sit at different depths or a
/// branch below the root has no child.
pub fn decode(trie: Trie) -> Result<ContextLexicon> {
	ContextLexicon::try_from(trie)
}

fn insert(children: &mut BTreeMap<Unit, TrieNode>, path: &[Unit], lexicon: Lexicon) {
	match path {
		[] => {}
		[last] => {
			children.insert(last.clone(), TrieNode::Leaf(lexicon));
		}
		[head, rest @ ..] => {
			let node = children
				.entry(head.clone())
				.or_insert_with(|| TrieNode::Branch(BTreeMap::new()));
			// All contexts have the same length, so a prefix never ends on a leaf.
			if let TrieNode::Branch(next) = node {
				insert(next, rest, lexicon);
			}
		}
	}
}

/// Depth-first walk accumulating the path of keys traversed so far.
fn walk(children: BTreeMap<Unit, TrieNode>, path: &mut NGram, leaves: &mut Vec<(NGram, Lexicon)>) -> Result<()> {
	for (key, node) in children {
		path.push(key);
		match node {
			TrieNode::Leaf(lexicon) => leaves.push((path.clone(), lexicon)),
			TrieNode::Branch(next) if next.is_empty() => {
				return Err(Error::malformed_trie(format!("empty branch at {path:?}")));
			}
			TrieNode::Branch(next) => walk(next, path, leaves)?,
		}
		path.pop();
	}
	Ok(())
}

impl From<ContextLexicon> for Trie {
	fn from(context_lexicon: ContextLexicon) -> Self {
		let mut root = BTreeMap::new();
		for (context, lexicon) in context_lexicon {
			insert(&mut root, &context, lexicon);
		}
		Trie(root)
	}
}

impl TryFrom<Trie> for ContextLexicon {
	type Error = Error;

	fn try_from(trie: Trie) -> Result<Self> {
		let mut leaves = Vec::new();
		walk(trie.0, &mut Vec::new(), &mut leaves)?;

		let Some(order) = leaves.first().map(|(context, _)| context.len()) else {
			return Ok(ContextLexicon::new(0));
		};
		ContextLexicon::from_entries(order, leaves).map_err(|e| match e {
			Error::ContextLengthMismatch { expected, found } => {
				Error::malformed_trie(format!("leaves at depth {expected} and {found}"))
			}
			other => other,
		})
	}
}
