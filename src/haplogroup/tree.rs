use crate::error::{SnappyError, SnappyResult};
use crate::haplogroup::types::ROOTS;
use std::collections::HashMap;

/// Implicit haplogroup tree: a name's parent is its override entry if one
/// exists, otherwise the name minus its last character. `A0-T` and `A00` have
/// no parent.
#[derive(Debug, Clone, Default)]
pub struct HaplogroupTree {
    overrides: HashMap<String, String>,
}

impl HaplogroupTree {
    /// Builds the resolver, rejecting override tables whose chains loop.
    pub fn new(overrides: HashMap<String, String>) -> SnappyResult<Self> {
        let tree = Self { overrides };
        tree.check_cycles()?;
        Ok(tree)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_root(hg: &str) -> bool {
        ROOTS.contains(&hg)
    }

    pub fn parent<'a>(&'a self, hg: &'a str) -> Option<&'a str> {
        if let Some(parent) = self.overrides.get(hg) {
            return Some(parent.as_str()).filter(|p| !p.is_empty());
        }
        if Self::is_root(hg) {
            return None;
        }
        let mut chars = hg.chars();
        chars.next_back()?;
        Some(chars.as_str()).filter(|p| !p.is_empty())
    }

    /// All ancestors of `hg`, nearest first, excluding `hg` itself.
    pub fn ancestors<'a>(&'a self, hg: &'a str) -> Vec<&'a str> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(hg);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent(parent);
        }
        ancestors
    }

    // Truncation always shortens a name, so a loop has to pass through an
    // override key. Walking from every key covers every possible cycle.
    fn check_cycles(&self) -> SnappyResult<()> {
        let mut keys: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
        keys.sort_unstable();

        for key in keys {
            let mut path: Vec<&str> = Vec::new();
            let mut current = Some(key);
            while let Some(hg) = current {
                if let Some(start) = path.iter().position(|seen| *seen == hg) {
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|s| s.to_string()).collect();
                    cycle.push(hg.to_string());
                    return Err(SnappyError::TreeCycle(cycle));
                }
                path.push(hg);
                current = self.parent(hg);
            }
        }
        Ok(())
    }
}
