//! Recorded-name to live-name resolution.
//!
//! Scene merging mangles object names in two ways: referencing adds a
//! `namespace:` prefix and name collisions add a `.NNN` duplicate suffix.
//! A recorded name matches a live name when stripping at most one of each
//! leaves the recorded name exactly:
//!
//! | recorded | live              | match |
//! |----------|-------------------|-------|
//! | `Torso`  | `Torso`           | yes   |
//! | `Torso`  | `charA:Torso.002` | yes   |
//! | `Torso`  | `Torso.1`         | no    |
//! | `Torso`  | `OtherTorso`      | no    |

use std::collections::BTreeSet;

use crate::material::LiveObject;

/// Length of the `.NNN` duplicate suffix.
const SUFFIX_LEN: usize = 4;

/// Strip a leading `<alnum/underscore>+:` namespace, if present.
fn strip_namespace(name: &str) -> Option<&str> {
    let (ns, rest) = name.split_once(':')?;
    let valid = !ns.is_empty() && ns.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    valid.then_some(rest)
}

/// Strip a trailing `.` + exactly three ASCII digits, if present.
fn strip_duplicate_suffix(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(SUFFIX_LEN)?;
    let (head, tail) = (name.get(..split)?, name.get(split..)?.as_bytes());
    (tail[0] == b'.' && tail[1..].iter().all(u8::is_ascii_digit)).then_some(head)
}

/// Match rule for one recorded object name.
#[derive(Clone, Debug)]
pub struct NameResolver {
    recorded: String,
}

impl NameResolver {
    /// Build the match rule for `recorded`. The name is always matched literally.
    pub fn new(recorded: &str) -> Self {
        Self {
            recorded: recorded.to_string(),
        }
    }

    /// Check a single live name.
    pub fn matches(&self, candidate: &str) -> bool {
        let bare = strip_namespace(candidate);
        [Some(candidate), bare]
            .into_iter()
            .flatten()
            .any(|form| form == self.recorded || strip_duplicate_suffix(form) == Some(self.recorded.as_str()))
    }

    /// All names in `pool` that match.
    pub fn resolve_in(&self, pool: &[LiveObject]) -> BTreeSet<String> {
        pool.iter()
            .filter(|obj| self.matches(&obj.name))
            .map(|obj| obj.name.clone())
            .collect()
    }
}

/// Resolve one recorded name against a pool.
///
/// An empty set means no match. The pool is never modified.
pub fn resolve(recorded: &str, pool: &[LiveObject]) -> BTreeSet<String> {
    NameResolver::new(recorded).resolve_in(pool)
}

/// Outcome of resolving a list of recorded names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Union of all matched live names.
    pub resolved: BTreeSet<String>,
    /// Recorded names that matched nothing.
    pub unresolved: BTreeSet<String>,
}

/// Resolve every recorded name in `recorded` against `pool`.
pub fn resolve_all<S: AsRef<str>>(recorded: &[S], pool: &[LiveObject]) -> Resolution {
    let mut resolution = Resolution::default();

    for name in recorded {
        let name = name.as_ref();
        let matches = resolve(name, pool);
        if matches.is_empty() {
            resolution.unresolved.insert(name.to_string());
        } else {
            resolution.resolved.extend(matches);
        }
    }

    resolution
}
