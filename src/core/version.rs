//! Version comparison
//!
//! This module handles:
//! - Segment-wise alphanumeric comparison of version strings (`vercmp`)
//! - Epoch-aware comparison of full `[epoch:]pkgver-pkgrel` versions
//! - Parsing dependency strings such as `foo>=1.2` into requirements

use std::cmp::Ordering;
use std::fmt;

/// Split a version string into comparable segments
///
/// A segment is a run of letters, a run of digits starting with a non-zero
/// digit, or a lone `0` that is not followed by another digit. Everything else
/// (separators, leading zeros) is skipped.
pub fn versplit(version: &str) -> Vec<&str> {
    let bytes = version.as_bytes();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < version.len() {
        let rest = &version[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c.is_alphabetic() {
            let len = rest
                .char_indices()
                .find(|&(_, ch)| !ch.is_alphabetic())
                .map_or(rest.len(), |(pos, _)| pos);
            segments.push(&rest[..len]);
            i += len;
        } else if matches!(c, '1'..='9') {
            let len = rest
                .bytes()
                .position(|b| !b.is_ascii_digit())
                .unwrap_or(rest.len());
            segments.push(&rest[..len]);
            i += len;
        } else if c == '0' && !bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            segments.push(&rest[..1]);
            i += 1;
        } else {
            i += c.len_utf8();
        }
    }

    segments
}

fn is_numeric(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_digit())
}

/// Compare two version strings segment by segment
///
/// Numeric segments outrank alphabetic ones; segments of the same kind are
/// compared by length first, then lexically. When one sequence is a prefix of
/// the other, the longer one wins unless its next segment is alphabetic
/// (`1.0 > 1` but `1.a < 1`).
pub fn vercmp(v1: &str, v2: &str) -> Ordering {
    let a = versplit(v1);
    let b = versplit(v2);
    let n = a.len().min(b.len());

    for (x, y) in a.iter().zip(&b) {
        match (is_numeric(x), is_numeric(y)) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        let r = x.len().cmp(&y.len()).then_with(|| x.cmp(y));
        if r != Ordering::Equal {
            return r;
        }
    }

    match a.len().cmp(&b.len()) {
        Ordering::Less if is_numeric(b[n]) => Ordering::Less,
        Ordering::Less => Ordering::Greater,
        Ordering::Greater if is_numeric(a[n]) => Ordering::Greater,
        Ordering::Greater => Ordering::Less,
        Ordering::Equal => Ordering::Equal,
    }
}

/// Split `[epoch:]rest` into its epoch (default `0`) and the remainder
fn split_epoch(version: &str) -> (&str, &str) {
    match version.split_once(':') {
        Some((epoch, rest)) if !epoch.is_empty() && epoch.bytes().all(|b| b.is_ascii_digit()) => {
            (epoch, rest)
        }
        _ => ("0", version),
    }
}

/// Compare two full versions, honouring the epoch prefix
///
/// Epochs are compared first; on a tie the remainders are compared with
/// [`vercmp`].
pub fn compare_versions(v1: &str, v2: &str) -> Ordering {
    let (e1, r1) = split_epoch(v1);
    let (e2, r2) = split_epoch(v2);
    vercmp(e1, e2).then_with(|| vercmp(r1, r2))
}

/// Check if version v1 is newer than v2
pub fn is_newer(v1: &str, v2: &str) -> bool {
    compare_versions(v1, v2) == Ordering::Greater
}

/// Comparison operator of a versioned dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Op {
    /// Operators in the order they are searched for inside a dependency string
    const SEARCH_ORDER: [(&'static str, Op); 5] = [
        ("<=", Op::Le),
        (">=", Op::Ge),
        ("<", Op::Lt),
        ("=", Op::Eq),
        (">", Op::Gt),
    ];

    /// Whether a comparison outcome satisfies this operator
    pub fn accepts(self, ordering: Ordering) -> bool {
        match ordering {
            Ordering::Less => matches!(self, Op::Lt | Op::Le),
            Ordering::Equal => matches!(self, Op::Le | Op::Eq | Op::Ge),
            Ordering::Greater => matches!(self, Op::Gt | Op::Ge),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Eq => "=",
            Op::Ge => ">=",
            Op::Gt => ">",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed dependency string: target name plus an optional constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Package (or virtual package) name
    pub name: String,
    /// Operator and required version; `None` accepts any version
    pub constraint: Option<(Op, String)>,
}

impl Requirement {
    /// Parse `name[op version]`
    ///
    /// The first operator found, searching `<=`, `>=`, `<`, `=`, `>` in that
    /// order, splits the string.
    pub fn parse(dependency: &str) -> Self {
        for (token, op) in Op::SEARCH_ORDER {
            if let Some((name, version)) = dependency.split_once(token) {
                return Self {
                    name: name.to_string(),
                    constraint: Some((op, version.to_string())),
                };
            }
        }

        Self {
            name: dependency.to_string(),
            constraint: None,
        }
    }

    /// Check whether a candidate version satisfies this requirement
    pub fn is_satisfied_by(&self, version: &str) -> bool {
        match &self.constraint {
            Some((op, required)) if !required.is_empty() => op.accepts(vercmp(version, required)),
            _ => true,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some((op, version)) => write!(f, "{}{op}{version}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
