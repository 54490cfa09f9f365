//! Pattern-based removal of a folder reference from `project.pbxproj` text.
//!
//! Entry identifiers are regenerated every time the project is generated, so
//! entries are matched by the shape of the identifier (24 uppercase hex
//! characters) plus the comment naming the dependency, never by the identifier
//! itself. Everything outside a matched span is left byte-for-byte untouched.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use super::StripError;

/// Identifier shape used by Xcode for object keys.
const OBJECT_ID: &str = "[A-F0-9]{24}";

/// Upper bound on the compiled size of either pattern, in bytes.
pub const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// What a strip removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StripSummary {
    /// `PBXFileReference` definitions removed.
    pub references_removed: usize,
    /// Group children lines removed.
    pub memberships_removed: usize,
}

impl StripSummary {
    pub fn total(&self) -> usize {
        self.references_removed + self.memberships_removed
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Output of [`ReferenceStripper::strip_with_summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub text: String,
    pub summary: StripSummary,
}

/// Removes every trace of one dependency from descriptor text.
///
/// Both patterns are compiled once, so a stripper can be reused across files.
#[derive(Debug, Clone)]
pub struct ReferenceStripper {
    dependency: String,
    file_reference: Regex,
    group_child: Regex,
}

impl ReferenceStripper {
    /// Compile the patterns for `dependency`.
    ///
    /// The name is escaped, so the only failure is a name long enough to push
    /// a pattern past [`PATTERN_SIZE_LIMIT`].
    pub fn new(dependency: impl Into<String>) -> Result<Self, StripError> {
        let dependency = dependency.into();
        let name = regex::escape(&dependency);

        // Two tabs: a definition inside the PBXFileReference section.
        let file_reference = compile(&format!(
            r"\n\t\t{OBJECT_ID} /\* {name} \*/ = \{{isa = PBXFileReference;[^\n]*path = \.\./{name};[^\n]*\}};\n"
        ))?;

        // Four tabs: an entry in a PBXGroup `children` list.
        let group_child = compile(&format!(r"\n\t\t\t\t{OBJECT_ID} /\* {name} \*/,\n"))?;

        Ok(Self {
            dependency,
            file_reference,
            group_child,
        })
    }

    pub fn dependency(&self) -> &str {
        &self.dependency
    }

    pub fn strip(&self, text: &str) -> String {
        self.strip_with_summary(text).text
    }

    pub fn strip_with_summary(&self, text: &str) -> Stripped {
        let (text, references_removed) = remove_all(&self.file_reference, text.to_string());
        let (text, memberships_removed) = remove_all(&self.group_child, text);

        Stripped {
            text,
            summary: StripSummary {
                references_removed,
                memberships_removed,
            },
        }
    }
}

/// Strip `dependency` from `text` in one call.
///
/// Input that does not contain a well-formed entry comes back unchanged.
///
/// # Panics
///
/// If `dependency` is too long to compile (see [`ReferenceStripper::new`]).
pub fn strip(text: &str, dependency: &str) -> String {
    ReferenceStripper::new(dependency)
        .expect("dependency name fits within the pattern size limit")
        .strip(text)
}

fn compile(pattern: &str) -> Result<Regex, StripError> {
    let regex = RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?;
    Ok(regex)
}

/// Replace every match of `pattern` with a single newline.
///
/// Consecutive entries share their bounding newline, so one non-overlapping
/// pass only catches every other one. Repeat until nothing matches; each
/// replacement shortens the text, which bounds the loop.
fn remove_all(pattern: &Regex, mut text: String) -> (String, usize) {
    let mut removed = 0;
    loop {
        let found = pattern.find_iter(&text).count();
        if found == 0 {
            return (text, removed);
        }
        text = pattern.replace_all(&text, "\n").into_owned();
        removed += found;
    }
}
