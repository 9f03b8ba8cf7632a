//! Report documents held in a shared XML arena
//!
//! Every document taking part in a merge is parsed into the same [`Xot`]
//! arena owned by [`Reports`]. Nodes are stable handles into that arena, so
//! moving a test case from the source document into the target document is a
//! plain ownership transfer and never invalidates other handles.
//!
//! Elements are classified once by interned name ([`NodeKind`]) instead of
//! matching tag strings while walking the tree.

use std::borrow::Cow;
use std::path::Path;

use xot::output::{NoopNormalizer, Output, TokenSerializeParameters};
use xot::{NameId, Node, Xot};

use crate::error::{Error, Result};

pub const TAG_TESTSUITES: &str = "testsuites";
pub const TAG_TESTSUITE: &str = "testsuite";
pub const TAG_TESTCASE: &str = "testcase";
pub const TAG_FAILURE: &str = "failure";
pub const TAG_ERROR: &str = "error";
pub const TAG_SKIPPED: &str = "skipped";

pub const ATTR_CLASSNAME: &str = "classname";
pub const ATTR_NAME: &str = "name";

/// Classification of an element within a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A `testsuites` collection.
    Suites,
    /// A `testsuite` container.
    Suite,
    /// A `testcase` result.
    TestCase,
    /// Anything else, including non-element nodes.
    Other,
}

impl NodeKind {
    /// Whether this kind carries summary counters.
    pub fn is_summary(self) -> bool {
        matches!(self, NodeKind::Suites | NodeKind::Suite)
    }
}

/// The result recorded by a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Passed,
    Failure,
    Error,
    Skipped,
}

/// A summary counter carried as an attribute on suite-level elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Tests,
    Failures,
    Errors,
    Skipped,
}

impl Counter {
    pub const ALL: [Counter; 4] = [
        Counter::Tests,
        Counter::Failures,
        Counter::Errors,
        Counter::Skipped,
    ];

    /// The attribute name storing this counter.
    pub fn attribute(self) -> &'static str {
        match self {
            Counter::Tests => "tests",
            Counter::Failures => "failures",
            Counter::Errors => "errors",
            Counter::Skipped => "skipped",
        }
    }
}

/// The identity of a test case: its `classname` and `name` attributes.
///
/// Absent attributes are read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestCaseId {
    pub classname: String,
    pub name: String,
}

impl TestCaseId {
    pub fn new(classname: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            classname: classname.into(),
            name: name.into(),
        }
    }

    /// A query matching test cases with exactly this identity.
    pub fn query(&self) -> String {
        format!(
            "{}{}{}",
            TAG_TESTCASE,
            crate::escape::attribute_predicate(ATTR_CLASSNAME, &self.classname),
            crate::escape::attribute_predicate(ATTR_NAME, &self.name)
        )
    }
}

impl std::fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.classname, self.name)
    }
}

struct Names {
    testsuites: NameId,
    testsuite: NameId,
    testcase: NameId,
    failure: NameId,
    error: NameId,
    skipped: NameId,
    classname: NameId,
    name: NameId,
    counters: [NameId; 4],
}

impl Names {
    fn intern(xot: &mut Xot) -> Self {
        Self {
            testsuites: xot.add_name(TAG_TESTSUITES),
            testsuite: xot.add_name(TAG_TESTSUITE),
            testcase: xot.add_name(TAG_TESTCASE),
            failure: xot.add_name(TAG_FAILURE),
            error: xot.add_name(TAG_ERROR),
            skipped: xot.add_name(TAG_SKIPPED),
            classname: xot.add_name(ATTR_CLASSNAME),
            name: xot.add_name(ATTR_NAME),
            counters: Counter::ALL.map(|counter| xot.add_name(counter.attribute())),
        }
    }

    fn counter(&self, counter: Counter) -> NameId {
        match counter {
            Counter::Tests => self.counters[0],
            Counter::Failures => self.counters[1],
            Counter::Errors => self.counters[2],
            Counter::Skipped => self.counters[3],
        }
    }
}

/// An arena of parsed report documents.
pub struct Reports {
    xot: Xot,
    names: Names,
}

impl Default for Reports {
    fn default() -> Self {
        Self::new()
    }
}

impl Reports {
    pub fn new() -> Self {
        let mut xot = Xot::new();
        let names = Names::intern(&mut xot);
        Self { xot, names }
    }

    /// The underlying XML arena.
    pub fn xot(&self) -> &Xot {
        &self.xot
    }

    /// Parse report text into a new document, returning its document node.
    ///
    /// `path` is only used to label parse errors.
    ///
    /// Documents with a `<!DOCTYPE ...>` declaration are not supported and
    /// fail with `Error::XmlParse`, even though they are well-formed.
    pub fn parse(&mut self, path: &Path, text: &str) -> Result<Node> {
        self.xot.parse(text).map_err(|e| Error::XmlParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Serialize a document (or any subtree) back to XML text.
    ///
    /// Tab, line feed and carriage return inside attribute values are written
    /// as character references so that they survive the next parse.
    pub fn to_string(&mut self, node: Node) -> Result<String> {
        // Test cases moved in from another document may use prefixes that
        // are only declared there.
        self.xot.create_missing_prefixes(node)?;

        let mut xml = String::new();
        let tokens = self
            .xot
            .tokens(node, TokenSerializeParameters::default(), NoopNormalizer);
        for (_, output, token) in tokens {
            if token.space {
                xml.push(' ');
            }
            match output {
                Output::Attribute(..) => {
                    xml.push_str(&escape_attribute_whitespace(&token.text))
                }
                _ => xml.push_str(&token.text),
            }
        }
        Ok(xml)
    }

    pub fn kind(&self, node: Node) -> NodeKind {
        let Some(element) = self.xot.element(node) else {
            return NodeKind::Other;
        };
        let name = element.name();
        if name == self.names.testcase {
            NodeKind::TestCase
        } else if name == self.names.testsuite {
            NodeKind::Suite
        } else if name == self.names.testsuites {
            NodeKind::Suites
        } else {
            NodeKind::Other
        }
    }

    fn descendants_of_kind(&self, root: Node, kind: NodeKind) -> Vec<Node> {
        self.xot
            .descendants(root)
            .filter(|&node| self.kind(node) == kind)
            .collect()
    }

    /// All test cases under `root`, in document order.
    pub fn test_cases(&self, root: Node) -> Vec<Node> {
        self.descendants_of_kind(root, NodeKind::TestCase)
    }

    /// All `testsuite` elements under `root`, in document order.
    pub fn suites(&self, root: Node) -> Vec<Node> {
        self.descendants_of_kind(root, NodeKind::Suite)
    }

    /// The nearest `testsuite` ancestor of `node`.
    pub fn enclosing_suite(&self, node: Node) -> Option<Node> {
        self.xot
            .ancestors(node)
            .skip(1)
            .find(|&ancestor| self.kind(ancestor) == NodeKind::Suite)
    }

    /// Every counter-bearing ancestor of `node`, innermost first.
    pub fn summary_ancestors(&self, node: Node) -> Vec<Node> {
        self.xot
            .ancestors(node)
            .skip(1)
            .filter(|&ancestor| self.kind(ancestor).is_summary())
            .collect()
    }

    fn attribute(&self, node: Node, name: NameId) -> Option<&str> {
        self.xot.get_attribute(node, name)
    }

    /// The `name` attribute of an element, if set.
    pub fn name_of(&self, node: Node) -> Option<&str> {
        self.attribute(node, self.names.name)
    }

    pub fn identity(&self, node: Node) -> TestCaseId {
        TestCaseId {
            classname: self
                .attribute(node, self.names.classname)
                .unwrap_or_default()
                .to_string(),
            name: self
                .attribute(node, self.names.name)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// The outcome of a test case, taken from its first outcome marker.
    pub fn outcome(&self, node: Node) -> Outcome {
        for child in self.xot.children(node) {
            let Some(element) = self.xot.element(child) else {
                continue;
            };
            let name = element.name();
            if name == self.names.failure {
                return Outcome::Failure;
            } else if name == self.names.error {
                return Outcome::Error;
            } else if name == self.names.skipped {
                return Outcome::Skipped;
            }
        }
        Outcome::Passed
    }

    /// The raw text of a counter attribute, if the report sets it.
    pub fn counter_text(&self, node: Node, counter: Counter) -> Option<&str> {
        self.attribute(node, self.names.counter(counter))
    }

    /// A counter attribute parsed as an integer.
    ///
    /// Returns `None` when the attribute is absent or not an integer.
    pub fn counter(&self, node: Node, counter: Counter) -> Option<i64> {
        self.counter_text(node, counter)?.trim().parse().ok()
    }

    pub fn set_counter(&mut self, node: Node, counter: Counter, value: i64) {
        let name = self.names.counter(counter);
        self.xot.set_attribute(node, name, value.to_string());
    }

    /// Move `replacement` into the position of `original`, removing
    /// `original` and its subtree.
    pub fn replace(&mut self, original: Node, replacement: Node) -> Result<()> {
        self.xot.detach(replacement)?;
        self.xot.insert_before(original, replacement)?;
        self.xot.remove(original)?;
        Ok(())
    }

    /// Move `node` to the end of `parent`'s children.
    pub fn append(&mut self, parent: Node, node: Node) -> Result<()> {
        self.xot.detach(node)?;
        self.xot.append(parent, node)?;
        Ok(())
    }
}

/// Replace whitespace that attribute-value normalization would turn into
/// spaces with character references.
fn escape_attribute_whitespace(token: &str) -> Cow<'_, str> {
    if !token.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(token);
    }
    let mut escaped = String::with_capacity(token.len() + 8);
    for c in token.chars() {
        match c {
            '\t' => escaped.push_str("&#9;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
