//! Non-fatal findings collected while generating a spec.

use std::fmt;

/// Kind of non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// A type reference could not be matched to a primitive, cross-unit
    /// message or local declaration; it was emitted as a local reference.
    UnresolvedType,
    /// A shared-vocabulary import carries no version; `latest` was used.
    MissingVersionContext,
    /// A field name was suffixed to keep it unique within its message.
    NameCollision,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnresolvedType => "unresolved-type",
            Self::MissingVersionContext => "missing-version-context",
            Self::NameCollision => "name-collision",
        };
        f.write_str(name)
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Finding kind.
    pub kind: DiagnosticKind,
    /// Namespace of the bundle being emitted.
    pub namespace: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.namespace, self.message)
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding and logs it.
    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        namespace: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            namespace: namespace.into(),
            message: message.into(),
        };
        match kind {
            DiagnosticKind::NameCollision => tracing::debug!("{}", diagnostic),
            _ => tracing::warn!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    /// Returns all findings in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Iterates over findings of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Counts findings of one kind.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Returns the number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
