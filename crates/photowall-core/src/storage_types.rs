use std::fmt::{Display, Formatter, Result as FmtResult};

/// Storage backend types
///
/// Every stored photo is written to both backends; the enum identifies which
/// one a client or log line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Blob,
    FileShare,
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BackendKind::Blob => write!(f, "blob"),
            BackendKind::FileShare => write!(f, "file-share"),
        }
    }
}
