//! Operation gate: rejects directory and mutating operations before any I/O.

use std::fmt;

use crate::error::FsError;

/// Filesystem operations the gate always rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DirectoryExists,
    ListContents,
    Write,
    Delete,
    DeleteDirectory,
    CreateDirectory,
    SetVisibility,
    Move,
    Copy,
}

/// Why an operation is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Implies a directory tree.
    Directory,
    /// Would change the origin.
    Mutation,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::DirectoryExists,
        Operation::ListContents,
        Operation::Write,
        Operation::Delete,
        Operation::DeleteDirectory,
        Operation::CreateDirectory,
        Operation::SetVisibility,
        Operation::Move,
        Operation::Copy,
    ];

    /// Stable identifier reported to callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::DirectoryExists => "DIRECTORY_EXISTS",
            Operation::ListContents => "LIST_CONTENTS",
            Operation::Write => "WRITE",
            Operation::Delete => "DELETE",
            Operation::DeleteDirectory => "DELETE_DIRECTORY",
            Operation::CreateDirectory => "CREATE_DIRECTORY",
            Operation::SetVisibility => "SET_VISIBILITY",
            Operation::Move => "MOVE",
            Operation::Copy => "COPY",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Operation::DirectoryExists | Operation::ListContents => Category::Directory,
            Operation::Write
            | Operation::Delete
            | Operation::DeleteDirectory
            | Operation::CreateDirectory
            | Operation::SetVisibility
            | Operation::Move
            | Operation::Copy => Category::Mutation,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the failure for a gated operation.
pub fn reject(operation: Operation) -> FsError {
    tracing::debug!("rejecting {} ({:?})", operation, operation.category());
    match operation.category() {
        Category::Directory => FsError::FileOnly { operation },
        Category::Mutation => FsError::ReadOnly { operation },
    }
}
