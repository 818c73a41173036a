//! Errors for the I/O around the filler. The filler itself never fails: an unfillable grid is
//! reported as `None`, not as an error.

use std::io;
use std::path::PathBuf;

/// Error type for loading puzzles and saving fills.
#[derive(Debug, thiserror::Error)]
pub enum CrosswordError {
    #[error("could not read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = CrosswordError::WriteFile {
            path: PathBuf::from("out/fill.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(err.to_string(), "could not write out/fill.txt: denied");
        assert!(std::error::Error::source(&err).is_some());
    }
}
