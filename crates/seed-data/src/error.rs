//! Error types for the seed-data crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing or querying a seed registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// Two seed definitions share a name.
    #[error("seed '{name}' is defined more than once")]
    DuplicateSeed {
        /// The repeated seed name.
        name: String,
    },

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors that can occur while generating a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A child record needed a parent but the parent pool was empty.
    #[error("cannot generate {child} records without any {parent} records")]
    MissingParent {
        /// Collection that needed a parent.
        child: &'static str,
        /// Collection that had no records to reference.
        parent: &'static str,
    },

    /// A generated date fell outside the representable calendar range.
    #[error("date offset of {offset_days} days is out of range")]
    DateOutOfRange {
        /// Day offset from the dataset epoch.
        offset_days: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_io_formats_correctly() {
        let err = RegistryError::IoError {
            path: PathBuf::from("/tmp/seeds.json"),
            message: "file not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read registry file at '/tmp/seeds.json': file not found"
        );
    }

    #[test]
    fn registry_error_version_formats_correctly() {
        let err = RegistryError::UnsupportedVersion {
            expected: 1,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "unsupported registry version: expected 1, found 3"
        );
    }

    #[test]
    fn registry_error_duplicate_seed_formats_correctly() {
        let err = RegistryError::DuplicateSeed {
            name: "quick-thali".to_owned(),
        };
        assert_eq!(err.to_string(), "seed 'quick-thali' is defined more than once");
    }

    #[test]
    fn registry_error_seed_not_found_formats_correctly() {
        let err = RegistryError::SeedNotFound {
            name: "grand-feast".to_owned(),
        };
        assert_eq!(err.to_string(), "seed 'grand-feast' not found in registry");
    }

    #[test]
    fn generation_error_missing_parent_formats_correctly() {
        let err = GenerationError::MissingParent {
            child: "menuitems",
            parent: "menus",
        };
        assert_eq!(
            err.to_string(),
            "cannot generate menuitems records without any menus records"
        );
    }

    #[test]
    fn generation_error_date_formats_correctly() {
        let err = GenerationError::DateOutOfRange { offset_days: 9 };
        assert_eq!(err.to_string(), "date offset of 9 days is out of range");
    }
}
