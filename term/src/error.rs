use std::{io, path::PathBuf};

use chip::RomError;

/// Everything that makes the frontend stop early.
#[derive(thiserror::Error, Debug)]
pub enum HostError {
    #[error("{0}")]
    Usage(clap::Error),
    #[error("Unable to read the rom {path:?}: {source}")]
    RomUnreadable { path: PathBuf, source: io::Error },
    #[error("The rom was rejected: {0}")]
    RomRejected(#[from] RomError),
    #[error("Unable to create the log file {path:?}: {source}")]
    LogUnwritable { path: PathBuf, source: io::Error },
    #[error("Terminal failure: {0:#}")]
    Terminal(anyhow::Error),
}

impl HostError {
    /// The code the process exits with.
    pub fn exit_code(&self) -> i32 {
        match self {
            HostError::RomUnreadable { .. } | HostError::LogUnwritable { .. } => 1,
            HostError::Usage(_) => 2,
            HostError::RomRejected(_) => 3,
            HostError::Terminal(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let unreadable = HostError::RomUnreadable {
            path: PathBuf::from("missing.ch8"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(1, unreadable.exit_code());

        let log = HostError::LogUnwritable {
            path: PathBuf::from("/chip8.log"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(1, log.exit_code());

        let usage = HostError::Usage(clap::Error::new(clap::error::ErrorKind::MissingRequiredArgument));
        assert_eq!(2, usage.exit_code());

        let rejected = HostError::from(RomError::TooLarge {
            size: 4000,
            max: 3584,
        });
        assert_eq!(3, rejected.exit_code());
        assert_eq!(
            "The rom was rejected: The rom is 4000 bytes long, but only 3584 bytes fit into memory",
            rejected.to_string()
        );

        let terminal = HostError::Terminal(anyhow::anyhow!("no tty"));
        assert_eq!(4, terminal.exit_code());
    }
}
