//! Source and destination of one run, classified from two arguments

use crate::error::{Error, Result};
use crate::location::{classify, Location};

/// Which side of a copy is local and which is remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LocalToLocal,
    LocalToRemote,
    RemoteToLocal,
    RemoteToRemote,
}

impl Direction {
    /// Whether either side needs an object store
    pub fn needs_remote(self) -> bool {
        !matches!(self, Direction::LocalToLocal)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::LocalToLocal => "local -> local",
            Direction::LocalToRemote => "local -> remote",
            Direction::RemoteToLocal => "remote -> local",
            Direction::RemoteToRemote => "remote -> remote",
        };
        f.write_str(s)
    }
}

/// Source and destination of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySpec {
    pub source: Location,
    pub destination: Location,
}

impl CopySpec {
    /// Classify both arguments
    pub fn new(source: &str, destination: &str) -> Self {
        Self {
            source: classify(source),
            destination: classify(destination),
        }
    }

    /// Build from positional arguments.
    ///
    /// Fewer than two arguments is a usage error; anything past the second is
    /// ignored.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (Some(source), Some(destination)) => {
                Ok(Self::new(source.as_ref(), destination.as_ref()))
            }
            _ => Err(Error::Usage("<SOURCE> <DESTINATION>".into())),
        }
    }

    pub fn direction(&self) -> Direction {
        match (&self.source, &self.destination) {
            (Location::Local(_), Location::Local(_)) => Direction::LocalToLocal,
            (Location::Local(_), Location::Remote(_)) => Direction::LocalToRemote,
            (Location::Remote(_), Location::Local(_)) => Direction::RemoteToLocal,
            (Location::Remote(_), Location::Remote(_)) => Direction::RemoteToRemote,
        }
    }
}
