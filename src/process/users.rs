//! Numeric user id to user name resolution via the passwd registry.

use ahash::AHashMap as HashMap;
use tracing::{debug, warn};

use crate::procfs::TextInterfaceReader;

const NAME_COLUMN: usize = 0;
const UID_COLUMN: usize = 2;

/// Uid -> name map, loaded once per refresh.
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    names: HashMap<u64, String>,
}

impl UserRegistry {
    /// Parses colon-delimited `name:password:uid:...` records.
    /// The first record for a uid wins.
    pub fn parse(content: &str) -> Self {
        let mut names = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let columns: Vec<&str> = line.split(':').collect();
            let (Some(name), Some(uid)) = (columns.get(NAME_COLUMN), columns.get(UID_COLUMN))
            else {
                continue;
            };
            match uid.parse::<u64>() {
                Ok(uid) if !name.is_empty() => {
                    names.entry(uid).or_insert_with(|| name.to_string());
                }
                _ => debug!("Skipping malformed passwd record: {}", line),
            }
        }
        Self { names }
    }

    /// Loads the registry; an unreadable file gives an empty registry.
    pub fn load(reader: &TextInterfaceReader) -> Self {
        match reader.read_source(&reader.paths().passwd) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                warn!("User registry unavailable, owners shown as uids: {}", e);
                Self::default()
            }
        }
    }

    pub fn lookup(&self, uid: u64) -> Option<&str> {
        self.names.get(&uid).map(String::as_str)
    }

    /// User name for `uid`, or the numeric uid if it is not registered.
    pub fn resolve(&self, uid: u64) -> String {
        match self.lookup(uid) {
            Some(name) => name.to_string(),
            None => uid.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
