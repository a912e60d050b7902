//! Where the bearer token lives between runs.
//!
//! Absence of a stored token means signed out. Logging out is `clear()`.

use crate::error::Result;
use std::sync::{Arc, Mutex};

/// Key the browser build uses in `localStorage`, and the file name the
/// native build uses inside its token directory.
pub const TOKEN_KEY: &str = "token";

pub trait TokenStore {
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> MemoryTokenStore {
        MemoryTokenStore {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned slot still holds a usable Option.
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(feature = "no-wasm")]
pub use file::FileTokenStore;

#[cfg(feature = "no-wasm")]
mod file {
    use super::{TokenStore, TOKEN_KEY};
    use crate::error::Result;
    use std::{
        fs,
        io::ErrorKind as IoErrorKind,
        path::{Path, PathBuf},
    };

    #[derive(Debug, Clone)]
    pub struct FileTokenStore {
        path: PathBuf,
    }

    impl FileTokenStore {
        pub fn new(dir: impl AsRef<Path>) -> FileTokenStore {
            FileTokenStore {
                path: dir.as_ref().join(TOKEN_KEY),
            }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl TokenStore for FileTokenStore {
        fn load(&self) -> Result<Option<String>> {
            match fs::read_to_string(&self.path) {
                Ok(contents) => {
                    let token = contents.trim();
                    Ok((!token.is_empty()).then(|| token.to_string()))
                }
                Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&self, token: &str) -> Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, token)?;
            log::debug!("Token saved to {}", self.path.display());
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            match fs::remove_file(&self.path) {
                Ok(()) => {
                    log::debug!("Token removed from {}", self.path.display());
                    Ok(())
                }
                Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(feature = "wasm")]
pub use local_storage::LocalStorageTokenStore;

#[cfg(feature = "wasm")]
mod local_storage {
    use super::{TokenStore, TOKEN_KEY};
    use crate::error::{ErrorKind, Result};
    use web_sys::Storage;

    /// `window.localStorage["token"]`, the same slot the login page writes.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageTokenStore;

    impl LocalStorageTokenStore {
        fn storage() -> Result<Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| ErrorKind::StorageError("localStorage unavailable".to_string()).into())
        }
    }

    impl TokenStore for LocalStorageTokenStore {
        fn load(&self) -> Result<Option<String>> {
            Self::storage()?
                .get_item(TOKEN_KEY)
                .map(|t| t.filter(|t| !t.is_empty()))
                .map_err(|e| ErrorKind::StorageError(format!("{e:?}")).into())
        }

        fn save(&self, token: &str) -> Result<()> {
            Self::storage()?
                .set_item(TOKEN_KEY, token)
                .map_err(|e| ErrorKind::StorageError(format!("{e:?}")).into())
        }

        fn clear(&self) -> Result<()> {
            Self::storage()?
                .remove_item(TOKEN_KEY)
                .map_err(|e| ErrorKind::StorageError(format!("{e:?}")).into())
        }
    }
}
