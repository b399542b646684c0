//! Session credential storage.
//!
//! The bearer credential for the assistant service lives in the OS keyring,
//! with an environment variable fallback for headless sessions. The
//! conversation controller receives the store as an injected collaborator
//! and only ever forwards the credential; it never inspects or decodes it.

use std::error::Error;

use keyring::Entry;

const KEYRING_SERVICE: &str = "merchat";
const KEYRING_USER: &str = "assistant-token";

/// Environment variable consulted before the keyring.
pub const TOKEN_ENV_VAR: &str = "MERCHAT_TOKEN";

/// External collaborator holding the session credential.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, Box<dyn Error>>;
    fn set(&self, credential: &str) -> Result<(), Box<dyn Error>>;
    fn clear(&self) -> Result<(), Box<dyn Error>>;
}

/// Keyring-backed store with the `MERCHAT_TOKEN` fallback.
#[derive(Default)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry, Box<dyn Error>> {
        Ok(Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self) -> Result<Option<String>, Box<dyn Error>> {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                return Ok(Some(token));
            }
        }
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(Box::new(err)),
        }
    }

    fn set(&self, credential: &str) -> Result<(), Box<dyn Error>> {
        Self::entry()?.set_password(credential)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Box<dyn Error>> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(Box::new(err)),
        }
    }
}

/// Prompts for a credential on stdin and stores it.
pub fn store_credential_interactive(store: &dyn CredentialStore) -> Result<(), Box<dyn Error>> {
    use std::io::{BufRead, Write};

    print!("Paste your assistant service token: ");
    std::io::stdout().flush()?;

    let mut token = String::new();
    std::io::stdin().lock().read_line(&mut token)?;
    let token = token.trim();
    if token.is_empty() {
        return Err("Token cannot be empty".into());
    }

    store.set(token)?;
    println!("✓ Token stored securely");
    Ok(())
}

/// Removes the stored credential (logout).
pub fn clear_credential(store: &dyn CredentialStore) -> Result<(), Box<dyn Error>> {
    store.clear()?;
    println!("✓ Stored credential removed");
    Ok(())
}

/// In-memory store for driving the controller in tests.
#[cfg(test)]
pub struct MemoryCredentialStore {
    credential: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryCredentialStore {
    pub fn with(credential: impl Into<String>) -> Self {
        Self {
            credential: std::sync::Mutex::new(Some(credential.into())),
        }
    }

    pub fn empty() -> Self {
        Self {
            credential: std::sync::Mutex::new(None),
        }
    }
}

#[cfg(test)]
impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.credential.lock().expect("store lock").clone())
    }

    fn set(&self, credential: &str) -> Result<(), Box<dyn Error>> {
        *self.credential.lock().expect("store lock") = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Box<dyn Error>> {
        *self.credential.lock().expect("store lock") = None;
        Ok(())
    }
}
