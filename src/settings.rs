use tracing::info;

use crate::constants::constants;
use crate::error::SettingsError;
use crate::storage::KeyValueStore;

/// Trim and store the API key, replacing any previous one.
pub fn save_api_key<S: KeyValueStore + ?Sized>(store: &mut S, raw: &str) -> Result<(), SettingsError> {
  let key = raw.trim();
  if key.is_empty() {
    return Err(SettingsError::EmptyKey);
  }
  store.set(&constants().api_key_storage_key, key)?;
  info!("settings: API key saved");
  Ok(())
}

/// The stored API key. An empty stored value counts as no key.
pub fn load_api_key<S: KeyValueStore + ?Sized>(store: &S) -> Option<String> {
  store.get(&constants().api_key_storage_key).filter(|k| !k.is_empty())
}

/// Show only the last four characters of a key.
pub fn mask_api_key(key: &str) -> String {
  let chars: Vec<char> = key.chars().collect();
  let visible = chars.len().min(4);
  let tail: String = chars[chars.len() - visible..].iter().collect();
  format!("{}{}", "*".repeat(chars.len() - visible), tail)
}
