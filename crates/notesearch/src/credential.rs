use console::Term;
use dialoguer::Password;

use crate::error::{Result, SearchError};

pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Resolve the provider API key for this session.
///
/// A key given by flag or environment wins. Otherwise the user is asked with a
/// masked prompt when a terminal is attached. The key is only held in memory.
pub fn resolve_api_key(supplied: Option<String>) -> Result<String> {
  select_api_key(supplied, Term::stderr().is_term(), prompt_for_api_key)
}

fn select_api_key<F>(supplied: Option<String>, interactive: bool, prompt: F) -> Result<String>
where
  F: FnOnce() -> Result<String>,
{
  if let Some(key) = supplied.map(|key| key.trim().to_string()).filter(|key| !key.is_empty()) {
    return Ok(key);
  }

  if !interactive {
    return Err(SearchError::MissingCredential);
  }

  let key = prompt()?.trim().to_string();
  if key.is_empty() {
    return Err(SearchError::MissingCredential);
  }
  Ok(key)
}

fn prompt_for_api_key() -> Result<String> {
  Password::new()
    .with_prompt("OpenAI API key (sk-...)")
    .allow_empty_password(true)
    .interact()
    .map_err(|e| SearchError::Io(std::io::Error::other(e.to_string())))
}
