use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const OMDB_API_KEY: &str = "omdb_api_key";
const TMDB_API_KEY: &str = "tmdb_api_key";
const SUPABASE_ANON_KEY: &str = "supabase_anon_key";

const SESSION_ACCESS_TOKEN: &str = "session_access_token";
const SESSION_REFRESH_TOKEN: &str = "session_refresh_token";
const SESSION_USER_ID: &str = "session_user_id";
const SESSION_EMAIL: &str = "session_email";
const SESSION_EXPIRES_AT: &str = "session_expires_at";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// An authenticated Supabase user session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user_id: String,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| at <= Utc::now()).unwrap_or(false)
    }
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.credentials.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Stored value first, then the environment variable
    fn get_or_env(&self, key: &str, env_var: &str) -> Option<String> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .or_else(|| std::env::var(env_var).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn get_omdb_api_key(&self) -> Option<String> {
        self.get_or_env(OMDB_API_KEY, "OMDB_API_KEY")
    }

    pub fn set_omdb_api_key(&mut self, key: String) {
        self.set(OMDB_API_KEY.to_string(), key);
    }

    pub fn get_tmdb_api_key(&self) -> Option<String> {
        self.get_or_env(TMDB_API_KEY, "TMDB_API_KEY")
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.set(TMDB_API_KEY.to_string(), key);
    }

    pub fn get_supabase_anon_key(&self) -> Option<String> {
        self.get_or_env(SUPABASE_ANON_KEY, "SUPABASE_KEY")
    }

    pub fn set_supabase_anon_key(&mut self, key: String) {
        self.set(SUPABASE_ANON_KEY.to_string(), key);
    }

    pub fn get_session(&self) -> Option<Session> {
        let access_token = self.get(SESSION_ACCESS_TOKEN)?.clone();
        let user_id = self.get(SESSION_USER_ID)?.clone();
        Some(Session {
            access_token,
            refresh_token: self.get(SESSION_REFRESH_TOKEN).cloned(),
            user_id,
            email: self.get(SESSION_EMAIL).cloned(),
            expires_at: self
                .get(SESSION_EXPIRES_AT)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }

    pub fn set_session(&mut self, session: &Session) {
        self.clear_session();
        self.set(SESSION_ACCESS_TOKEN.to_string(), session.access_token.clone());
        self.set(SESSION_USER_ID.to_string(), session.user_id.clone());
        if let Some(ref refresh) = session.refresh_token {
            self.set(SESSION_REFRESH_TOKEN.to_string(), refresh.clone());
        }
        if let Some(ref email) = session.email {
            self.set(SESSION_EMAIL.to_string(), email.clone());
        }
        if let Some(expires) = session.expires_at {
            self.set(SESSION_EXPIRES_AT.to_string(), expires.to_rfc3339());
        }
    }

    pub fn clear_session(&mut self) {
        for key in [
            SESSION_ACCESS_TOKEN,
            SESSION_REFRESH_TOKEN,
            SESSION_USER_ID,
            SESSION_EMAIL,
            SESSION_EXPIRES_AT,
        ] {
            self.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_omdb_api_key("omdb-key".to_string());
        store.set_tmdb_api_key("tmdb-key".to_string());
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        assert_eq!(loaded_store.get_omdb_api_key().as_deref(), Some("omdb-key"));
        assert_eq!(loaded_store.get_tmdb_api_key().as_deref(), Some("tmdb-key"));
    }

    #[test]
    fn test_session_round_trip_through_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let expires = Utc::now() + chrono::Duration::hours(1);
        let session = Session {
            access_token: "jwt".to_string(),
            refresh_token: Some("refresh".to_string()),
            user_id: "user-1".to_string(),
            email: Some("ana@example.com".to_string()),
            expires_at: Some(expires),
        };

        let mut store = CredentialStore::new(path.clone());
        store.set_session(&session);
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        let loaded = loaded_store.get_session().unwrap();
        assert_eq!(loaded.access_token, "jwt");
        assert_eq!(loaded.user_id, "user-1");
        assert_eq!(loaded.email.as_deref(), Some("ana@example.com"));
        // Allow 1 second difference for serialization
        assert!((loaded.expires_at.unwrap() - expires).num_seconds().abs() < 2);
        assert!(!loaded.is_expired());
    }

    #[test]
    fn test_clear_session_keeps_api_keys() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/classicflix-test"));
        store.set_omdb_api_key("k".to_string());
        store.set_session(&Session {
            access_token: "jwt".to_string(),
            refresh_token: None,
            user_id: "u".to_string(),
            email: None,
            expires_at: None,
        });
        assert!(store.get_session().is_some());

        store.clear_session();
        assert!(store.get_session().is_none());
        assert_eq!(store.get("omdb_api_key"), Some(&"k".to_string()));
    }

    #[test]
    fn test_credential_store_remove() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());

        store.remove("key1");
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.get_all_keys(), vec!["key2".to_string()]);
    }
}
