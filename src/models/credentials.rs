//! Login credential models
//!
//! These mirror the request payload the aggregation API expects when a bank
//! access is created or refreshed: a map of access ids to login credentials,
//! each carrying a provider id, the credential fields and a sync flag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Map every value of `map` through `f`, keeping the keys.
///
/// Stops at the first error; no partially mapped result is ever returned.
pub fn try_map_values<K, V, W, E, F>(map: &BTreeMap<K, V>, mut f: F) -> Result<BTreeMap<K, W>, E>
where
    K: Ord + Clone,
    F: FnMut(&V) -> Result<W, E>,
{
    map.iter()
        .map(|(key, value)| Ok((key.clone(), f(value)?)))
        .collect()
}

/// Credential fields for a single banking login (field name -> value)
///
/// Values are either plaintext or ciphertext depending on where the set sits
/// in the pipeline, so `Debug` never prints them.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSet(BTreeMap<String, String>);

impl CredentialSet {
    /// Create an empty credential set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value if any
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(field.into(), value.into())
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterate over field names in order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over (field, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a new set by transforming every value
    pub fn try_map<E, F>(&self, f: F) -> Result<Self, E>
    where
        F: FnMut(&String) -> Result<String, E>,
    {
        try_map_values(&self.0, f).map(Self)
    }
}

impl From<BTreeMap<String, String>> for CredentialSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// Field names only; values may be plaintext secrets
impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.fields()).finish()
    }
}

/// Credentials for one bank access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    /// Identifier of the bank/provider the login belongs to
    pub provider_id: String,

    /// The credential fields
    pub credentials: CredentialSet,

    /// Whether the access should be synchronized right away
    #[serde(default)]
    pub sync: bool,
}

impl LoginCredentials {
    /// Create login credentials
    pub fn new(provider_id: impl Into<String>, credentials: CredentialSet, sync: bool) -> Self {
        Self {
            provider_id: provider_id.into(),
            credentials,
            sync,
        }
    }

    /// Replace the credential set, keeping provider id and sync flag
    pub fn try_map_credentials<E, F>(&self, f: F) -> Result<Self, E>
    where
        F: FnMut(&String) -> Result<String, E>,
    {
        Ok(Self {
            provider_id: self.provider_id.clone(),
            credentials: self.credentials.try_map(f)?,
            sync: self.sync,
        })
    }
}

/// Login credentials keyed by bank access id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoginCredentialsMap(BTreeMap<String, LoginCredentials>);

impl LoginCredentialsMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert login credentials for an access id
    pub fn insert(
        &mut self,
        access_id: impl Into<String>,
        credentials: LoginCredentials,
    ) -> Option<LoginCredentials> {
        self.0.insert(access_id.into(), credentials)
    }

    pub fn get(&self, access_id: &str) -> Option<&LoginCredentials> {
        self.0.get(access_id)
    }

    /// Iterate over access ids in order
    pub fn access_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoginCredentials)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a new map by transforming every entry
    pub fn try_map<E, F>(&self, f: F) -> Result<Self, E>
    where
        F: FnMut(&LoginCredentials) -> Result<LoginCredentials, E>,
    {
        try_map_values(&self.0, f).map(Self)
    }
}

impl FromIterator<(String, LoginCredentials)> for LoginCredentialsMap {
    fn from_iter<I: IntoIterator<Item = (String, LoginCredentials)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> CredentialSet {
        [("user", "alice"), ("pin", "1234")].into_iter().collect()
    }

    #[test]
    fn test_try_map_values_keeps_keys() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        map.insert("b", 2);

        let doubled: Result<BTreeMap<&str, i32>, ()> = try_map_values(&map, |v| Ok(v * 2));
        let doubled = doubled.unwrap();

        assert_eq!(doubled.keys().collect::<Vec<_>>(), vec![&"a", &"b"]);
        assert_eq!(doubled["b"], 4);
    }

    #[test]
    fn test_try_map_values_stops_on_error() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);

        let mut calls = 0;
        let result: Result<BTreeMap<&str, i32>, String> = try_map_values(&map, |v| {
            calls += 1;
            if *v == 2 {
                Err("boom".to_string())
            } else {
                Ok(*v)
            }
        });

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_debug_redacts_values() {
        let debug = format!("{:?}", sample_set());
        assert!(debug.contains("user"));
        assert!(debug.contains("pin"));
        assert!(!debug.contains("alice"));
        assert!(!debug.contains("1234"));
    }

    #[test]
    fn test_login_credentials_json_shape() {
        let lc = LoginCredentials::new("bankX", sample_set(), true);
        let json = serde_json::to_value(&lc).unwrap();

        assert_eq!(json["providerId"], "bankX");
        assert_eq!(json["sync"], true);
        assert_eq!(json["credentials"]["user"], "alice");
    }

    #[test]
    fn test_login_credentials_map_from_json() {
        let json = r#"{
            "acc-1": {"providerId": "bankX", "credentials": {"user": "alice"}, "sync": true},
            "acc-2": {"providerId": "bankY", "credentials": {}}
        }"#;
        let map: LoginCredentialsMap = serde_json::from_str(json).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("acc-1").unwrap().credentials.get("user"), Some("alice"));
        assert!(!map.get("acc-2").unwrap().sync);
    }

    #[test]
    fn test_try_map_credentials_preserves_siblings() {
        let lc = LoginCredentials::new("bankX", sample_set(), true);
        let mapped: LoginCredentials = lc
            .try_map_credentials(|v| Ok::<_, ()>(v.to_uppercase()))
            .unwrap();

        assert_eq!(mapped.provider_id, "bankX");
        assert!(mapped.sync);
        assert_eq!(mapped.credentials.get("user"), Some("ALICE"));
    }
}
