use crate::constants::{API_KEY_PARAM, API_SIG_PARAM};
use crate::transport::model::Params;
use md5::{Digest, Md5};
use std::fmt;

/// Computes Flickr request signatures.
///
/// The signed string is `secret + "api_key" + api_key` followed by every other
/// parameter as `key + value`, keys in byte order, without separators. The digest
/// is MD5 rendered as lowercase hex.
#[derive(Clone)]
pub struct Signer {
    api_key: String,
    secret: String,
}

impl Signer {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Signs `params`. `api_key` and `api_sig` entries are ignored, the key
    /// configured on the signer is always the one that gets signed.
    pub fn sign<I, K, V>(&self, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let mut pairs: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.to_string()))
            .filter(|(k, _)| k != API_KEY_PARAM && k != API_SIG_PARAM)
            .collect();
        pairs.sort();

        let mut hasher = Md5::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(API_KEY_PARAM.as_bytes());
        hasher.update(self.api_key.as_bytes());
        for (key, value) in &pairs {
            hasher.update(key.as_bytes());
            hasher.update(value.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Returns `params` with `api_key` and a matching `api_sig` added.
    pub fn signed(&self, mut params: Params) -> Params {
        let sig = self.sign(params.iter());
        params.insert(API_KEY_PARAM.to_string(), self.api_key.clone());
        params.insert(API_SIG_PARAM.to_string(), sig);
        params
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("api_key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
