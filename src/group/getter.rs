//! Source Loader Module
//!
//! The callback a group uses to produce a value on a local miss.

use async_trait::async_trait;

// == Getter ==
/// Loads the authoritative value for a key.
///
/// Only called when the key is missing locally and is owned by this node
/// (or its owner could not be reached).
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

// == Getter Func ==
/// Adapts a plain closure into a [`Getter`].
///
/// ```ignore
/// let getter = GetterFunc::new(|key: &str| Ok(key.as_bytes().to_vec()));
/// ```
pub struct GetterFunc<F>(F);

impl<F> GetterFunc<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Getter for GetterFunc<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}
