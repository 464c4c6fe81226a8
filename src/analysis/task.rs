use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// One invocation of an analyzer's `analyze` method: positional arguments
/// plus keyword arguments.
///
/// Keyword arguments live in a `BTreeMap` so the serialized form is
/// deterministic regardless of insertion order; that determinism is what
/// makes [`TaskCall::digest`] a stable cache key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskCall {
    pub args: Vec<Value>,
    pub kwargs: BTreeMap<String, Value>,
}

impl TaskCall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I>(args: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self {
            args: args.into_iter().collect(),
            kwargs: BTreeMap::new(),
        }
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }

    /// Content digest of this call: SHA-256 over the canonical JSON
    /// encoding of `(args, kwargs)`. Equal arguments produce equal digests,
    /// differing arguments differing ones.
    pub fn digest(&self) -> Result<TaskDigest, serde_json::Error> {
        let encoded = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        Ok(TaskDigest(hasher.finalize().to_vec()))
    }
}

/// Stable byte-level key for a task's arguments.
///
/// Produced by [`TaskCall::digest`]; arbitrary bytes are accepted through
/// [`TaskDigest::from_bytes`] so callers carrying a cache across runs can
/// pre-seed entries they derived themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskDigest(Vec<u8>);

impl TaskDigest {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TaskDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", STANDARD.encode(&self.0))
    }
}
