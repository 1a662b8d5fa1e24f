//! Public key lookup.
//!
//! The engine never decides where keys come from. A [`PublicKeyRetriever`]
//! is injected wherever a host's key is needed; this module provides the
//! trait and two implementations: a static table and a cache around any
//! other retriever.

use std::collections::{HashMap, HashSet, VecDeque};
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};

use credkernel_core::{HostIdentifier, PublicKey, Time};

use crate::error::KeyLookupError;

/// Looks up the public key a host used at a given time.
///
/// Implementations may perform I/O; their own timeout behavior applies.
pub trait PublicKeyRetriever: Send + Sync {
    /// The key of `host` that was valid at `time`.
    fn retrieve(&self, host: &HostIdentifier, time: Time) -> Result<PublicKey, KeyLookupError>;

    /// Whether `host` is still an active signer.
    fn is_active(&self, _host: &HostIdentifier) -> Result<bool, KeyLookupError> {
        Ok(true)
    }
}

impl<R: PublicKeyRetriever + ?Sized> PublicKeyRetriever for Arc<R> {
    fn retrieve(&self, host: &HostIdentifier, time: Time) -> Result<PublicKey, KeyLookupError> {
        (**self).retrieve(host, time)
    }

    fn is_active(&self, host: &HostIdentifier) -> Result<bool, KeyLookupError> {
        (**self).is_active(host)
    }
}

impl<R: PublicKeyRetriever + ?Sized> PublicKeyRetriever for &R {
    fn retrieve(&self, host: &HostIdentifier, time: Time) -> Result<PublicKey, KeyLookupError> {
        (**self).retrieve(host, time)
    }

    fn is_active(&self, host: &HostIdentifier) -> Result<bool, KeyLookupError> {
        (**self).is_active(host)
    }
}

/// A retriever for when none has been configured. Every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetriever;

impl PublicKeyRetriever for NoRetriever {
    fn retrieve(&self, _host: &HostIdentifier, _time: Time) -> Result<PublicKey, KeyLookupError> {
        Err(KeyLookupError::NoRetriever)
    }

    fn is_active(&self, _host: &HostIdentifier) -> Result<bool, KeyLookupError> {
        Err(KeyLookupError::NoRetriever)
    }
}

/// An in-memory table of host keys.
///
/// Each host has a chain of keys, each valid from its start time until the
/// next key starts. Filled once at startup, read afterwards.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyRetriever {
    keys: HashMap<HostIdentifier, Vec<(Time, PublicKey)>>,
    inactive: HashSet<HostIdentifier>,
}

impl StaticKeyRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key for `host`, valid from `valid_from`.
    pub fn insert(&mut self, host: HostIdentifier, valid_from: Time, key: PublicKey) {
        let chain = self.keys.entry(host).or_default();
        match chain.binary_search_by_key(&valid_from, |(t, _)| *t) {
            Ok(i) => chain[i] = (valid_from, key),
            Err(i) => chain.insert(i, (valid_from, key)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_key(mut self, host: HostIdentifier, valid_from: Time, key: PublicKey) -> Self {
        self.insert(host, valid_from, key);
        self
    }

    /// Mark `host` as no longer signing.
    pub fn deactivate(&mut self, host: HostIdentifier) {
        self.inactive.insert(host);
    }
}

impl PublicKeyRetriever for StaticKeyRetriever {
    fn retrieve(&self, host: &HostIdentifier, time: Time) -> Result<PublicKey, KeyLookupError> {
        self.keys
            .get(host)
            .and_then(|chain| chain.iter().rev().find(|(start, _)| *start <= time))
            .map(|(_, key)| key.clone())
            .ok_or_else(|| KeyLookupError::NotFound {
                host: host.clone(),
                time,
            })
    }

    fn is_active(&self, host: &HostIdentifier) -> Result<bool, KeyLookupError> {
        Ok(!self.inactive.contains(host))
    }
}

/// Memoizes successful lookups of another retriever.
///
/// Entries are keyed by the exact lookup time, since the cache cannot know
/// when the inner retriever's keys rotate. Credential lookups all use
/// half-hour issuance slots and share entries. Failures are not cached.
/// Once `capacity` keys are held, the oldest entry is evicted first.
pub struct CachingRetriever<R> {
    inner: R,
    capacity: NonZeroUsize,
    cache: RwLock<KeyCache>,
}

#[derive(Default)]
struct KeyCache {
    keys: HashMap<(HostIdentifier, Time), PublicKey>,
    insertion_order: VecDeque<(HostIdentifier, Time)>,
}

impl<R: PublicKeyRetriever> CachingRetriever<R> {
    /// Default number of keys held.
    pub const DEFAULT_CAPACITY: usize = 1_024;

    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    /// A cache holding at most `capacity` keys (at least one).
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            capacity: NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            cache: RwLock::new(KeyCache::default()),
        }
    }

    /// The wrapped retriever.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        match self.cache.read() {
            Ok(cache) => cache.keys.len(),
            Err(poisoned) => poisoned.into_inner().keys.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached key.
    pub fn clear(&self) {
        let mut cache = match self.cache.write() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.keys.clear();
        cache.insertion_order.clear();
    }
}

impl KeyCache {
    fn insert(&mut self, slot: (HostIdentifier, Time), key: PublicKey, capacity: usize) {
        if self.keys.insert(slot.clone(), key).is_some() {
            return;
        }
        self.insertion_order.push_back(slot);
        while self.keys.len() > capacity {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.keys.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

impl<R: PublicKeyRetriever> PublicKeyRetriever for CachingRetriever<R> {
    fn retrieve(&self, host: &HostIdentifier, time: Time) -> Result<PublicKey, KeyLookupError> {
        let slot = (host.clone(), time);

        // A poisoned lock only means another reader panicked; the map is
        // still consistent, so keep using it.
        let cached = match self.cache.read() {
            Ok(cache) => cache.keys.get(&slot).cloned(),
            Err(poisoned) => poisoned.into_inner().keys.get(&slot).cloned(),
        };
        if let Some(key) = cached {
            return Ok(key);
        }

        let key = self.inner.retrieve(host, time)?;
        tracing::debug!(%host, %time, fingerprint = %key.fingerprint(), "caching public key");
        let mut cache = match self.cache.write() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.insert(slot, key.clone(), self.capacity.get());
        Ok(key)
    }

    fn is_active(&self, host: &HostIdentifier) -> Result<bool, KeyLookupError> {
        self.inner.is_active(host)
    }
}
