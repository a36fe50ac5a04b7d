//! Remote-then-local fallback chain for one collection.
//!
//! # Responsibility
//! - Compose the two tiers with an explicit precedence order.
//! - Track which tier last persisted the collection.
//!
//! # Invariants
//! - Precedence is Remote then Local; the remote tier is only consulted
//!   while configured and not latched away.
//! - Once any remote attempt fails, the chain stays on the local tier for
//!   the remainder of the session (no per-call oscillation).
//! - Write failures at the final tier are swallowed with a warning; only
//!   `load` can surface an error to the owning store.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::local::LocalCollection;
use super::{PersistResult, RecordStore, Tier, WriteOp};

/// Two-tier persistence chain used by a store for one collection.
pub struct FallbackChain<T> {
    collection: &'static str,
    remote: Option<Box<dyn RecordStore<T>>>,
    local: LocalCollection<T>,
    latched_local: bool,
    last_writer: Option<Tier>,
}

impl<T> FallbackChain<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Chain with an optional remote tier in front of the local fallback.
    pub fn new(
        collection: &'static str,
        remote: Option<Box<dyn RecordStore<T>>>,
        local: LocalCollection<T>,
    ) -> Self {
        Self {
            collection,
            remote,
            local,
            latched_local: false,
            last_writer: None,
        }
    }

    /// Chain with no remote tier; the local fallback is authoritative.
    pub fn local_only(collection: &'static str, local: LocalCollection<T>) -> Self {
        Self::new(collection, None, local)
    }

    /// Tier the next operation will try first.
    pub fn active_tier(&self) -> Tier {
        if self.remote.is_some() && !self.latched_local {
            Tier::Remote
        } else {
            Tier::Local
        }
    }

    /// Tier that most recently persisted this collection, if any write
    /// succeeded this session.
    pub fn last_writer(&self) -> Option<Tier> {
        self.last_writer
    }

    /// Loads the collection from the active tier.
    ///
    /// A remote failure latches the chain to local and falls through; only
    /// a local-tier failure propagates.
    pub fn load(&mut self) -> PersistResult<Vec<T>> {
        if let Some(remote) = self.active_remote() {
            match remote.load() {
                Ok(records) => {
                    debug!(
                        "event=chain_load module=persist status=ok collection={} tier=remote records={}",
                        self.collection,
                        records.len()
                    );
                    return Ok(records);
                }
                Err(err) => self.latch_to_local("load", &err),
            }
        }
        self.local.load()
    }

    /// Persists one mutation, best effort.
    ///
    /// Remote failures fall through to a whole-collection local save;
    /// a local failure is swallowed and the in-memory state remains the
    /// only copy for the rest of the session.
    pub fn persist(&mut self, op: WriteOp<'_, T>, snapshot: &[T]) {
        let op_name = op.name();
        if let Some(remote) = self.active_remote() {
            match remote.apply(op, snapshot) {
                Ok(()) => {
                    self.last_writer = Some(Tier::Remote);
                    debug!(
                        "event=chain_write module=persist status=ok collection={} tier=remote op={op_name}",
                        self.collection
                    );
                    return;
                }
                Err(err) => self.latch_to_local(op_name, &err),
            }
        }

        match self.local.apply(op, snapshot) {
            Ok(()) => {
                self.last_writer = Some(Tier::Local);
                debug!(
                    "event=chain_write module=persist status=ok collection={} tier=local op={op_name}",
                    self.collection
                );
            }
            Err(err) => warn!(
                "event=chain_write module=persist status=error collection={} tier=local op={op_name} error={err}",
                self.collection
            ),
        }
    }

    fn active_remote(&self) -> Option<&dyn RecordStore<T>> {
        if self.latched_local {
            None
        } else {
            self.remote.as_deref()
        }
    }

    fn latch_to_local(&mut self, op_name: &str, err: &super::PersistError) {
        warn!(
            "event=chain_fallback module=persist status=latched collection={} op={op_name} error={err}",
            self.collection
        );
        self.latched_local = true;
    }
}
