// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub(in crate::message_pool) mod msg_pool;
mod utils;

use std::sync::Arc;

use crate::blocks::Tipset;
use crate::chain::{HeadChange, block_messages};
use crate::message::SignedMessage;
use crate::message_pool::errors::Error;
use ahash::HashMap;
use anyhow::ensure;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use itertools::Itertools as _;
use tokio::sync::broadcast::{Receiver as Subscriber, error::RecvError};
use tracing::{debug, warn};

use msg_pool::MessagePool;
pub use utils::*;

/// Messages carried by a run of tipsets. A message included by several blocks
/// is counted once per block.
#[derive(Debug, Default)]
struct MsgMultiset(HashMap<Cid, (SignedMessage, usize)>);

impl MsgMultiset {
    /// Counts every message carried by the blocks of `tipsets`.
    fn collect<DB: Blockstore>(db: &DB, tipsets: &[Tipset]) -> anyhow::Result<Self> {
        let mut set = Self::default();
        for header in tipsets.iter().flat_map(Tipset::block_headers) {
            let msgs = block_messages(db, header)?;
            for (cid, msg) in header.messages.iter().zip(msgs) {
                set.0.entry(*cid).or_insert((msg, 0)).1 += 1;
            }
        }
        Ok(set)
    }

    fn contains(&self, cid: &Cid) -> bool {
        self.0.contains_key(cid)
    }

    fn occurrences(&self) -> usize {
        self.0.values().map(|(_, count)| count).sum()
    }
}

/// Loads the parent of `child`, which must sit at a lower epoch unless it is
/// the empty root.
fn load_lower_parent<DB: Blockstore>(db: &DB, child: &Tipset) -> anyhow::Result<Tipset> {
    let parent = child.load_parent(db)?;
    ensure!(
        parent.is_empty() || parent.epoch() < child.epoch(),
        "parent {} at epoch {} is not below child {} at epoch {}",
        parent.key(),
        parent.epoch(),
        child.key(),
        child.epoch()
    );
    Ok(parent)
}

/// Walks back from both heads to their common ancestor. Returns the tipsets
/// from `old_head` down to the ancestor and from `new_head` down to the
/// ancestor, each excluding the ancestor itself.
///
/// The side with the greater epoch is stepped first. Neither side steps past
/// the empty root tipset, which is an ancestor of every chain. A parent that
/// does not sit below its child fails the walk.
fn divergent_paths<DB: Blockstore>(
    db: &DB,
    old_head: &Tipset,
    new_head: &Tipset,
) -> anyhow::Result<(Vec<Tipset>, Vec<Tipset>)> {
    let mut left = old_head.clone();
    let mut right = new_head.clone();
    let mut reverted = Vec::new();
    let mut applied = Vec::new();
    while left != right {
        if right.is_empty() || (!left.is_empty() && left.epoch() > right.epoch()) {
            let parent = load_lower_parent(db, &left)?;
            reverted.push(std::mem::replace(&mut left, parent));
        } else {
            let parent = load_lower_parent(db, &right)?;
            applied.push(std::mem::replace(&mut right, parent));
        }
    }
    Ok((reverted, applied))
}

/// Messages reverted and applied by moving the head from `old_head` to
/// `new_head`.
fn collect_head_change<DB: Blockstore>(
    db: &DB,
    old_head: &Tipset,
    new_head: &Tipset,
) -> anyhow::Result<(MsgMultiset, MsgMultiset)> {
    let (rev_path, app_path) = divergent_paths(db, old_head, new_head)?;
    Ok((
        MsgMultiset::collect(db, &rev_path)?,
        MsgMultiset::collect(db, &app_path)?,
    ))
}

/// Reconciles the pool with a move of the chain head from `old_head` to
/// `new_head`.
///
/// Messages included on the path from `old_head` back to the common ancestor
/// and not on the path from `new_head` are pending again and get re-added;
/// messages included on the new path are committed and get removed. All
/// reads from `db` happen before the pool is touched, so a failed lookup
/// leaves the pool unchanged.
pub fn update_message_pool<DB>(
    mpool: &MessagePool,
    db: &DB,
    old_head: &Tipset,
    new_head: &Tipset,
) -> Result<(), Error>
where
    DB: Blockstore,
{
    if old_head == new_head {
        return Ok(());
    }

    let (reverted, applied) =
        collect_head_change(db, old_head, new_head).map_err(Error::ChainResolution)?;

    let readd = reverted
        .0
        .into_iter()
        .filter(|(cid, _)| !applied.contains(cid))
        .map(|(cid, (msg, _))| (cid, msg))
        .collect_vec();
    let removed = applied.0.keys().copied().collect_vec();
    debug!(
        "reconciling message pool from {} to {}: {} messages re-added, {} removed ({} occurrences applied)",
        old_head.key(),
        new_head.key(),
        readd.len(),
        removed.len(),
        applied.occurrences(),
    );

    mpool.apply_head_change(readd, &removed);
    Ok(())
}

/// Reconciles `mpool` with every head received from `subscriber`, starting
/// from `current`. A failed reconciliation keeps the previous head, so the
/// next head change is reconciled across the gap. Returns once the
/// publisher is dropped.
pub async fn head_change_loop<DB>(
    mpool: Arc<MessagePool>,
    db: Arc<DB>,
    mut current: Arc<Tipset>,
    mut subscriber: Subscriber<HeadChange>,
) -> anyhow::Result<()>
where
    DB: Blockstore,
{
    loop {
        match subscriber.recv().await {
            Ok(HeadChange::Apply(new_head)) => {
                match update_message_pool(&mpool, db.as_ref(), &current, &new_head) {
                    Ok(()) => current = new_head,
                    Err(e) => warn!("failed to update message pool to {}: {e}", new_head.key()),
                }
            }
            Err(RecvError::Lagged(e)) => {
                warn!("Head change subscriber lagged: skipping {} events", e);
            }
            Err(RecvError::Closed) => {
                break Ok(());
            }
        }
    }
}
