// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::msg_pool::MessagePool;
use crate::message::{Message as _, SignedMessage};
use crate::shim::address::{Address, address_sort_key};

/// Orders messages by sender, then by ascending sequence within each sender,
/// which is the order a block must include them in. Senders are ordered by
/// their byte encoding. The sort is stable.
pub fn order_messages_by_nonce(mut msgs: Vec<SignedMessage>) -> Vec<SignedMessage> {
    msgs.sort_by_cached_key(|msg| (address_sort_key(&msg.from()), msg.sequence()));
    msgs
}

/// Returns the largest sequence among the messages pending for `addr`, or
/// [`None`] if there are none.
pub fn largest_nonce(mpool: &MessagePool, addr: &Address) -> Option<u64> {
    mpool
        .pending_for(addr)
        .iter()
        .map(|msg| msg.sequence())
        .max()
}

/// Sequence the next message from `addr` should use, given what is pending.
pub fn next_nonce(mpool: &MessagePool, addr: &Address) -> u64 {
    largest_nonce(mpool, addr).map_or(0, |nonce| nonce + 1)
}
