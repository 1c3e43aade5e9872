//! Index-space search shared by both attacks.
//!
//! With one worker the search runs inline. With more, worker `w` probes
//! indices `w, w + k, w + 2k, ...` on a scoped thread with its own
//! state, and the lowest matching index wins regardless of which
//! thread finishes first.

use crate::bits::BitSequence;
use std::sync::atomic::{AtomicU64, Ordering};

/// A successful decryption.
#[derive(Debug, Clone)]
pub(crate) struct Hit {
    pub(crate) bits: BitSequence,
    pub(crate) plaintext: String,
}

/// Finds the lowest index in `[0, bound)` for which `probe` hits.
///
/// `init` builds one piece of per-worker state; it is never shared.
/// A panicking worker panics the caller.
pub(crate) fn lowest_match<S, I, P>(
    bound: u64,
    workers: usize,
    init: I,
    probe: P,
) -> Option<(u64, Hit)>
where
    I: Fn() -> S + Sync,
    P: Fn(&mut S, u64) -> Option<Hit> + Sync,
{
    if workers <= 1 {
        let mut state = init();
        return (0..bound).find_map(|idx| probe(&mut state, idx).map(|hit| (idx, hit)));
    }

    let stride = workers as u64;
    let best = AtomicU64::new(u64::MAX);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..stride)
            .map(|worker| {
                let (best, init, probe) = (&best, &init, &probe);
                s.spawn(move || {
                    let mut state = init();
                    let mut idx = worker;
                    while idx < bound && idx <= best.load(Ordering::Relaxed) {
                        if let Some(hit) = probe(&mut state, idx) {
                            best.fetch_min(idx, Ordering::Relaxed);
                            return Some((idx, hit));
                        }
                        idx += stride;
                    }
                    None
                })
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|handle| match handle.join() {
                Ok(found) => found,
                // An unsearched stride would make exhaustion a false negative.
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .min_by_key(|(idx, _)| *idx)
    })
}
