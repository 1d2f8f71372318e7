// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded OCR result cache keyed by content fingerprint.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use poacheck_core::config::OcrSettings;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::backend::OcrOutput;

/// Least-recently-used cache of OCR results.
///
/// Shared between concurrent extractions; a single mutex guards the map and
/// recency queue. Contention is negligible next to the cost of OCR itself.
pub struct OcrCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, OcrOutput>,
    /// Keys from least to most recently used.
    order: VecDeque<String>,
}

impl CacheState {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

impl OcrCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Cache key for an image under the given OCR settings. Settings that
    /// change the recognised text are part of the key.
    pub fn key_for(image: &[u8], settings: &OcrSettings) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            fingerprint(image),
            settings.language,
            settings.preprocess,
            settings.page_segmentation.psm(),
            settings.engine_mode.oem()
        )
    }

    pub fn get(&self, key: &str) -> Option<OcrOutput> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let hit = state.entries.get(key).cloned();
        if hit.is_some() {
            state.touch(key);
        }
        hit
    }

    /// Store a result, evicting the least recently used entries if full.
    pub fn insert(&self, key: String, output: OcrOutput) {
        if self.capacity == 0 {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.entries.insert(key.clone(), output).is_some() {
            state.touch(&key);
            return;
        }
        state.order.push_back(key);
        while state.order.len() > self.capacity {
            if let Some(evicted) = state.order.pop_front() {
                state.entries.remove(&evicted);
                debug!(key = %evicted, "Evicted OCR cache entry");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// SHA-256 of `data` as lowercase hex.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
