//! Catalog sync cycle
//!
//! One cycle fetches market items and crawls wiki mods for every locale,
//! persists both, reconciles them, and commits every slot at once. A failure
//! anywhere in the cycle aborts it before any slot is written.

use crate::reconcile::intersect;
use crate::store::{persist, SnapshotStore, StagedStore};
use market_common::{Locale, Result, Slot};
use std::fmt;

/// Source of tradable item names per locale
pub trait ItemSource {
    fn item_names(&self, locale: Locale) -> Result<Vec<String>>;
}

/// Source of mod names per locale
pub trait ModSource {
    fn mod_names(&self, locale: Locale) -> Result<Vec<String>>;
}

impl<T: ItemSource + ?Sized> ItemSource for &T {
    fn item_names(&self, locale: Locale) -> Result<Vec<String>> {
        (**self).item_names(locale)
    }
}

impl<T: ModSource + ?Sized> ModSource for &T {
    fn mod_names(&self, locale: Locale) -> Result<Vec<String>> {
        (**self).mod_names(locale)
    }
}

/// Where the reconciled (tradable) mod names are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModsSlotPolicy {
    /// `mods_<locale>` keeps every crawled mod, `tradable_mods_<locale>` gets the overlap
    #[default]
    Separate,
    /// Additionally overwrite `mods_<locale>` with the overlap
    OverwriteRaw,
}

/// Counts for one locale after a successful cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    pub locale: Locale,
    pub items: usize,
    pub mods: usize,
    pub tradable_mods: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub policy: ModsSlotPolicy,
    pub locales: Vec<LocaleReport>,
    pub slots_written: usize,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sync complete: {} slots written ({:?})", self.slots_written, self.policy)?;
        for l in &self.locales {
            writeln!(
                f,
                "  {}: {} items, {} mods, {} tradable mods",
                l.locale, l.items, l.mods, l.tradable_mods
            )?;
        }
        Ok(())
    }
}

/// Drives a full sync cycle over injected sources and store
pub struct CatalogSync<I, M> {
    items: I,
    mods: M,
    locales: Vec<Locale>,
    policy: ModsSlotPolicy,
}

impl<I: ItemSource, M: ModSource> CatalogSync<I, M> {
    pub fn new(items: I, mods: M) -> Self {
        Self {
            items,
            mods,
            locales: Locale::ALL.to_vec(),
            policy: ModsSlotPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ModsSlotPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_locales(mut self, locales: Vec<Locale>) -> Self {
        self.locales = locales;
        self
    }

    /// Run one cycle against `store`.
    ///
    /// Writes are staged and only reach `store` once every locale succeeded.
    pub fn run_cycle<S: SnapshotStore + ?Sized>(&self, store: &mut S) -> Result<SyncReport> {
        log::info!(
            "Starting catalog sync for {} locale(s), policy {:?}",
            self.locales.len(),
            self.policy
        );

        let mut staged = StagedStore::new(store);

        let mut item_counts = Vec::with_capacity(self.locales.len());
        for &locale in &self.locales {
            let names = self.items.item_names(locale)?;
            let set = persist(&mut staged, &Slot::items(locale), names)?;
            item_counts.push(set.len());
        }

        let mut crawled = Vec::with_capacity(self.locales.len());
        for &locale in &self.locales {
            let names = self.mods.mod_names(locale)?;
            let set = persist(&mut staged, &Slot::mods(locale), names)?;
            crawled.push((locale, set));
        }

        let mut locales = Vec::with_capacity(self.locales.len());
        for ((locale, mods), item_count) in crawled.into_iter().zip(item_counts) {
            let mod_count = mods.len();
            let common = intersect(&staged, &Slot::items(locale), &mods)?;
            persist(&mut staged, &Slot::tradable_mods(locale), common.iter().cloned())?;
            if self.policy == ModsSlotPolicy::OverwriteRaw {
                persist(&mut staged, &Slot::mods(locale), common.iter().cloned())?;
            }

            log::info!(
                "{}: {} items, {} mods, {} tradable mods",
                locale,
                item_count,
                mod_count,
                common.len()
            );
            locales.push(LocaleReport {
                locale,
                items: item_count,
                mods: mod_count,
                tradable_mods: common.len(),
            });
        }

        let slots_written = staged.commit()?;
        log::info!("Committed {} snapshot slots", slots_written);

        Ok(SyncReport {
            policy: self.policy,
            locales,
            slots_written,
        })
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
