//! Snapshot slot storage
//!
//! A slot holds one deduplicated, sorted entity name set. On disk each slot is a
//! plain UTF-8 file named after the slot, one name per line, no header.

use market_common::{CatalogError, NameSet, Result, Slot};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value access to snapshot slots
pub trait SnapshotStore {
    /// Read a slot; `Ok(None)` if it was never written
    fn get(&self, slot: &Slot) -> Result<Option<NameSet>>;

    /// Replace a slot's contents
    fn put(&mut self, slot: &Slot, names: &NameSet) -> Result<()>;

    /// Replace several slots at once
    fn put_all(&mut self, entries: &[(Slot, NameSet)]) -> Result<()> {
        for (slot, names) in entries {
            self.put(slot, names)?;
        }
        Ok(())
    }
}

/// Canonical form of one name as stored in a slot file.
///
/// Surrounding whitespace is trimmed and embedded line breaks become a single
/// space, so the name survives a write and read as one line. `None` if nothing
/// is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    let name = raw
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!name.is_empty()).then_some(name)
}

/// Normalize `elements`, deduplicate and sort them, and overwrite `slot` with
/// the result.
///
/// Returns the set that was written. Reading the slot back yields the same set.
pub fn persist<S, I, T>(store: &mut S, slot: &Slot, elements: I) -> Result<NameSet>
where
    S: SnapshotStore + ?Sized,
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let names: NameSet = elements
        .into_iter()
        .filter_map(|element| normalize_name(&element.into()))
        .collect();
    store.put(slot, &names)?;
    log::debug!("Persisted {} names to slot {}", names.len(), slot);
    Ok(names)
}

/// Canonical on-disk form: every name followed by `\n`
pub fn render_snapshot(names: &NameSet) -> String {
    let mut out = String::with_capacity(names.iter().map(|n| n.len() + 1).sum());
    for name in names {
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Parse a slot file, tolerating CRLF endings, blank lines and a missing final newline
pub fn parse_snapshot(text: &str) -> NameSet {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// One file per slot inside a data directory
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `slot`
    pub fn path(&self, slot: &Slot) -> PathBuf {
        self.dir.join(slot.name())
    }

    fn temp_path(&self, slot: &Slot) -> PathBuf {
        self.dir.join(format!(".{}.tmp", slot.name()))
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| CatalogError::io(&self.dir, e))
    }

    fn write_temp(&self, slot: &Slot, names: &NameSet) -> Result<PathBuf> {
        let tmp = self.temp_path(slot);
        fs::write(&tmp, render_snapshot(names)).map_err(|e| CatalogError::io(&tmp, e))?;
        Ok(tmp)
    }

    fn backup_path(&self, slot: &Slot) -> PathBuf {
        self.dir.join(format!(".{}.bak", slot.name()))
    }

    fn promote(&self, tmp: &Path, slot: &Slot) -> Result<()> {
        let target = self.path(slot);
        fs::rename(tmp, &target).map_err(|e| CatalogError::io(&target, e))
    }

    /// Copy the current slot file aside. `None` if the slot has no file yet.
    fn back_up(&self, slot: &Slot) -> Result<Option<PathBuf>> {
        let target = self.path(slot);
        match fs::symlink_metadata(&target) {
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CatalogError::io(target, e)),
            Ok(meta) if !meta.is_file() => {
                let reason = "slot path is not a regular file";
                return Err(CatalogError::io(
                    &target,
                    std::io::Error::new(ErrorKind::InvalidInput, reason),
                ));
            }
            Ok(_) => {}
        }
        let backup = self.backup_path(slot);
        fs::copy(&target, &backup).map_err(|e| CatalogError::io(&backup, e))?;
        Ok(Some(backup))
    }

    /// Put a promoted slot back the way it was before `put_all`
    fn restore(&self, slot: &Slot, backup: Option<&PathBuf>) {
        let target = self.path(slot);
        let restored = match backup {
            Some(backup) => fs::rename(backup, &target),
            None => fs::remove_file(&target),
        };
        if let Err(e) = restored {
            log::error!("Failed to restore slot {}: {}", target.display(), e);
        }
    }
}

fn remove_quietly<'p>(paths: impl IntoIterator<Item = &'p PathBuf>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn get(&self, slot: &Slot) -> Result<Option<NameSet>> {
        let path = self.path(slot);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(parse_snapshot(&text))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CatalogError::io(path, e)),
        }
    }

    fn put(&mut self, slot: &Slot, names: &NameSet) -> Result<()> {
        self.ensure_dir()?;
        let tmp = self.write_temp(slot, names)?;
        self.promote(&tmp, slot)
    }

    /// All-or-nothing: every temp file is written and every existing slot
    /// file backed up before any rename. If a rename fails, the slots already
    /// promoted are restored from their backups.
    fn put_all(&mut self, entries: &[(Slot, NameSet)]) -> Result<()> {
        self.ensure_dir()?;

        let mut staged = Vec::with_capacity(entries.len());
        for (slot, names) in entries {
            match self.write_temp(slot, names) {
                Ok(tmp) => staged.push((tmp, *slot)),
                Err(e) => {
                    remove_quietly(staged.iter().map(|(tmp, _)| tmp));
                    return Err(e);
                }
            }
        }

        let mut backups = Vec::with_capacity(staged.len());
        for (_, slot) in &staged {
            match self.back_up(slot) {
                Ok(backup) => backups.push(backup),
                Err(e) => {
                    remove_quietly(staged.iter().map(|(tmp, _)| tmp));
                    remove_quietly(backups.iter().flatten());
                    return Err(e);
                }
            }
        }

        for (index, (tmp, slot)) in staged.iter().enumerate() {
            if let Err(e) = self.promote(tmp, slot) {
                log::warn!("Rolling back {} promoted slot(s) after: {}", index, e);
                for ((_, done), backup) in staged[..index].iter().zip(&backups) {
                    self.restore(done, backup.as_ref());
                }
                remove_quietly(staged[index..].iter().map(|(tmp, _)| tmp));
                remove_quietly(backups[index..].iter().flatten());
                return Err(e);
            }
        }

        remove_quietly(backups.iter().flatten());
        Ok(())
    }
}

/// In-memory slots, used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    slots: BTreeMap<Slot, NameSet>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, slot: &Slot) -> Option<&NameSet> {
        self.slots.get(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, slot: &Slot) -> Result<Option<NameSet>> {
        Ok(self.slots.get(slot).cloned())
    }

    fn put(&mut self, slot: &Slot, names: &NameSet) -> Result<()> {
        self.slots.insert(*slot, names.clone());
        Ok(())
    }
}

/// Buffers writes over another store until `commit`.
///
/// Reads see staged writes first, then fall through to the underlying store.
pub struct StagedStore<'a, S: SnapshotStore + ?Sized> {
    inner: &'a mut S,
    staged: BTreeMap<Slot, NameSet>,
}

impl<'a, S: SnapshotStore + ?Sized> StagedStore<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            staged: BTreeMap::new(),
        }
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Flush every staged slot to the underlying store, returning how many were written
    pub fn commit(self) -> Result<usize> {
        let entries: Vec<(Slot, NameSet)> = self.staged.into_iter().collect();
        self.inner.put_all(&entries)?;
        Ok(entries.len())
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for StagedStore<'_, S> {
    fn get(&self, slot: &Slot) -> Result<Option<NameSet>> {
        match self.staged.get(slot) {
            Some(names) => Ok(Some(names.clone())),
            None => self.inner.get(slot),
        }
    }

    fn put(&mut self, slot: &Slot, names: &NameSet) -> Result<()> {
        self.staged.insert(*slot, names.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
