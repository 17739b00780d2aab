use super::validate::Finding;
use super::validate::Report;
use super::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::PoisonError;
use std::sync::RwLock;

/// Anything that can resolve a deck by name.
///
/// Unknown or unreadable decks come back empty; callers treat an empty
/// deck as "not found".
pub trait Decks: Send + Sync {
    fn load(&self, name: &str, shuffle: bool) -> Deck;
    fn names(&self) -> Vec<String>;
    /// Picks up decks added or removed since the store was opened.
    fn reload(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// In-memory deck store, mostly useful for embedding fixed decks.
impl Decks for HashMap<String, Deck> {
    fn load(&self, name: &str, shuffle: bool) -> Deck {
        let mut deck = self.get(name).cloned().unwrap_or_default();
        if shuffle {
            deck.shuffle(&mut rand::rng());
        }
        deck
    }
    fn names(&self) -> Vec<String> {
        let mut names = self.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }
}

/// Folder of JSON decks indexed by a quiz list.
///
/// The quiz list is a JSON object mapping quiz names to file names inside
/// the folder. Entries whose files are missing are dropped on (re)load.
pub struct Library {
    listing: PathBuf,
    folder: PathBuf,
    index: RwLock<HashMap<String, String>>,
}

impl Library {
    pub fn open<L, F>(listing: L, folder: F) -> anyhow::Result<Self>
    where
        L: AsRef<Path>,
        F: AsRef<Path>,
    {
        let library = Self {
            listing: listing.as_ref().to_path_buf(),
            folder: folder.as_ref().to_path_buf(),
            index: RwLock::new(HashMap::new()),
        };
        library.reload()?;
        Ok(library)
    }
    /// Re-reads the quiz list from disk, replacing the current index.
    pub fn reload(&self) -> anyhow::Result<()> {
        let file = std::fs::File::open(&self.listing)
            .inspect_err(|e| log::error!("[library] reading quiz list: {}", e))?;
        let mut index = serde_json::from_reader::<_, HashMap<String, String>>(file)
            .inspect_err(|e| log::error!("[library] parsing quiz list: {}", e))?;
        index.retain(|name, file| {
            let exists = self.folder.join(&*file).exists();
            if !exists {
                log::warn!("[library] dropping {}: {} is missing", name, file);
            }
            exists
        });
        log::info!("[library] indexed {} quizzes", index.len());
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = index;
        Ok(())
    }
    /// Full path of the deck file behind `name`.
    pub fn path(&self, name: &str) -> Option<PathBuf> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|file| self.folder.join(file))
    }
    /// Reads a deck, surfacing why it could not be read.
    pub fn read(&self, name: &str) -> anyhow::Result<Deck> {
        let path = self
            .path(name)
            .ok_or_else(|| anyhow::anyhow!("unknown quiz: {}", name))?;
        let file = std::fs::File::open(&path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
    /// Checks the named decks in parallel for duplicate questions and
    /// answers. With `fix`, a merged copy is written next to each faulty
    /// deck as `<file>.fix`.
    pub fn validate(&self, names: &[String], fix: bool) -> Vec<(String, Vec<Finding>)> {
        names
            .par_iter()
            .map(|name| {
                log::info!("[{}] running checks...", name);
                let report = match self.read(name) {
                    Ok(deck) => validate::check_duplicates(&deck),
                    Err(e) => {
                        log::error!("[{}] unreadable: {}", name, e);
                        return (name.clone(), Vec::new());
                    }
                };
                if fix && !report.findings.is_empty() {
                    if let Err(e) = self.write_fix(name, &report) {
                        log::error!("[{}] writing fix: {}", name, e);
                    }
                }
                log::info!("[{}] validation complete", name);
                (name.clone(), report.findings)
            })
            .collect()
    }
    fn write_fix(&self, name: &str, report: &Report) -> anyhow::Result<()> {
        let mut path = self
            .path(name)
            .ok_or_else(|| anyhow::anyhow!("unknown quiz: {}", name))?
            .into_os_string();
        path.push(".fix");
        let json = serde_json::to_string_pretty(&report.fixed)?;
        std::fs::write(&path, json)?;
        log::info!("[{}] generated fixed file {:?}", name, path);
        Ok(())
    }
}

impl Decks for Library {
    fn load(&self, name: &str, shuffle: bool) -> Deck {
        let mut deck = self
            .read(name)
            .inspect_err(|e| log::error!("[library] loading '{}': {}", name, e))
            .unwrap_or_default();
        if shuffle {
            deck.shuffle(&mut rand::rng());
        }
        deck
    }
    fn names(&self) -> Vec<String> {
        let mut names = self
            .index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();
        names
    }
    fn reload(&self) -> anyhow::Result<()> {
        Library::reload(self)
    }
}
