// Persistence for the paint layer.
//
// The drawing is kept as a single `data:image/png;base64,...` string under one key in a
// small key-value store. Nothing here ever fails loudly: storage problems are logged
// and the caller just sees "not saved" / "nothing to load".

use crate::error::Error;
use base64::Engine;
use image::{ImageFormat, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// String key-value storage, shaped like a browser's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
    /// Removing a missing key is fine.
    fn remove(&mut self, key: &str) -> Result<(), Error>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<local data dir>/stencil-paint`, if the platform has one.
    pub fn in_user_data_dir() -> Option<Self> {
        let mut dir = dirs::data_local_dir()?;
        dir.push(env!("CARGO_PKG_NAME"));
        Some(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are compiled-in constants, but keep them from escaping the directory anyway.
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-memory store with an optional size quota (bytes across all values).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self { entries: HashMap::new(), quota: Some(quota) }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        if let Some(quota) = self.quota {
            let others: usize =
                self.entries.iter().filter(|(k, _)| k.as_str() != key).map(|(_, v)| v.len()).sum();
            let needed = others + value.len();
            if needed > quota {
                return Err(Error::QuotaExceeded { needed, quota });
            }
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.entries.remove(key);
        Ok(())
    }
}

/// PNG-encode a layer as a data URL.
pub fn encode_data_url(image: &RgbaImage) -> Result<String, Error> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    let mut url = String::with_capacity(DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(DATA_URL_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(&png, &mut url);
    Ok(url)
}

/// Inverse of [`encode_data_url`].
pub fn decode_data_url(url: &str) -> Result<RgbaImage, Error> {
    let payload = url.trim().strip_prefix(DATA_URL_PREFIX).ok_or(Error::NotADataUrl)?;
    let png = base64::engine::general_purpose::STANDARD.decode(payload)?;
    Ok(image::load_from_memory_with_format(&png, ImageFormat::Png)?.to_rgba8())
}

/// A saved drawing being decoded off the frame thread.
///
/// `load` hands this out as soon as it knows the key exists; the pixels arrive later.
/// Poll it once per frame, or `wait` when blocking is fine (startup, tests).
#[derive(Debug)]
pub struct PendingLoad {
    rx: crossbeam::channel::Receiver<Result<RgbaImage, Error>>,
}

impl PendingLoad {
    fn spawn(url: String) -> Self {
        let (tx, rx) = crossbeam::channel::bounded(1);
        std::thread::spawn(move || {
            // The receiver may already be gone; nothing to do then.
            let _ = tx.send(decode_data_url(&url));
        });
        Self { rx }
    }

    /// `None` while decoding; `Some` exactly once when finished.
    pub fn poll(&self) -> Option<Result<RgbaImage, Error>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(crossbeam::channel::TryRecvError::Empty) => None,
            Err(crossbeam::channel::TryRecvError::Disconnected) => Some(Err(Error::DecodeDisconnected)),
        }
    }

    pub fn wait(self) -> Result<RgbaImage, Error> {
        self.rx.recv().map_err(|_| Error::DecodeDisconnected)?
    }
}

/// The persistence adapter: the paint layer under one fixed key.
#[derive(Debug)]
pub struct DrawingStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> DrawingStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Encode and store. Returns whether the drawing is now saved; failures are logged.
    pub fn save(&mut self, image: &RgbaImage) -> bool {
        let result = encode_data_url(image).and_then(|url| self.store.set(&self.key, &url));
        match result {
            Ok(()) => {
                log::debug!("saved {}x{} drawing under {:?}", image.width(), image.height(), self.key);
                true
            }
            Err(e) => {
                log::error!("Error saving drawing: {e}");
                false
            }
        }
    }

    /// Start loading the saved drawing. `None` means there is nothing (readable) to load.
    /// `Some` only says the key exists; decode errors surface from the [`PendingLoad`].
    pub fn load(&self) -> Option<PendingLoad> {
        match self.store.get(&self.key) {
            Ok(Some(url)) if !url.is_empty() => Some(PendingLoad::spawn(url)),
            Ok(_) => None,
            Err(e) => {
                log::error!("Error loading drawing: {e}");
                None
            }
        }
    }

    /// Forget the saved drawing.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(&self.key) {
            log::error!("Error clearing drawing: {e}");
        }
    }

    pub fn has_saved(&self) -> bool {
        matches!(self.store.get(&self.key), Ok(Some(ref v)) if !v.is_empty())
    }
}
