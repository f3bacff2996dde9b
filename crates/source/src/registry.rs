use crate::store::KeyValueStore;
use crate::{Result, SourceError};
use flowmap_protocol::DataSourceRecord;

pub const SOURCES_KEY: &str = "attention-visualization-data-sources";
pub const CURRENT_SOURCE_KEY: &str = "attention-visualization-current-source";

/// The user's list of data sources and which one is loaded.
///
/// An empty or missing list is seeded with the built-in demo record. The
/// demo record cannot be removed.
#[derive(Debug)]
pub struct DataSourceRegistry<S: KeyValueStore> {
    store: S,
    sources: Vec<DataSourceRecord>,
    current: Option<usize>,
}

impl<S: KeyValueStore> DataSourceRegistry<S> {
    pub fn load(mut store: S) -> Result<Self> {
        let stored: Vec<DataSourceRecord> = match store.get(SOURCES_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        let sources = if stored.is_empty() {
            log::info!("no stored data sources, seeding the demo source");
            let seeded = vec![DataSourceRecord::demo()];
            store.set(SOURCES_KEY, &serde_json::to_string(&seeded)?)?;
            seeded
        } else {
            stored
        };

        let current = store
            .get(CURRENT_SOURCE_KEY)?
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&i| i < sources.len())
            .or_else(|| (!sources.is_empty()).then_some(0));

        Ok(Self {
            store,
            sources,
            current,
        })
    }

    pub fn sources(&self) -> &[DataSourceRecord] {
        &self.sources
    }

    /// Source loaded at startup: the first stored one.
    pub fn initial_source(&self) -> Option<&DataSourceRecord> {
        self.sources.first()
    }

    pub fn current(&self) -> Option<&DataSourceRecord> {
        self.current.and_then(|i| self.sources.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Append a source and make it current. Returns its position.
    pub fn add(&mut self, record: DataSourceRecord) -> Result<usize> {
        if record.name.trim().is_empty() {
            return Err(SourceError::Registry("source name is empty".into()));
        }
        if record.url.trim().is_empty() {
            return Err(SourceError::Registry(format!(
                "source '{}' has an empty url",
                record.name
            )));
        }
        log::info!("adding data source '{}' ({})", record.name, record.url);
        self.sources.push(record);
        let index = self.sources.len() - 1;
        self.current = Some(index);
        self.persist()?;
        Ok(index)
    }

    pub fn remove(&mut self, index: usize) -> Result<DataSourceRecord> {
        let record = self.get(index)?;
        if record.is_demo() {
            return Err(SourceError::Registry(
                "the demo source cannot be removed".into(),
            ));
        }
        let removed = self.sources.remove(index);
        self.current = match self.current {
            Some(i) if i == index => None,
            Some(i) if i > index => Some(i - 1),
            other => other,
        };
        log::info!("removed data source '{}'", removed.name);
        self.persist()?;
        Ok(removed)
    }

    pub fn select(&mut self, index: usize) -> Result<&DataSourceRecord> {
        self.get(index)?;
        self.current = Some(index);
        self.persist()?;
        Ok(&self.sources[index])
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn get(&self, index: usize) -> Result<&DataSourceRecord> {
        self.sources.get(index).ok_or_else(|| {
            SourceError::Registry(format!(
                "no data source at position {index} ({} stored)",
                self.sources.len()
            ))
        })
    }

    fn persist(&mut self) -> Result<()> {
        self.store
            .set(SOURCES_KEY, &serde_json::to_string(&self.sources)?)?;
        let current = self.current.map(|i| i.to_string()).unwrap_or_default();
        self.store.set(CURRENT_SOURCE_KEY, &current)
    }
}
