//! Driver registry and search entry points.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::config::{DriverConfig, SearchConfig};
use crate::document::DocumentBatch;
use crate::driver::elastic::ClientConnector;
use crate::driver::{Driver, ElasticDriver, MemoryDriver, NullDriver};
use crate::error::{Result, SearchlightError};
use crate::query::QueryBuilder;
use crate::result::{PagedResultCollection, ResultCollection};
use crate::searchable::Searchable;

/// Named drivers plus the default one.
///
/// Constructed once by the host application and passed by reference.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use searchlight::driver::MemoryDriver;
/// use searchlight::manager::SearchManager;
/// use searchlight::query::MatchOptions;
///
/// let manager = SearchManager::new()
///     .with_driver("memory", Arc::new(MemoryDriver::new()))
///     .with_default_driver("memory")
///     .unwrap();
///
/// let results = manager
///     .search(&["books"], |q| {
///         q.match_query("title", "dune", MatchOptions::default()).must();
///         Ok(())
///     })
///     .unwrap();
/// assert!(results.is_empty());
/// ```
#[derive(Default)]
pub struct SearchManager {
    drivers: BTreeMap<String, Arc<dyn Driver>>,
    default_driver: Option<String>,
}

impl SearchManager {
    /// Manager without any driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the drivers named in `config`.
    ///
    /// Elasticsearch drivers need a client; use
    /// [`SearchManager::from_config_with_connector`] when the configuration
    /// contains any.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Build the drivers named in `config`, creating Elasticsearch clients
    /// with `connector`.
    pub fn from_config_with_connector(
        config: &SearchConfig,
        connector: &ClientConnector,
    ) -> Result<Self> {
        Self::build(config, Some(connector))
    }

    fn build(config: &SearchConfig, connector: Option<&ClientConnector>) -> Result<Self> {
        config.validate()?;

        let mut manager = SearchManager::new();
        for (name, driver_config) in &config.drivers {
            let driver: Arc<dyn Driver> = match driver_config {
                DriverConfig::Elastic(elastic) => {
                    let connector = connector.ok_or_else(|| {
                        SearchlightError::config(format!(
                            "driver '{name}' needs a search client connector"
                        ))
                    })?;
                    Arc::new(ElasticDriver::connect(elastic, connector)?)
                }
                DriverConfig::Memory(memory) => {
                    Arc::new(MemoryDriver::with_analyzer(memory.analyzer()))
                }
                DriverConfig::Null => Arc::new(NullDriver::new()),
            };
            debug!("registered {} driver '{name}'", driver_config.kind());
            manager.register(name.clone(), driver);
        }
        manager.default_driver = config.default_driver.clone();
        Ok(manager)
    }

    /// Register (or replace) a driver.
    pub fn register<S: Into<String>>(&mut self, name: S, driver: Arc<dyn Driver>) -> &mut Self {
        self.drivers.insert(name.into(), driver);
        self
    }

    /// Builder-style [`SearchManager::register`].
    pub fn with_driver<S: Into<String>>(mut self, name: S, driver: Arc<dyn Driver>) -> Self {
        self.register(name, driver);
        self
    }

    /// Select the default driver; it must already be registered.
    pub fn set_default_driver(&mut self, name: &str) -> Result<()> {
        if !self.drivers.contains_key(name) {
            return Err(SearchlightError::driver_not_set(format!(
                "driver '{name}' is not registered"
            )));
        }
        self.default_driver = Some(name.to_string());
        Ok(())
    }

    /// Builder-style [`SearchManager::set_default_driver`].
    pub fn with_default_driver(mut self, name: &str) -> Result<Self> {
        self.set_default_driver(name)?;
        Ok(self)
    }

    /// Driver registered under `name`.
    pub fn driver(&self, name: &str) -> Result<Arc<dyn Driver>> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| {
                SearchlightError::driver_not_set(format!("driver '{name}' is not registered"))
            })
    }

    /// The default driver.
    pub fn default_driver(&self) -> Result<Arc<dyn Driver>> {
        let name = self
            .default_driver
            .as_deref()
            .ok_or_else(|| SearchlightError::driver_not_set("no default driver configured"))?;
        self.driver(name)
    }

    /// Registered driver names, sorted.
    pub fn driver_names(&self) -> Vec<&str> {
        self.drivers.keys().map(String::as_str).collect()
    }

    /// Search `types` with the default driver.
    ///
    /// `configure` receives a fresh builder bound to the driver and adds
    /// clauses to it.
    pub fn search<F>(&self, types: &[&str], configure: F) -> Result<ResultCollection>
    where
        F: FnOnce(&mut QueryBuilder<'_>) -> Result<()>,
    {
        let driver = self.default_driver()?;
        let mut builder = driver.query_builder();
        configure(&mut builder)?;
        driver.get(types, builder.clauses())
    }

    /// Paginated [`SearchManager::search`].
    pub fn paginate<F>(
        &self,
        types: &[&str],
        page: usize,
        per_page: usize,
        configure: F,
    ) -> Result<PagedResultCollection>
    where
        F: FnOnce(&mut QueryBuilder<'_>) -> Result<()>,
    {
        let driver = self.default_driver()?;
        let mut builder = driver.query_builder();
        configure(&mut builder)?;
        driver.paginate(types, builder.clauses(), page, per_page, None)
    }

    /// Index one model with the default driver.
    pub fn index<S: Searchable>(&self, model: &S) -> Result<()> {
        self.default_driver()?.add(
            &model.index_category(),
            &model.search_key(),
            model.transformed_attributes(),
        )?;
        Ok(())
    }

    /// Index several models, one batch per category.
    pub fn index_many<S: Searchable>(&self, models: &[S]) -> Result<()> {
        let driver = self.default_driver()?;
        let mut batches: BTreeMap<String, DocumentBatch> = BTreeMap::new();
        for model in models {
            batches
                .entry(model.index_category())
                .or_default()
                .insert(model.search_key(), model.transformed_attributes());
        }
        for (category, batch) in batches {
            driver.add_multiple(&category, batch)?;
        }
        Ok(())
    }

    /// Remove one model from the default driver.
    pub fn remove<S: Searchable>(&self, model: &S) -> Result<()> {
        self.default_driver()?
            .delete(&model.index_category(), &model.search_key())?;
        Ok(())
    }
}

impl fmt::Debug for SearchManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchManager")
            .field("drivers", &self.driver_names())
            .field("default_driver", &self.default_driver)
            .finish()
    }
}
