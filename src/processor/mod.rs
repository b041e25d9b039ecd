//! Processor registry - named post-processing of resolved values
//!
//! One registry per engine. Built-ins are fixed at construction from the
//! config defaults; custom processors live in a `DashMap` so registration
//! only needs `&self`. On a name collision the custom processor wins.

pub mod builtin;
pub mod locale;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::config::ReplacerConfig;
use crate::error::ProcessorError;

/// `(value, args) -> value`. Must not panic; failures fall back to `value`.
pub type Processor = Arc<dyn Fn(&str, Option<&[String]>) -> String + Send + Sync>;

/// Names of the built-in processors
pub const BUILTIN_NAMES: [&str; 6] = ["date", "upper", "lower", "capitalize", "currency", "number"];

pub struct ProcessorRegistry {
    builtins: HashMap<&'static str, Processor>,
    custom: DashMap<String, Processor>,
    failures: Arc<AtomicUsize>,
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new(&ReplacerConfig::default())
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("processors", &self.names())
            .field("failures", &self.failure_count())
            .finish()
    }
}

/// Convert a processor failure into "keep the original value"
fn fail_soft(
    name: &str,
    value: &str,
    result: Result<String, ProcessorError>,
    failures: &AtomicUsize,
) -> String {
    match result {
        Ok(out) => out,
        Err(err) => {
            failures.fetch_add(1, Ordering::Relaxed);
            debug!(processor = name, error = %err, "processor failed, keeping original value");
            value.to_string()
        }
    }
}

fn wrap<F>(name: &'static str, failures: &Arc<AtomicUsize>, f: F) -> Processor
where
    F: Fn(&str, Option<&[String]>) -> Result<String, ProcessorError> + Send + Sync + 'static,
{
    let failures = Arc::clone(failures);
    Arc::new(move |value: &str, args: Option<&[String]>| {
        fail_soft(name, value, f(value, args), &failures)
    })
}

impl ProcessorRegistry {
    /// Registry holding the built-ins, configured from `config`
    pub fn new(config: &ReplacerConfig) -> Self {
        let failures = Arc::new(AtomicUsize::new(0));
        let date_defaults = config.date.clone();
        let currency_defaults = config.currency.clone();
        let number_defaults = config.number.clone();

        let builtins: HashMap<&'static str, Processor> = HashMap::from([
            (
                "date",
                wrap("date", &failures, move |v, a| {
                    builtin::date(v, a, &date_defaults)
                }),
            ),
            ("upper", wrap("upper", &failures, builtin::upper)),
            ("lower", wrap("lower", &failures, builtin::lower)),
            ("capitalize", wrap("capitalize", &failures, builtin::capitalize)),
            (
                "currency",
                wrap("currency", &failures, move |v, a| {
                    builtin::currency(v, a, &currency_defaults)
                }),
            ),
            (
                "number",
                wrap("number", &failures, move |v, a| {
                    builtin::number(v, a, &number_defaults)
                }),
            ),
        ]);

        Self {
            builtins,
            custom: DashMap::new(),
            failures,
        }
    }

    /// Register (or replace) a custom processor
    pub fn register<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, Option<&[String]>) -> String + Send + Sync + 'static,
    {
        self.insert(name.into(), Arc::new(f));
    }

    /// Register a processor whose errors fall back to the input value,
    /// like the built-ins
    pub fn register_fallible<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, Option<&[String]>) -> Result<String, ProcessorError> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        let failures = Arc::clone(&self.failures);
        self.insert(
            name,
            Arc::new(move |value: &str, args: Option<&[String]>| {
                fail_soft(&label, value, f(value, args), &failures)
            }),
        );
    }

    fn insert(&self, name: String, processor: Processor) {
        if self.builtins.contains_key(name.as_str()) {
            warn!(processor = %name, "custom processor shadows built-in");
        }
        if self.custom.insert(name.clone(), processor).is_some() {
            debug!(processor = %name, "replaced custom processor");
        }
    }

    /// Custom entries first, then built-ins
    pub fn get(&self, name: &str) -> Option<Processor> {
        if let Some(custom) = self.custom.get(name) {
            return Some(Arc::clone(custom.value()));
        }
        self.builtins.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name) || self.builtins.contains_key(name)
    }

    /// Run `name` on `value`; `None` if no such processor
    pub fn apply(&self, name: &str, value: &str, args: Option<&[String]>) -> Option<String> {
        self.get(name).map(|p| p(value, args))
    }

    /// Built-ins merged with custom entries (custom wins)
    pub fn list_all(&self) -> BTreeMap<String, Processor> {
        let mut all: BTreeMap<String, Processor> = self
            .builtins
            .iter()
            .map(|(name, p)| (name.to_string(), Arc::clone(p)))
            .collect();
        for entry in self.custom.iter() {
            all.insert(entry.key().clone(), Arc::clone(entry.value()));
        }
        all
    }

    /// Sorted processor names
    pub fn names(&self) -> Vec<String> {
        self.list_all().into_keys().collect()
    }

    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_NAMES.contains(&name)
    }

    /// Fail-soft fallbacks since construction
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}
