//! Resolver / processor pipeline
//!
//! For each tag occurrence: look the name up in the replacement map, compute
//! the value, run the named processor on non-empty values, then substitute
//! every tag in one pass over the template.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, instrument, trace};

use crate::config::ReplacerConfig;
use crate::error::ProcessorError;
use crate::processor::{Processor, ProcessorRegistry};
use crate::replacement::ReplacementMap;
use crate::tag::{self, Tag};

/// One tag occurrence and the text that replaces it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag<'t> {
    pub raw: &'t str,
    pub replacement: String,
}

/// Placeholder substitution engine.
///
/// Owns its processor registry and an optional cache of parsed templates.
/// `replace` takes `&self`, so one engine can serve many threads.
pub struct Replacer {
    registry: ProcessorRegistry,
    cache: Option<DashMap<String, Arc<[Tag]>>>,
    cache_capacity: usize,
}

impl Default for Replacer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Replacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replacer")
            .field("registry", &self.registry)
            .field("cached_templates", &self.cached_templates())
            .finish()
    }
}

impl Replacer {
    /// Engine with default config
    pub fn new() -> Self {
        Self::with_config(&ReplacerConfig::default())
    }

    pub fn with_config(config: &ReplacerConfig) -> Self {
        Self {
            registry: ProcessorRegistry::new(config),
            cache: config.cache.enabled.then(DashMap::new),
            cache_capacity: config.cache.capacity.max(1),
        }
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    pub fn register_processor<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, Option<&[String]>) -> String + Send + Sync + 'static,
    {
        self.registry.register(name, f);
    }

    pub fn register_fallible_processor<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, Option<&[String]>) -> Result<String, ProcessorError> + Send + Sync + 'static,
    {
        self.registry.register_fallible(name, f);
    }

    pub fn get_processor(&self, name: &str) -> Option<Processor> {
        self.registry.get(name)
    }

    pub fn list_processors(&self) -> BTreeMap<String, Processor> {
        self.registry.list_all()
    }

    /// Parsed tags of `template` (cached when the cache is enabled)
    pub fn tags(&self, template: &str) -> Arc<[Tag]> {
        if !tag::may_contain_tags(template) {
            return Arc::from(Vec::new());
        }
        let Some(cache) = &self.cache else {
            return tag::parse(template).into();
        };

        if let Some(hit) = cache.get(template) {
            trace!("parse cache hit");
            return Arc::clone(hit.value());
        }

        let tags: Arc<[Tag]> = tag::parse(template).into();
        if cache.len() >= self.cache_capacity {
            debug!(capacity = self.cache_capacity, "parse cache full, clearing");
            cache.clear();
        }
        cache.insert(template.to_string(), Arc::clone(&tags));
        tags
    }

    pub fn cached_templates(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }

    /// Final replacement text for one tag occurrence
    pub fn resolve_tag(&self, tag: &Tag, replacements: &ReplacementMap) -> String {
        let value = match replacements.get(&tag.name) {
            Some(entry) => entry.evaluate(tag.args.as_deref()),
            None => {
                debug!(name = %tag.name, "no replacement for tag");
                String::new()
            }
        };

        // Empty values are never processed
        if value.is_empty() {
            return value;
        }
        let Some(processor) = &tag.processor else {
            return value;
        };

        match self
            .registry
            .apply(processor, &value, tag.processor_args.as_deref())
        {
            Some(processed) => processed,
            None => {
                debug!(name = %tag.name, processor = %processor, "unknown processor, value unchanged");
                value
            }
        }
    }

    /// Resolve every tag occurrence, in template order.
    ///
    /// Producers are invoked once per occurrence, even for repeated tags.
    pub fn resolve<'t>(&self, template: &'t str, replacements: &ReplacementMap) -> Vec<ResolvedTag<'t>> {
        self.tags(template)
            .iter()
            .map(|tag| ResolvedTag {
                raw: &template[tag.span.clone()],
                replacement: self.resolve_tag(tag, replacements),
            })
            .collect()
    }

    /// Substitute all tags in `template`.
    ///
    /// Returns the template borrowed, untouched, when it has no tags.
    #[instrument(skip_all, fields(len = template.len()))]
    pub fn replace<'t>(&self, template: &'t str, replacements: &ReplacementMap) -> Cow<'t, str> {
        let tags = self.tags(template);
        if tags.is_empty() {
            return Cow::Borrowed(template);
        }

        let resolved: Vec<ResolvedTag<'t>> = tags
            .iter()
            .map(|tag| ResolvedTag {
                raw: &template[tag.span.clone()],
                replacement: self.resolve_tag(tag, replacements),
            })
            .collect();
        debug!(tags = resolved.len(), "resolved tags");

        Cow::Owned(substitute(template, &tags, &resolved))
    }

    /// `replace` applied to each template, order and count preserved
    pub fn replace_all<I, S>(&self, templates: I, replacements: &ReplacementMap) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        templates
            .into_iter()
            .map(|t| self.replace(t.as_ref(), replacements).into_owned())
            .collect()
    }
}

/// Single pass over the tag spans. Identical raw text gets the same
/// replacement everywhere: the one resolved for its first occurrence.
fn substitute(template: &str, tags: &[Tag], resolved: &[ResolvedTag<'_>]) -> String {
    let mut by_raw: HashMap<&str, &str> = HashMap::with_capacity(resolved.len());
    for r in resolved {
        by_raw.entry(r.raw).or_insert(r.replacement.as_str());
    }

    let extra: usize = resolved.iter().map(|r| r.replacement.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut last_end = 0;
    for tag in tags {
        out.push_str(&template[last_end..tag.span.start]);
        let raw = &template[tag.span.clone()];
        out.push_str(by_raw.get(raw).copied().unwrap_or_default());
        last_end = tag.span.end;
    }
    out.push_str(&template[last_end..]);
    out
}
