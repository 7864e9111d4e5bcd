use crate::config::ClassifierConfig;
use crate::context::{BrowsingContext, url_host};
use crate::element::{ElementId, LinkElement};
use crate::error::{ClassifyError, Result};
use crate::result::{Classification, ClassificationResult};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use url::Url;

/// Per-element state kept while an element is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierInstance {
    pub element: ElementId,
    pub config: ClassifierConfig,
    pub href: String,
    pub resolved_url: Url,
    /// Browsing context host as it was when the element was classified.
    pub context_host: String,
    pub link_host: String,
    pub classification: Classification,
    /// False when the element already carried the marker before classification.
    pub marker_added: bool,
}

impl ClassifierInstance {
    pub fn marker(&self) -> &str {
        self.config.marker_for(self.classification)
    }

    pub fn result(&self) -> ClassificationResult {
        ClassificationResult {
            element: self.element,
            href: self.href.clone(),
            resolved_url: self.resolved_url.to_string(),
            link_host: self.link_host.clone(),
            context_host: self.context_host.clone(),
            classification: self.classification,
            marker: self.marker().to_string(),
        }
    }
}

/// Classify a bare href against a browsing context. No element, no registry.
pub fn classify_href(
    href: &str,
    context: &BrowsingContext,
    config: &ClassifierConfig,
) -> Result<Classification> {
    let resolved = context.resolve(href)?;
    Ok(compare_hosts(&url_host(&resolved), context.host(), config))
}

fn compare_hosts(link_host: &str, context_host: &str, config: &ClassifierConfig) -> Classification {
    if config.host_match.matches(link_host, context_host) {
        Classification::Internal
    } else {
        Classification::External
    }
}

/// Marks link elements as internal or external and remembers which elements
/// it has already handled.
///
/// Each element is classified at most once until it is destroyed; a repeated
/// `classify` returns the cached result without touching the element.
#[derive(Debug, Default)]
pub struct LinkClassifier {
    config: ClassifierConfig,
    registry: Mutex<HashMap<ElementId, ClassifierInstance>>,
}

impl LinkClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify<E>(&self, element: &mut E, context: &BrowsingContext) -> Result<ClassificationResult>
    where
        E: LinkElement + ?Sized,
    {
        let config = self.config.clone();
        self.classify_with_config(element, context, config)
    }

    /// Classify with a per-call configuration instead of the classifier's own.
    pub fn classify_with_config<E>(
        &self,
        element: &mut E,
        context: &BrowsingContext,
        config: ClassifierConfig,
    ) -> Result<ClassificationResult>
    where
        E: LinkElement + ?Sized,
    {
        let id = element.element_id();

        // Held across check-and-insert so concurrent callers cannot both
        // create an instance for the same element.
        let mut registry = self.lock_registry();
        let slot = match registry.entry(id) {
            Entry::Occupied(existing) => {
                debug!("Element {} already classified, skipping", id);
                return Ok(existing.get().result());
            }
            Entry::Vacant(slot) => slot,
        };

        config.validate()?;
        let href = element
            .href()
            .ok_or(ClassifyError::MissingLinkTarget { element: id })?
            .to_string();

        let resolved_url = context.resolve(&href).inspect_err(|e| {
            debug!("Element {}: {}", id, e);
        })?;
        let link_host = url_host(&resolved_url);
        let classification = compare_hosts(&link_host, context.host(), &config);

        debug!(
            "Element {} href '{}' -> host '{}' vs '{}': {}",
            id,
            href,
            link_host,
            context.host(),
            classification
        );

        let mut instance = ClassifierInstance {
            element: id,
            config,
            href,
            resolved_url,
            context_host: context.host().to_string(),
            link_host,
            classification,
            marker_added: false,
        };

        instance.marker_added = apply_marker(element, &instance);
        let result = instance.result();
        slot.insert(instance);

        Ok(result)
    }

    /// Drop the element's instance so a later `classify` starts fresh.
    /// The applied marker stays unless the instance was configured with
    /// `revert_on_destroy`; a marker the element already had is never removed.
    pub fn destroy<E>(&self, element: &mut E) -> Option<ClassifierInstance>
    where
        E: LinkElement + ?Sized,
    {
        let id = element.element_id();
        let removed = self.lock_registry().remove(&id);

        if let Some(ref instance) = removed
            && instance.config.revert_on_destroy
            && instance.marker_added
        {
            element.remove_marker(instance.marker());
        }

        if removed.is_some() {
            debug!("Element {} destroyed", id);
        }
        removed
    }

    pub fn instance(&self, id: ElementId) -> Option<ClassifierInstance> {
        self.lock_registry().get(&id).cloned()
    }

    pub fn is_registered(&self, id: ElementId) -> bool {
        self.lock_registry().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock_registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_registry().is_empty()
    }

    /// Forget every instance. Markers on elements are left as they are.
    pub fn clear(&self) {
        self.lock_registry().clear();
    }

    fn lock_registry(&self) -> MutexGuard<'_, HashMap<ElementId, ClassifierInstance>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Returns whether the marker was newly added to the element.
fn apply_marker<E>(element: &mut E, instance: &ClassifierInstance) -> bool
where
    E: LinkElement + ?Sized,
{
    let opposite = match instance.classification {
        Classification::Internal => &instance.config.external_marker,
        Classification::External => &instance.config.internal_marker,
    };
    if element.has_marker(opposite) {
        element.remove_marker(opposite);
    }
    let marker = instance.marker();
    if element.has_marker(marker) {
        return false;
    }
    element.add_marker(marker);
    true
}
