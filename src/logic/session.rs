use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::FormError;
use crate::gateway::{CatalogGateway, GatewayResult};
use crate::logic::engine::{
    ChildRequest, ChildrenOutcome, FormEngine, PropertiesOutcome, PropertiesRequest,
};
use crate::model::{Category, FieldValue, Id, Property, Snapshot};

/// Result of a fetch, delivered back to the session that issued it
#[derive(Debug)]
enum Completion {
    Properties(PropertiesRequest, GatewayResult<Vec<Property>>),
    Children(ChildRequest, GatewayResult<Vec<Property>>),
}

/// What applying one fetch result did to the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormUpdate {
    PropertiesLoaded {
        subcategory_id: Id,
        field_count: usize,
    },
    PropertiesFailed {
        subcategory_id: Id,
        error: FormError,
    },
    ChildrenInserted {
        property_id: Id,
        option_id: Id,
        inserted: Vec<Id>,
    },
    /// Child fetch failed; the form is unchanged
    ChildrenFailed { property_id: Id, option_id: Id },
    /// Response arrived for a selection that has since changed
    Discarded,
}

/// One user's form, driven against a catalog gateway.
///
/// Fetches run as spawned tasks so no call waits on the network. Their
/// results queue up on a channel and only touch the engine when the owner
/// calls `next_update` or `settle`.
pub struct FormSession<G> {
    engine: FormEngine,
    gateway: Arc<G>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<G> std::fmt::Debug for FormSession<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<G: CatalogGateway + 'static> FormSession<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            engine: FormEngine::new(),
            gateway,
            completions_tx,
            completions_rx,
        }
    }

    /// Create a session and load the category set
    pub async fn start(gateway: Arc<G>) -> Result<Self, FormError> {
        let mut session = Self::new(gateway);
        session.reload_categories().await?;
        Ok(session)
    }

    pub async fn reload_categories(&mut self) -> Result<(), FormError> {
        let categories = self.gateway.fetch_all_categories().await?;
        self.engine.load_categories(categories);
        Ok(())
    }

    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    pub fn select_category(&mut self, category_id: Id) -> Result<Vec<Category>, FormError> {
        self.engine
            .select_category(category_id)
            .map(|subcategories| subcategories.to_vec())
    }

    /// Select a subcategory; its properties arrive through `next_update`
    pub fn select_subcategory(&mut self, subcategory_id: Id) -> Result<(), FormError> {
        let request = self.engine.select_subcategory(subcategory_id)?;

        let gateway = self.gateway.clone();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = gateway.fetch_properties(request.subcategory_id).await;
            let _ = tx.send(Completion::Properties(request, result));
        });
        Ok(())
    }

    /// Pick an option; child properties, if any, arrive through `next_update`
    pub fn choose_option(&mut self, property_id: Id, option_id: Id) -> Result<(), FormError> {
        if let Some(request) = self.engine.choose_option(property_id, option_id)? {
            let gateway = self.gateway.clone();
            let tx = self.completions_tx.clone();
            tokio::spawn(async move {
                let result = gateway.fetch_option_properties(request.option_id).await;
                let _ = tx.send(Completion::Children(request, result));
            });
        }
        Ok(())
    }

    pub fn set_other_value(&mut self, property_id: Id, text: impl Into<String>) -> Result<(), FormError> {
        self.engine
            .set_field_value(property_id, FieldValue::Other(text.into()))
    }

    pub fn clear_field(&mut self, property_id: Id) -> Result<(), FormError> {
        self.engine.set_field_value(property_id, FieldValue::Unset)
    }

    /// Wait for the next fetch result and apply it. Returns `None` once no
    /// request is outstanding.
    pub async fn next_update(&mut self) -> Option<FormUpdate> {
        if !self.engine.is_loading() {
            return None;
        }

        let completion = self.completions_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply results until every outstanding request has been answered
    pub async fn settle(&mut self) -> Vec<FormUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_update().await {
            updates.push(update);
        }
        updates
    }

    pub fn submit(&mut self) -> Result<Snapshot, FormError> {
        self.engine.submit()
    }

    fn apply(&mut self, completion: Completion) -> FormUpdate {
        match completion {
            Completion::Properties(request, result) => {
                match self.engine.apply_properties(&request, result) {
                    Ok(PropertiesOutcome::Applied) => FormUpdate::PropertiesLoaded {
                        subcategory_id: request.subcategory_id,
                        field_count: self.engine.fields().len(),
                    },
                    Ok(PropertiesOutcome::Stale) => FormUpdate::Discarded,
                    Err(error) => FormUpdate::PropertiesFailed {
                        subcategory_id: request.subcategory_id,
                        error,
                    },
                }
            }
            Completion::Children(request, result) => {
                match self.engine.apply_children(&request, result) {
                    ChildrenOutcome::Inserted(inserted) => FormUpdate::ChildrenInserted {
                        property_id: request.property_id,
                        option_id: request.option_id,
                        inserted,
                    },
                    ChildrenOutcome::Failed(_) => FormUpdate::ChildrenFailed {
                        property_id: request.property_id,
                        option_id: request.option_id,
                    },
                    ChildrenOutcome::Stale => FormUpdate::Discarded,
                }
            }
        }
    }
}
