//! Reindex-on-save/delete glue.
//!
//! The model layer reports changes through an [`IndexObserver`], which
//! turns them into [`ModelEvent`]s on a channel. An [`IndexSubscriber`]
//! drains the channel and applies each event to a driver.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use log::{debug, warn};

use crate::document::{Attributes, DocumentId};
use crate::driver::Driver;
use crate::error::{Result, SearchlightError};
use crate::searchable::Searchable;

/// A model change relevant to the index.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// The model was created or updated.
    Saved {
        category: String,
        id: DocumentId,
        attributes: Attributes,
    },
    /// The model was deleted.
    Deleted { category: String, id: DocumentId },
}

impl ModelEvent {
    /// Category the event applies to.
    pub fn category(&self) -> &str {
        match self {
            ModelEvent::Saved { category, .. } | ModelEvent::Deleted { category, .. } => category,
        }
    }
}

/// Sending side, held by the model layer.
#[derive(Debug, Clone)]
pub struct IndexObserver {
    sender: Sender<ModelEvent>,
}

impl IndexObserver {
    /// Report a saved model.
    pub fn saved<S: Searchable>(&self, model: &S) -> Result<()> {
        self.send(ModelEvent::Saved {
            category: model.index_category(),
            id: model.search_key(),
            attributes: model.transformed_attributes(),
        })
    }

    /// Report a deleted model. Soft-delete-aware models keep their indexed
    /// document and produce no event; returns whether an event was sent.
    pub fn deleted<S: Searchable>(&self, model: &S) -> Result<bool> {
        if model.is_soft_delete_aware() {
            debug!(
                "skipping index removal of soft-deleted '{}' {}",
                model.index_category(),
                model.search_key()
            );
            return Ok(false);
        }
        self.send(ModelEvent::Deleted {
            category: model.index_category(),
            id: model.search_key(),
        })?;
        Ok(true)
    }

    /// Send a raw event.
    pub fn send(&self, event: ModelEvent) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| SearchlightError::channel("index subscriber has been dropped"))
    }
}

/// Receiving side, applying events to a driver.
#[derive(Debug)]
pub struct IndexSubscriber {
    receiver: Receiver<ModelEvent>,
    driver: Arc<dyn Driver>,
}

impl IndexSubscriber {
    /// Apply one event.
    pub fn handle(&self, event: ModelEvent) -> Result<()> {
        match event {
            ModelEvent::Saved {
                category,
                id,
                attributes,
            } => {
                self.driver.add(&category, &id, attributes)?;
            }
            ModelEvent::Deleted { category, id } => {
                self.driver.delete(&category, &id)?;
            }
        }
        Ok(())
    }

    /// Apply every queued event without blocking. Returns the number of
    /// applied events; stops at the first failing one.
    pub fn drain(&self) -> Result<usize> {
        let mut applied = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.handle(event)?;
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(applied)
    }

    /// Apply events until every observer has been dropped.
    ///
    /// Failing events are logged and skipped so one bad record does not
    /// stop the loop. Returns the number of applied events.
    pub fn run(&self) -> usize {
        let mut applied = 0;
        for event in self.receiver.iter() {
            let category = event.category().to_string();
            match self.handle(event) {
                Ok(()) => applied += 1,
                Err(e) => warn!("failed to apply index event for '{category}': {e}"),
            }
        }
        applied
    }
}

/// Connected observer/subscriber pair over an unbounded channel.
pub fn index_channel(driver: Arc<dyn Driver>) -> (IndexObserver, IndexSubscriber) {
    let (sender, receiver) = unbounded();
    (IndexObserver { sender }, IndexSubscriber { receiver, driver })
}
