//! Event creation, editing and deletion against an [`EventStore`].
//!
//! Every flow validates first, checks overlaps against the current snapshot,
//! applies the configured [`ConflictPolicy`], calls the store, and finally
//! reloads the full event list into a fresh snapshot. A failing store call
//! leaves the snapshot untouched.

use std::sync::Arc;

use agenda_core::config::{ConflictPolicy, ScheduleConfig};
use agenda_core::types::{Event, EventId, EventTemplate, RepeatRule};
use agenda_rules::{describe_conflict, find_conflicts, find_series_conflicts, generate_until};
use agenda_rules::validation::validate_template;
use agenda_store::EventStore;
use tokio::sync::watch;

use crate::error::{ServiceError, ServiceResult};

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The events as stored, in creation order.
    Saved(Vec<Event>),
    /// Nothing was stored; these existing events overlap the submission and
    /// the caller has not acknowledged them yet.
    ConflictsFound(Vec<Event>),
}

pub struct EventService<S> {
    store: S,
    schedule: ScheduleConfig,
    snapshot: watch::Sender<Arc<Vec<Event>>>,
}

impl<S: EventStore> EventService<S> {
    #[must_use]
    pub fn new(store: S, schedule: ScheduleConfig) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            store,
            schedule,
            snapshot,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// ## Summary
    /// Returns the most recently loaded events.
    #[must_use]
    pub fn events(&self) -> Arc<Vec<Event>> {
        self.snapshot.borrow().clone()
    }

    /// ## Summary
    /// Returns a receiver that observes every reloaded snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Event>>> {
        self.snapshot.subscribe()
    }

    /// ## Summary
    /// Fetches every event from the store and publishes it as the new snapshot.
    ///
    /// ## Errors
    /// Returns `ServiceError::StoreError` if the store cannot be read; the
    /// previous snapshot is kept.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> ServiceResult<Arc<Vec<Event>>> {
        let events = match self.store.list().await {
            Ok(events) => Arc::new(events),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load events");
                return Err(err.into());
            }
        };
        tracing::debug!(count = events.len(), "Events loaded");
        self.snapshot.send_replace(Arc::clone(&events));
        Ok(events)
    }

    /// ## Summary
    /// Returns the stored events that would overlap `template`, without saving.
    #[must_use]
    pub fn check_conflicts(&self, template: &EventTemplate, exclude: Option<EventId>) -> Vec<Event> {
        let occurrences = self.expand(template.clone());
        find_series_conflicts(&occurrences, &self.events(), |id| exclude == Some(id))
    }

    /// ## Summary
    /// Creates a new event, or a whole series when `template` repeats.
    ///
    /// ## Side Effects
    /// - Calls `create_one` for a single event or `create_many` for a series
    /// - Reloads the snapshot after a successful save
    ///
    /// ## Errors
    /// Returns an error if:
    /// - The template is invalid (nothing is stored)
    /// - The conflict policy is `Block` and the submission overlaps stored events
    /// - The store call or the reload fails
    #[tracing::instrument(skip(self, template), fields(
        title = %template.title,
        date = %template.date,
        repeat = %template.repeat.kind
    ))]
    pub async fn submit(
        &self,
        template: EventTemplate,
        acknowledge_conflicts: bool,
    ) -> ServiceResult<SaveOutcome> {
        validate_template(&template)?;

        let repeating = template.repeat.is_repeating();
        let occurrences = self.expand(template);
        let conflicts = find_series_conflicts(&occurrences, &self.events(), |_| false);
        if let Some(outcome) = self.resolve_conflicts(conflicts, acknowledge_conflicts)? {
            return Ok(outcome);
        }

        let saved = self.persist(occurrences, repeating).await?;
        self.load().await?;
        tracing::info!(count = saved.len(), "Events saved");
        Ok(SaveOutcome::Saved(saved))
    }

    /// ## Summary
    /// Edits a single stored event. The event is detached from its series and
    /// stored as a non-repeating event.
    ///
    /// ## Errors
    /// Returns an error if:
    /// - `id` is not in the current snapshot
    /// - The template is invalid
    /// - The conflict policy is `Block` and the edit overlaps other events
    /// - The store call or the reload fails
    #[tracing::instrument(skip(self, template), fields(title = %template.title, date = %template.date))]
    pub async fn update_occurrence(
        &self,
        id: EventId,
        template: EventTemplate,
        acknowledge_conflicts: bool,
    ) -> ServiceResult<SaveOutcome> {
        self.find(id)?;

        let details = EventTemplate {
            repeat: RepeatRule::none(),
            series_id: None,
            ..template
        };
        validate_template(&details)?;

        let conflicts = find_conflicts(&details, &self.events(), Some(id));
        if let Some(outcome) = self.resolve_conflicts(conflicts, acknowledge_conflicts)? {
            return Ok(outcome);
        }

        let updated = self.store.update_one(id, details).await?;
        self.load().await?;
        Ok(SaveOutcome::Saved(vec![updated]))
    }

    /// ## Summary
    /// Replaces every occurrence of the series that `id` belongs to with a
    /// fresh expansion of `template`. An event without a series is replaced
    /// on its own; a non-repeating `template` collapses the series into a
    /// single event.
    ///
    /// ## Side Effects
    /// - Calls `create_one` or `create_many` for the new occurrences, then
    ///   `delete_many` for the old ones. A failed create leaves the store and
    ///   the snapshot untouched.
    /// - Reloads the snapshot after a successful save, and also when the
    ///   delete fails after the create went through
    ///
    /// ## Errors
    /// Returns an error if:
    /// - `id` is not in the current snapshot
    /// - The template is invalid
    /// - The conflict policy is `Block` and the new occurrences overlap events
    ///   outside the series
    /// - Any store call or the reload fails
    #[tracing::instrument(skip(self, template), fields(title = %template.title, repeat = %template.repeat.kind))]
    pub async fn update_series(
        &self,
        id: EventId,
        template: EventTemplate,
        acknowledge_conflicts: bool,
    ) -> ServiceResult<SaveOutcome> {
        let members = self.series_members(id)?;
        validate_template(&template)?;

        let repeating = template.repeat.is_repeating();
        let occurrences = self.expand(template);
        let conflicts =
            find_series_conflicts(&occurrences, &self.events(), |other| members.contains(&other));
        if let Some(outcome) = self.resolve_conflicts(conflicts, acknowledge_conflicts)? {
            return Ok(outcome);
        }

        tracing::debug!(replaced = members.len(), "Replacing series occurrences");
        let saved = self.persist(occurrences, repeating).await?;
        if let Err(err) = self.store.delete_many(members).await {
            tracing::warn!(error = %err, "Failed to remove replaced occurrences");
            self.load().await?;
            return Err(err.into());
        }
        self.load().await?;
        Ok(SaveOutcome::Saved(saved))
    }

    /// ## Summary
    /// Deletes one stored event, leaving the rest of its series in place.
    ///
    /// ## Errors
    /// Returns an error if `id` is unknown or the store call or reload fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_occurrence(&self, id: EventId) -> ServiceResult<()> {
        self.find(id)?;
        self.store.delete_one(id).await?;
        self.load().await?;
        Ok(())
    }

    /// ## Summary
    /// Deletes every event in the series that `id` belongs to and returns how
    /// many were removed.
    ///
    /// ## Errors
    /// Returns an error if `id` is unknown or the store call or reload fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_series(&self, id: EventId) -> ServiceResult<usize> {
        let members = self.series_members(id)?;
        let count = members.len();
        self.store.delete_many(members).await?;
        self.load().await?;
        Ok(count)
    }

    fn find(&self, id: EventId) -> ServiceResult<Event> {
        self.events()
            .iter()
            .find(|event| event.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }

    fn series_members(&self, id: EventId) -> ServiceResult<Vec<EventId>> {
        let event = self.find(id)?;
        let Some(series_id) = event.series_id() else {
            return Ok(vec![id]);
        };

        Ok(self
            .events()
            .iter()
            .filter(|other| other.series_id() == Some(series_id))
            .map(|other| other.id)
            .collect())
    }

    /// Stamps a fresh series id on repeating templates and expands them.
    fn expand(&self, mut template: EventTemplate) -> Vec<EventTemplate> {
        template.series_id = template.repeat.is_repeating().then(uuid::Uuid::new_v4);
        generate_until(&template, self.schedule.default_repeat_end)
    }

    async fn persist(
        &self,
        mut occurrences: Vec<EventTemplate>,
        repeating: bool,
    ) -> ServiceResult<Vec<Event>> {
        let saved = if repeating {
            self.store.create_many(occurrences).await
        } else if let Some(single) = occurrences.pop() {
            self.store.create_one(single).await.map(|event| vec![event])
        } else {
            Ok(Vec::new())
        };

        saved.map_err(|err| {
            tracing::warn!(error = %err, "Failed to persist events");
            err.into()
        })
    }

    fn resolve_conflicts(
        &self,
        conflicts: Vec<Event>,
        acknowledged: bool,
    ) -> ServiceResult<Option<SaveOutcome>> {
        if conflicts.is_empty() {
            return Ok(None);
        }

        for conflict in &conflicts {
            tracing::warn!(conflict = %describe_conflict(conflict), "Submission overlaps an existing event");
        }

        match self.schedule.conflict_policy {
            ConflictPolicy::Block => Err(ServiceError::ConflictDetected(conflicts)),
            ConflictPolicy::Warn if acknowledged => Ok(None),
            ConflictPolicy::Warn => Ok(Some(SaveOutcome::ConflictsFound(conflicts))),
        }
    }
}
