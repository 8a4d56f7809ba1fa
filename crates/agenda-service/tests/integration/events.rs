use agenda_core::config::ConflictPolicy;
use agenda_core::types::{RepeatRule, RepeatType};
use agenda_rules::error::RuleError;
use agenda_service::SaveOutcome;
use agenda_service::error::ServiceError;
use agenda_store::EventStore;

use super::helpers::{date, meeting, service_with, time, titles, weekly};

#[test_log::test(tokio::test)]
async fn single_event_is_created_and_reloaded() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;

    let outcome = service
        .submit(
            meeting("Planning", date(2025, 10, 15), time(14, 0), time(15, 0)),
            false,
        )
        .await
        .expect("saved");

    let SaveOutcome::Saved(saved) = outcome else {
        panic!("expected a saved outcome");
    };
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].series_id(), None);
    assert_eq!(service.events().as_slice(), saved.as_slice());
}

#[test_log::test(tokio::test)]
async fn weekly_series_is_stored_in_one_batch_with_shared_series_id() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;

    let outcome = service
        .submit(
            weekly("Weekly team meeting", date(2025, 10, 15), Some(date(2025, 10, 30))),
            false,
        )
        .await
        .expect("saved");

    let SaveOutcome::Saved(saved) = outcome else {
        panic!("expected a saved outcome");
    };
    let dates: Vec<_> = saved.iter().map(|e| e.details.date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 10, 15), date(2025, 10, 22), date(2025, 10, 29)]
    );

    let series_id = saved[0].series_id().expect("series id stamped");
    assert!(saved.iter().all(|e| e.series_id() == Some(series_id)));
    assert_eq!(service.events().len(), 3);
}

#[test_log::test(tokio::test)]
async fn series_without_end_date_stops_at_configured_cap() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;

    let SaveOutcome::Saved(saved) = service
        .submit(weekly("Open ended", date(2025, 10, 1), None), false)
        .await
        .expect("saved")
    else {
        panic!("expected a saved outcome");
    };

    assert_eq!(saved.last().map(|e| e.details.date), Some(date(2025, 10, 29)));
    assert_eq!(saved.len(), 5);
}

#[test_log::test(tokio::test)]
async fn invalid_template_is_rejected_before_store_calls() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;

    let inverted = meeting("Backwards", date(2025, 10, 15), time(11, 0), time(10, 0));
    let result = service.submit(inverted, true).await;
    assert!(matches!(
        result,
        Err(ServiceError::RuleError(RuleError::InvalidTimeRange { .. }))
    ));

    let zero_interval = meeting("Stuck", date(2025, 10, 15), time(9, 0), time(10, 0))
        .with_repeat(RepeatRule::new(RepeatType::Daily, 0, None));
    assert!(matches!(
        service.submit(zero_interval, true).await,
        Err(ServiceError::RuleError(RuleError::InvalidInterval(0)))
    ));

    assert!(service.store().list().await.expect("listed").is_empty());
}

#[test_log::test(tokio::test)]
async fn conflicts_warn_until_acknowledged() {
    let service = service_with(
        vec![meeting("Existing meeting", date(2025, 10, 15), time(9, 0), time(10, 0))],
        ConflictPolicy::Warn,
    )
    .await;
    let overlapping = meeting("New meeting", date(2025, 10, 15), time(9, 30), time(10, 30));

    let outcome = service
        .submit(overlapping.clone(), false)
        .await
        .expect("checked");
    let SaveOutcome::ConflictsFound(conflicts) = outcome else {
        panic!("expected conflicts");
    };
    assert_eq!(titles(&conflicts), vec!["Existing meeting".to_string()]);
    assert_eq!(
        agenda_rules::describe_conflict(&conflicts[0]),
        "Existing meeting (2025-10-15 09:00-10:00)"
    );
    assert_eq!(service.events().len(), 1);

    let outcome = service.submit(overlapping, true).await.expect("saved");
    assert!(matches!(outcome, SaveOutcome::Saved(ref saved) if saved.len() == 1));
    assert_eq!(service.events().len(), 2);
}

#[test_log::test(tokio::test)]
async fn block_policy_refuses_overlaps_even_when_acknowledged() {
    let service = service_with(
        vec![meeting("Existing meeting", date(2025, 10, 22), time(9, 30), time(9, 45))],
        ConflictPolicy::Block,
    )
    .await;

    let result = service
        .submit(
            weekly("Weekly team meeting", date(2025, 10, 15), Some(date(2025, 10, 30))),
            true,
        )
        .await;
    let Err(ServiceError::ConflictDetected(conflicts)) = result else {
        panic!("expected a blocked submission");
    };
    assert_eq!(titles(&conflicts), vec!["Existing meeting".to_string()]);
    assert_eq!(service.events().len(), 1);
}

#[test_log::test(tokio::test)]
async fn touching_events_save_without_warning() {
    let service = service_with(
        vec![meeting("Morning", date(2025, 10, 15), time(9, 0), time(10, 0))],
        ConflictPolicy::Block,
    )
    .await;

    let outcome = service
        .submit(
            meeting("Right after", date(2025, 10, 15), time(10, 0), time(11, 0)),
            false,
        )
        .await
        .expect("saved");
    assert!(matches!(outcome, SaveOutcome::Saved(_)));
}

#[test_log::test(tokio::test)]
async fn editing_an_occurrence_detaches_it_from_the_series() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;
    let SaveOutcome::Saved(series) = service
        .submit(
            weekly("Weekly team meeting", date(2025, 10, 15), Some(date(2025, 10, 30))),
            false,
        )
        .await
        .expect("saved")
    else {
        panic!("expected a saved outcome");
    };

    let target = &series[1];
    let mut edited = target.details.clone();
    edited.title = "Moved team meeting".to_string();
    edited.start_time = time(9, 30);
    edited.end_time = time(10, 30);

    let outcome = service
        .update_occurrence(target.id, edited, false)
        .await
        .expect("updated");
    let SaveOutcome::Saved(updated) = outcome else {
        panic!("expected a saved outcome");
    };
    assert_eq!(updated[0].id, target.id);
    assert_eq!(updated[0].details.repeat, RepeatRule::none());
    assert_eq!(updated[0].series_id(), None);

    let remaining_series = service
        .events()
        .iter()
        .filter(|e| e.series_id() == series[0].series_id())
        .count();
    assert_eq!(remaining_series, 2);
}

#[test_log::test(tokio::test)]
async fn editing_does_not_conflict_with_itself() {
    let service = service_with(
        vec![
            meeting("Existing meeting", date(2025, 10, 15), time(9, 0), time(10, 0)),
            meeting("Other meeting", date(2025, 10, 15), time(11, 0), time(12, 0)),
        ],
        ConflictPolicy::Block,
    )
    .await;
    let existing = service.events()[0].clone();

    let mut widened = existing.details.clone();
    widened.end_time = time(10, 45);
    let outcome = service
        .update_occurrence(existing.id, widened.clone(), false)
        .await
        .expect("updated");
    assert!(matches!(outcome, SaveOutcome::Saved(_)));

    widened.end_time = time(11, 30);
    assert!(matches!(
        service.update_occurrence(existing.id, widened, false).await,
        Err(ServiceError::ConflictDetected(_))
    ));
}

#[test_log::test(tokio::test)]
async fn editing_a_series_regenerates_every_occurrence() {
    let service = service_with(
        vec![meeting("Standalone", date(2025, 10, 20), time(15, 0), time(16, 0))],
        ConflictPolicy::Block,
    )
    .await;
    let SaveOutcome::Saved(series) = service
        .submit(
            weekly("Weekly team meeting", date(2025, 10, 1), Some(date(2025, 10, 29))),
            false,
        )
        .await
        .expect("saved")
    else {
        panic!("expected a saved outcome");
    };
    assert_eq!(series.len(), 5);
    let old_series = series[0].series_id();

    let daily = meeting("Daily standup", date(2025, 10, 27), time(9, 0), time(9, 15))
        .with_repeat(RepeatRule::new(RepeatType::Daily, 1, Some(date(2025, 10, 30))));
    let SaveOutcome::Saved(regenerated) = service
        .update_series(series[2].id, daily, false)
        .await
        .expect("updated")
    else {
        panic!("expected a saved outcome");
    };

    assert_eq!(regenerated.len(), 4);
    assert_ne!(regenerated[0].series_id(), old_series);
    let events = service.events();
    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| e.series_id() != old_series));
    assert!(titles(&events).contains(&"Standalone".to_string()));
}

#[test_log::test(tokio::test)]
async fn editing_a_series_into_a_single_event_collapses_it() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;
    let SaveOutcome::Saved(series) = service
        .submit(
            weekly("Weekly team meeting", date(2025, 10, 15), Some(date(2025, 10, 30))),
            false,
        )
        .await
        .expect("saved")
    else {
        panic!("expected a saved outcome");
    };

    let single = meeting("One-off review", date(2025, 10, 16), time(13, 0), time(14, 0));
    service
        .update_series(series[0].id, single, false)
        .await
        .expect("updated");

    let events = service.events();
    assert_eq!(titles(&events), vec!["One-off review".to_string()]);
    assert_eq!(events[0].series_id(), None);
}

#[test_log::test(tokio::test)]
async fn deleting_an_occurrence_keeps_the_rest_of_the_series() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;
    let SaveOutcome::Saved(series) = service
        .submit(
            weekly("Weekly team meeting", date(2025, 10, 15), Some(date(2025, 10, 30))),
            false,
        )
        .await
        .expect("saved")
    else {
        panic!("expected a saved outcome");
    };

    service
        .delete_occurrence(series[0].id)
        .await
        .expect("deleted");
    assert_eq!(service.events().len(), 2);

    let removed = service.delete_series(series[1].id).await.expect("deleted");
    assert_eq!(removed, 2);
    assert!(service.events().is_empty());
}

#[test_log::test(tokio::test)]
async fn unknown_ids_are_not_found() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;
    let missing = uuid::Uuid::now_v7();

    assert!(matches!(
        service.delete_occurrence(missing).await,
        Err(ServiceError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_series(missing).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[test_log::test(tokio::test)]
async fn store_failure_leaves_snapshot_untouched() {
    let service = service_with(
        vec![meeting("Existing meeting", date(2025, 10, 15), time(9, 0), time(10, 0))],
        ConflictPolicy::Warn,
    )
    .await;
    let before = service.events();

    service.store().fail_writes(true);
    let result = service
        .submit(
            meeting("Afternoon", date(2025, 10, 15), time(14, 0), time(15, 0)),
            false,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::StoreError(_))));
    assert_eq!(service.events(), before);

    service.store().fail_writes(false);
    service
        .submit(
            meeting("Afternoon", date(2025, 10, 15), time(14, 0), time(15, 0)),
            false,
        )
        .await
        .expect("saved after recovery");
    assert_eq!(service.events().len(), 2);
}

#[test_log::test(tokio::test)]
async fn failed_series_rewrite_keeps_the_old_series() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;
    let SaveOutcome::Saved(series) = service
        .submit(
            weekly("Weekly team meeting", date(2025, 10, 15), Some(date(2025, 10, 30))),
            false,
        )
        .await
        .expect("saved")
    else {
        panic!("expected a saved outcome");
    };
    assert_eq!(series.len(), 3);
    let before = service.events();

    service.store().fail_creates(true);
    let moved = weekly("Weekly team meeting", date(2025, 10, 16), Some(date(2025, 10, 30)));
    let result = service.update_series(series[0].id, moved, false).await;
    assert!(matches!(result, Err(ServiceError::StoreError(_))));

    assert_eq!(service.events(), before);
    assert_eq!(service.store().list().await.expect("listed").len(), 3);

    service.store().fail_creates(false);
    let single = meeting("One-off review", date(2025, 10, 16), time(13, 0), time(14, 0));
    service
        .update_occurrence(series[1].id, single, false)
        .await
        .expect("occurrence still editable");
}

#[test_log::test(tokio::test)]
async fn failed_cleanup_after_series_rewrite_resyncs_snapshot() {
    let service = service_with(vec![], ConflictPolicy::Warn).await;
    let SaveOutcome::Saved(series) = service
        .submit(
            weekly("Weekly team meeting", date(2025, 10, 15), Some(date(2025, 10, 30))),
            false,
        )
        .await
        .expect("saved")
    else {
        panic!("expected a saved outcome");
    };

    service.store().fail_deletes(true);
    let moved = weekly("Weekly team meeting", date(2025, 10, 16), Some(date(2025, 10, 30)));
    let result = service.update_series(series[0].id, moved, false).await;
    assert!(matches!(result, Err(ServiceError::StoreError(_))));

    let stored = service.store().list().await.expect("listed");
    assert_eq!(stored.len(), 6);
    assert_eq!(*service.events(), stored);
}

#[test_log::test(tokio::test)]
async fn check_conflicts_is_a_dry_run() {
    let service = service_with(
        vec![meeting("Existing meeting", date(2025, 10, 29), time(9, 30), time(11, 0))],
        ConflictPolicy::Warn,
    )
    .await;

    let conflicts = service.check_conflicts(
        &weekly("Weekly team meeting", date(2025, 10, 15), Some(date(2025, 10, 30))),
        None,
    );
    assert_eq!(titles(&conflicts), vec!["Existing meeting".to_string()]);
    assert_eq!(service.events().len(), 1);
}
