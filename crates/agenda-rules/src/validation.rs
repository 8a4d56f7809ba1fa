use agenda_core::types::EventTemplate;

use crate::error::{RuleError, RuleResult};

/// ## Summary
/// Checks a template before it is expanded or persisted.
///
/// ## Errors
/// Returns the first violated rule: empty title, `start_time >= end_time`,
/// a repeating interval below 1, or a repeat end date before the anchor date.
pub fn validate_template(template: &EventTemplate) -> RuleResult<()> {
    if template.title.trim().is_empty() {
        return Err(RuleError::EmptyTitle);
    }

    if template.start_time >= template.end_time {
        return Err(RuleError::InvalidTimeRange {
            start: template.start_time,
            end: template.end_time,
        });
    }

    let repeat = &template.repeat;
    if !repeat.is_repeating() {
        return Ok(());
    }

    if repeat.interval < 1 {
        return Err(RuleError::InvalidInterval(repeat.interval));
    }

    if let Some(end_date) = repeat.end_date
        && end_date < template.date
    {
        return Err(RuleError::EndDateBeforeAnchor {
            anchor: template.date,
            end_date,
        });
    }

    Ok(())
}
