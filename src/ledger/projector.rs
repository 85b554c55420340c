use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::changes::BalanceEvent;
use super::series::BalanceSeries;
use crate::domain::common::format_date;
use crate::errors::{ProjectionError, Result};

/// Builds a dense running-balance series from an opening balance and a set of events.
///
/// * Same-day deltas are summed before they are applied.
/// * With a `start`, the series begins there and its first entry is `opening` plus that
///   day's deltas. Without one it begins on the earliest event date.
/// * With an `end`, the series is filled through that day. Without one it stops at the
///   latest event date (or at `start` when there are no events).
/// * Events outside `[start, end]` are ignored; `opening` must already account for
///   anything before `start`.
pub fn project<I>(
    opening: Decimal,
    events: I,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<BalanceSeries>
where
    I: IntoIterator<Item = BalanceEvent>,
{
    let daily = combine_daily(events, start, end)?;

    let Some(first) = start.or_else(|| daily.keys().next().copied()) else {
        return Ok(BalanceSeries::new());
    };
    let last = end
        .or_else(|| daily.keys().next_back().copied())
        .unwrap_or(first)
        .max(first);

    let mut series = BalanceSeries::new();
    let mut running = opening;
    let mut day = first;
    loop {
        if let Some(delta) = daily.get(&day) {
            running = running.checked_add(*delta).ok_or_else(|| {
                ProjectionError::overflow(format!("accumulating balance on {}", format_date(day)))
            })?;
        }
        series.insert(day, running);
        if day >= last {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    debug!(
        days = series.len(),
        event_days = daily.len(),
        "projected balance series"
    );
    Ok(series)
}

/// Net delta per day, restricted to `[start, end]`.
fn combine_daily<I>(
    events: I,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<BTreeMap<NaiveDate, Decimal>>
where
    I: IntoIterator<Item = BalanceEvent>,
{
    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut ignored = 0usize;
    for event in events {
        let before_start = start.is_some_and(|start| event.date < start);
        let after_end = end.is_some_and(|end| event.date > end);
        if before_start || after_end {
            ignored += 1;
            continue;
        }
        let slot = daily.entry(event.date).or_insert(Decimal::ZERO);
        *slot = slot.checked_add(event.delta).ok_or_else(|| {
            ProjectionError::overflow(format!("combining deltas on {}", format_date(event.date)))
        })?;
    }
    if ignored > 0 {
        debug!(ignored, "ignored events outside the projection window");
    }
    Ok(daily)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(d: u32, delta: Decimal) -> BalanceEvent {
        BalanceEvent::new(date(2024, 1, d), delta)
    }

    #[test]
    fn fills_every_day_of_the_window() {
        let series = project(
            dec!(100),
            vec![event(3, dec!(20)), event(5, dec!(-50))],
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 6)),
        )
        .unwrap();

        let values: Vec<_> = series.iter().map(|(_, v)| v).collect();
        assert_eq!(
            values,
            vec![dec!(100), dec!(100), dec!(120), dec!(120), dec!(70), dec!(70)]
        );
        assert_eq!(series.first().unwrap().0, date(2024, 1, 1));
        assert_eq!(series.last().unwrap().0, date(2024, 1, 6));
        assert!(series.is_dense());
    }

    #[test]
    fn same_day_events_accumulate() {
        let series = project(
            Decimal::ZERO,
            vec![event(2, dec!(10)), event(2, dec!(15.5)), event(2, dec!(-0.5))],
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 2)),
        )
        .unwrap();
        assert_eq!(series.get(date(2024, 1, 2)), Some(dec!(25)));
    }

    #[test]
    fn unordered_events_are_sorted() {
        let series = project(
            Decimal::ZERO,
            vec![event(4, dec!(1)), event(2, dec!(10))],
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 4)),
        )
        .unwrap();
        assert_eq!(series.get(date(2024, 1, 3)), Some(dec!(10)));
        assert_eq!(series.get(date(2024, 1, 4)), Some(dec!(11)));
    }

    #[test]
    fn single_day_window_includes_same_day_deltas() {
        let series = project(
            dec!(40),
            vec![event(9, dec!(2)), event(9, dec!(3))],
            Some(date(2024, 1, 9)),
            Some(date(2024, 1, 9)),
        )
        .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(date(2024, 1, 9)), Some(dec!(45)));
    }

    #[test]
    fn missing_start_begins_at_first_event() {
        let series = project(
            Decimal::ZERO,
            vec![event(10, dec!(5)), event(12, dec!(5))],
            None,
            Some(date(2024, 1, 13)),
        )
        .unwrap();
        assert_eq!(series.first(), Some((date(2024, 1, 10), dec!(5))));
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn missing_end_stops_at_last_event() {
        let series = project(
            dec!(1),
            vec![event(3, dec!(1))],
            Some(date(2024, 1, 1)),
            None,
        )
        .unwrap();
        assert_eq!(series.last(), Some((date(2024, 1, 3), dec!(2))));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn no_bounds_and_no_events_is_empty() {
        let series = project(Decimal::ZERO, Vec::new(), None, None).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn start_without_events_yields_single_seed_entry() {
        let series = project(dec!(12), Vec::new(), Some(date(2024, 1, 1)), None).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(date(2024, 1, 1)), Some(dec!(12)));
    }

    #[test]
    fn events_outside_window_are_ignored() {
        let series = project(
            Decimal::ZERO,
            vec![event(1, dec!(99)), event(3, dec!(1)), event(9, dec!(99))],
            Some(date(2024, 1, 2)),
            Some(date(2024, 1, 4)),
        )
        .unwrap();
        assert_eq!(series.last(), Some((date(2024, 1, 4), dec!(1))));
    }

    #[test]
    fn overflow_is_reported() {
        let err = project(
            Decimal::MAX,
            vec![event(1, Decimal::MAX)],
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 1)),
        )
        .unwrap_err();
        assert!(matches!(err, ProjectionError::ArithmeticOverflow { .. }));
    }
}
