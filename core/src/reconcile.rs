//! Re-create cards that exist in a mapping's source but not in its target.
//!
//! Cards are matched by name, not id: a clone has a new id but the same
//! name as its template, and that is what marks it as already present.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::remote::Remote;
use crate::transport::Transport;
use crate::types::{Card, ListMapping};

/// Wire format of due dates.
pub const DUE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source cards whose name is absent from `target`, in source order.
/// When the source holds several cards with the same missing name only the
/// first is returned, so a sync never introduces duplicate names.
pub fn missing_cards<'a>(source: &'a [Card], target: &[Card]) -> Vec<&'a Card> {
    let mut present: HashSet<&str> = target.iter().map(|card| card.name.as_str()).collect();
    source
        .iter()
        .filter(|card| present.insert(card.name.as_str()))
        .collect()
}

/// `now` plus `interval` whole days, in UTC.
pub fn due_date(now: DateTime<Utc>, interval: u32) -> String {
    (now + Duration::days(i64::from(interval)))
        .format(DUE_FORMAT)
        .to_string()
}

/// Clone every missing card into `mapping.target`, one request at a time.
///
/// Source and target are re-fetched first. Each created card is appended to
/// `mapping.target.cards`; the created cards are also returned. The first
/// failed request aborts the rest of the mapping.
pub fn reconcile<T: Transport>(
    remote: &Remote<T>,
    mapping: &mut ListMapping,
    now: DateTime<Utc>,
) -> Result<Vec<Card>, ApiError> {
    mapping.source.cards = Some(remote.cards(&mapping.source)?);
    mapping.target.cards = Some(remote.cards(&mapping.target)?);

    let due = due_date(now, mapping.interval);
    let missing: Vec<Card> = missing_cards(mapping.source.cards(), mapping.target.cards())
        .into_iter()
        .cloned()
        .collect();
    debug!(
        source = %mapping.source.name,
        target = %mapping.target.name,
        missing = missing.len(),
        "computed missing cards"
    );

    let mut created = Vec::with_capacity(missing.len());
    for card in &missing {
        let copy = remote.clone_card(card, &mapping.target, &due)?;
        mapping.target.push_card(copy.clone());
        created.push(copy);
    }

    if !created.is_empty() {
        info!(target = %mapping.target.name, cloned = created.len(), "reconciled list");
    }
    Ok(created)
}
