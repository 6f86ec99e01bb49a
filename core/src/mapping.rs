//! Mapping directives: which list feeds which, and how far ahead cards are due.
//!
//! A list opts in by carrying a JSON object in its name, e.g.
//! `Weekly {"interval": 7, "target": "This week"}`. The object is located
//! with a greedy `\{.*\}`, so everything from the first `{` to the last `}`
//! is parsed as one fragment; two separate fragments in one name therefore
//! fail to parse and the list is skipped.
//!
//! Mappings may also be declared in the config file (`board_mappings`) by
//! list name. Both sources resolve names with `resolve_list` and both treat
//! every `DirectiveError` as recoverable.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::DirectiveError;
use crate::types::{BoardList, ListMapping};

/// Upper bound on `interval`, keeping due dates inside chrono's range.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{.*\}").expect("valid regex"));

/// The JSON object embedded in a list name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Directive {
    pub interval: u32,
    pub target: String,
}

/// A mapping declared in the config file for one board.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardMapping {
    #[serde(alias = "boardId")]
    pub board_id: String,
    #[serde(default)]
    pub list_mapping: Vec<ConfiguredMapping>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredMapping {
    pub origin: String,
    pub target: String,
    pub interval: u32,
}

/// Extract the directive from a list name. `Ok(None)` means the name has
/// no brace-delimited fragment at all.
pub fn parse_directive(name: &str) -> Result<Option<Directive>, DirectiveError> {
    let Some(fragment) = DIRECTIVE.find(name) else {
        return Ok(None);
    };
    let directive: Directive =
        serde_json::from_str(fragment.as_str()).map_err(|e| DirectiveError::Malformed {
            fragment: fragment.as_str().to_string(),
            message: e.to_string(),
        })?;
    check_interval(directive.interval)?;
    Ok(Some(directive))
}

/// The single list on the board named exactly `name`.
pub fn resolve_list<'a>(lists: &'a [BoardList], name: &str) -> Result<&'a BoardList, DirectiveError> {
    let mut matches = lists.iter().filter(|list| list.name == name);
    match (matches.next(), matches.count()) {
        (Some(list), 0) => Ok(list),
        (None, _) => Err(DirectiveError::TargetNotFound(name.to_string())),
        (Some(_), rest) => Err(DirectiveError::AmbiguousTarget {
            name: name.to_string(),
            count: rest + 1,
        }),
    }
}

/// Mappings for every list whose name carries a valid directive, in list
/// order. Lists with broken directives are logged and skipped.
pub fn parse_mappings(lists: &[BoardList]) -> Vec<ListMapping> {
    lists
        .iter()
        .filter_map(|source| match directive_mapping(lists, source) {
            Ok(mapping) => mapping,
            Err(err) => {
                warn!(list = %source.name, error = %err, "skipping list with unusable directive");
                None
            }
        })
        .collect()
}

fn directive_mapping(lists: &[BoardList], source: &BoardList) -> Result<Option<ListMapping>, DirectiveError> {
    let Some(directive) = parse_directive(&source.name)? else {
        return Ok(None);
    };
    let target = resolve_list(lists, &directive.target)?;
    debug!(source = %source.name, target = %target.name, interval = directive.interval, "found directive");
    Ok(Some(ListMapping {
        source: source.clone(),
        target: target.clone(),
        interval: directive.interval,
    }))
}

/// Resolve config-declared mappings against a board's lists, skipping (and
/// logging) entries whose names don't resolve to exactly one list each.
pub fn configured_mappings(lists: &[BoardList], entries: &[ConfiguredMapping]) -> Vec<ListMapping> {
    entries
        .iter()
        .filter_map(|entry| {
            let resolved = check_interval(entry.interval).and_then(|()| {
                Ok(ListMapping {
                    source: resolve_list(lists, &entry.origin)?.clone(),
                    target: resolve_list(lists, &entry.target)?.clone(),
                    interval: entry.interval,
                })
            });
            resolved
                .inspect_err(|err| {
                    warn!(origin = %entry.origin, target = %entry.target, error = %err, "skipping configured mapping");
                })
                .ok()
        })
        .collect()
}

fn check_interval(interval: u32) -> Result<(), DirectiveError> {
    if interval > MAX_INTERVAL_DAYS {
        return Err(DirectiveError::IntervalOutOfRange(interval));
    }
    Ok(())
}
