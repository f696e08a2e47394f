use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;

/// Sort direction. Lists default to newest-first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// The value a record exposes for a given sort key.
#[derive(Clone, Debug)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Date(Option<NaiveDateTime>),
}

/// Seam between the engine and the record types: anything listable can be
/// searched, filtered by location and date, and sorted by its own key set.
pub trait Listable {
    type SortKey: Copy + Default;

    fn search_text(&self) -> String;
    fn location(&self) -> Option<&str>;
    fn record_date(&self) -> Option<NaiveDateTime>;
    fn sort_field(&self, key: Self::SortKey) -> FieldValue;
}

/// Snapshot of the active filter controls. The default value is the cleared
/// state: no predicates, sorted by the type's default key, newest first.
#[derive(Clone, Debug, Default)]
pub struct FilterConfig<K: Copy + Default> {
    pub query: String,
    pub location: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sort_by: K,
    pub order: SortOrder,
}

impl<K: Copy + Default> FilterConfig<K> {
    fn date_bounds(&self) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
        let from = self.date_from.and_then(|d| d.and_hms_opt(0, 0, 0));
        let to = self
            .date_to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999));
        (from, to)
    }
}

/// Compute the derived view: filter, then stable-sort. The input slice is
/// never reordered; the result is always rebuilt from the full mirror.
pub fn derive_view<R>(records: &[R], cfg: &FilterConfig<R::SortKey>) -> Vec<R>
where
    R: Listable + Clone,
{
    let (from, to) = cfg.date_bounds();
    let query = cfg.query.trim().to_lowercase();
    let wanted_location = cfg.location.trim().to_lowercase();

    let mut view: Vec<R> = records
        .iter()
        .filter(|r| {
            if !query.is_empty() && !r.search_text().to_lowercase().contains(&query) {
                return false;
            }
            if !wanted_location.is_empty() {
                let loc = r.location().unwrap_or("").trim().to_lowercase();
                if loc != wanted_location {
                    return false;
                }
            }
            if from.is_some() || to.is_some() {
                let date = match r.record_date() {
                    Some(date) => date,
                    None => return false,
                };
                if let Some(from) = from {
                    if date < from {
                        return false;
                    }
                }
                if let Some(to) = to {
                    if date > to {
                        return false;
                    }
                }
            }
            true
        })
        .cloned()
        .collect();

    view.sort_by(|a, b| compare_records(a, b, cfg.sort_by, cfg.order));
    view
}

fn compare_records<R: Listable>(a: &R, b: &R, key: R::SortKey, order: SortOrder) -> Ordering {
    let ord = match (a.sort_field(key), b.sort_field(key)) {
        (FieldValue::Text(a), FieldValue::Text(b)) => compare_fr(&a, &b),
        (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(&b),
        (FieldValue::Date(a), FieldValue::Date(b)) => {
            // Undated records trail dated ones whichever way the list is
            // sorted, so the direction flip happens inside this arm only.
            return match (a, b) {
                (Some(a), Some(b)) => apply_order(a.cmp(&b), order),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
        }
        // Mixed variants cannot happen for a single key; keep input order.
        _ => Ordering::Equal,
    };
    apply_order(ord, order)
}

fn apply_order(ord: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

/// Case- and accent-insensitive comparison, after the French base-sensitivity
/// collation the admin UI always used. Good enough for option lists and sort
/// keys; no collation crate is pulled in for this.
pub fn compare_fr(a: &str, b: &str) -> Ordering {
    fold_fr(a).cmp(&fold_fr(b))
}

fn fold_fr(value: &str) -> String {
    value
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'á' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' | 'ì' => 'i',
            'ô' | 'ö' | 'ó' | 'ò' | 'õ' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ÿ' | 'ý' => 'y',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Distinct, trimmed, non-empty locations for the filter dropdown, sorted
/// with the same collation the sorter uses.
pub fn distinct_locations<R: Listable>(records: &[R]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.location())
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .unique()
        .sorted_by(|a, b| compare_fr(a, b))
        .collect()
}

/// Keep the previously selected location only while it is still offered.
pub fn retain_selection(options: &[String], current: &str) -> Option<String> {
    let current = current.trim();
    if current.is_empty() {
        return None;
    }
    options
        .iter()
        .find(|opt| opt.as_str() == current)
        .cloned()
}
