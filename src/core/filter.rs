// LogLens - core/filter.rs
//
// Per-view filter / sort / highlight stage.
// All active filters are AND-combined and evaluated in a fixed,
// short-circuiting order: app name, level set, search, file visibility.
// Core layer: pure logic, no I/O or UI dependencies.
//
// The proxy never owns records. It keeps a mapping of display rows to
// source indices that the owning view refreshes whenever records or
// filter state change.

use crate::core::model::{Column, HighlightRange, Record, SearchField, SortOrder};
use crate::util::constants;
use crate::util::error::FilterError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rayon::slice::ParallelSliceMut;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Complete filter state of one view. Serialisable so it can be carried in
/// a session snapshot; independent of record storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Exact application name to keep. Empty = all applications.
    pub app_filter: String,

    /// Levels to keep, compared trimmed and case-insensitively. Empty = all.
    pub levels: BTreeSet<String>,

    /// Search text or regex pattern. Empty = no search.
    pub search_text: String,

    /// Field the search runs against.
    pub search_field: SearchField,

    /// Interpret `search_text` as a regular expression.
    pub search_regex: bool,

    /// When set, only records from this file are shown.
    pub show_only: Option<PathBuf>,

    /// Files whose records are hidden (ignored while `show_only` is set).
    pub hidden: BTreeSet<PathBuf>,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.app_filter.is_empty()
            && self.levels.is_empty()
            && self.search_text.is_empty()
            && self.show_only.is_none()
            && self.hidden.is_empty()
    }
}

/// Trimmed, lower-cased level used for level-set membership.
pub fn normalize_level(level: &str) -> String {
    level.trim().to_lowercase()
}

/// Compiled form of the current search.
#[derive(Debug, Clone)]
enum SearchMatcher {
    Inactive,
    Active(Regex),
    /// The pattern does not compile; every row is rejected until it changes.
    Invalid(FilterError),
}

impl SearchMatcher {
    fn compile(text: &str, is_regex: bool) -> Self {
        if text.is_empty() {
            return SearchMatcher::Inactive;
        }
        // Plain text search is a case-insensitive substring match; escaping
        // it lets both modes share one matcher and one highlight routine.
        let built = if is_regex {
            Regex::new(text)
        } else {
            RegexBuilder::new(&regex::escape(text))
                .case_insensitive(true)
                .build()
        };
        match built {
            Ok(re) => SearchMatcher::Active(re),
            Err(e) => {
                tracing::debug!(pattern = %text, error = %e, "Search pattern rejected");
                SearchMatcher::Invalid(FilterError::InvalidRegex {
                    pattern: text.to_string(),
                    source: e,
                })
            }
        }
    }
}

/// Filter, sort, and highlight stage of one view.
#[derive(Debug, Clone)]
pub struct FilterSortProxy {
    state: FilterState,
    normalized_levels: HashSet<String>,
    matcher: SearchMatcher,
    any_filter_active: bool,
    sort: Option<(Column, SortOrder)>,
    /// Source indices in display order.
    rows: Vec<usize>,
    highlight_cache: HashMap<(usize, Column), Vec<HighlightRange>>,
}

impl Default for FilterSortProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterSortProxy {
    pub fn new() -> Self {
        Self {
            state: FilterState::default(),
            normalized_levels: HashSet::new(),
            matcher: SearchMatcher::Inactive,
            any_filter_active: false,
            sort: None,
            rows: Vec::new(),
            highlight_cache: HashMap::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Filter mutation
    // -------------------------------------------------------------------------
    //
    // Mutators only update the predicate; call `invalidate` afterwards to
    // rebuild the row mapping.

    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    /// Replace the whole filter state (snapshot import).
    pub fn set_filter_state(&mut self, state: FilterState) {
        let search_changed = state.search_text != self.state.search_text
            || state.search_field != self.state.search_field
            || state.search_regex != self.state.search_regex;
        self.state = state;
        self.normalized_levels = self.state.levels.iter().map(|l| normalize_level(l)).collect();
        if search_changed {
            self.matcher = SearchMatcher::compile(&self.state.search_text, self.state.search_regex);
            self.highlight_cache.clear();
        }
        self.recompute_active();
    }

    pub fn set_app_filter(&mut self, app: &str) {
        self.state.app_filter = app.to_string();
        self.recompute_active();
    }

    pub fn set_levels<I, S>(&mut self, levels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.levels = levels.into_iter().map(Into::into).collect();
        self.normalized_levels = self.state.levels.iter().map(|l| normalize_level(l)).collect();
        self.recompute_active();
    }

    /// Set search text, field, and mode. Clears the highlight cache when any
    /// of the three changes.
    pub fn set_search(&mut self, text: &str, field: SearchField, is_regex: bool) {
        if text == self.state.search_text
            && field == self.state.search_field
            && is_regex == self.state.search_regex
        {
            return;
        }
        self.state.search_text = text.to_string();
        self.state.search_field = field;
        self.state.search_regex = is_regex;
        self.matcher = SearchMatcher::compile(text, is_regex);
        self.highlight_cache.clear();
        self.recompute_active();
    }

    pub fn set_show_only(&mut self, path: Option<PathBuf>) {
        self.state.show_only = path;
        self.recompute_active();
    }

    pub fn hide(&mut self, path: &Path) {
        self.state.hidden.insert(path.to_path_buf());
        self.recompute_active();
    }

    pub fn unhide(&mut self, path: &Path) {
        self.state.hidden.remove(path);
        self.recompute_active();
    }

    pub fn set_hidden(&mut self, hidden: BTreeSet<PathBuf>) {
        self.state.hidden = hidden;
        self.recompute_active();
    }

    /// The compile error of the current regex search, if any.
    pub fn search_error(&self) -> Option<&FilterError> {
        match &self.matcher {
            SearchMatcher::Invalid(e) => Some(e),
            _ => None,
        }
    }

    /// True when at least one filter can reject a row.
    pub fn any_filter_active(&self) -> bool {
        self.any_filter_active
    }

    fn recompute_active(&mut self) {
        self.any_filter_active = !self.state.is_empty();
    }

    // -------------------------------------------------------------------------
    // Acceptance
    // -------------------------------------------------------------------------

    /// Whether `record` passes every active filter.
    pub fn accepts(&self, record: &Record) -> bool {
        if !self.any_filter_active {
            return true;
        }

        if !self.state.app_filter.is_empty() && record.app_name != self.state.app_filter {
            return false;
        }

        if !self.normalized_levels.is_empty()
            && !self.normalized_levels.contains(&normalize_level(&record.level))
        {
            return false;
        }

        match &self.matcher {
            SearchMatcher::Inactive => {}
            SearchMatcher::Invalid(_) => return false,
            SearchMatcher::Active(re) => {
                if !search_matches(re, self.state.search_field, record) {
                    return false;
                }
            }
        }

        match &self.state.show_only {
            Some(only) => record.source_path == *only,
            None => !self.state.hidden.contains(&record.source_path),
        }
    }

    // -------------------------------------------------------------------------
    // Row mapping
    // -------------------------------------------------------------------------

    /// Rebuild the row mapping from scratch.
    pub fn invalidate(&mut self, records: &[Record]) {
        self.rows = if self.any_filter_active {
            records
                .iter()
                .enumerate()
                .filter(|(_, r)| self.accepts(r))
                .map(|(i, _)| i)
                .collect()
        } else {
            (0..records.len()).collect()
        };
        if let Some((column, order)) = self.sort {
            sort_rows(&mut self.rows, records, column, order);
        }
        self.highlight_cache.clear();
    }

    /// Fold in records appended to the source starting at `first_new`.
    ///
    /// Unsorted views append matching indices directly; sorted views re-sort.
    pub fn append(&mut self, records: &[Record], first_new: usize) {
        let start = first_new.min(records.len());
        let accepted: Vec<usize> = (start..records.len())
            .filter(|&i| self.accepts(&records[i]))
            .collect();
        self.rows.extend(accepted);
        if let Some((column, order)) = self.sort {
            sort_rows(&mut self.rows, records, column, order);
            self.highlight_cache.clear();
        }
    }

    /// Sort by `column` and re-order the current rows.
    pub fn sort(&mut self, records: &[Record], column: Column, order: SortOrder) {
        self.sort = Some((column, order));
        sort_rows(&mut self.rows, records, column, order);
    }

    /// Drop the sort; rows go back to source order.
    pub fn clear_sort(&mut self, records: &[Record]) {
        self.sort = None;
        self.invalidate(records);
    }

    pub fn sort_state(&self) -> Option<(Column, SortOrder)> {
        self.sort
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Source index of display row `row`.
    pub fn source_row(&self, row: usize) -> Option<usize> {
        self.rows.get(row).copied()
    }

    // -------------------------------------------------------------------------
    // Highlighting
    // -------------------------------------------------------------------------

    /// Character ranges of the active search inside `column` of source row
    /// `source_row`. Empty when no search is active, the search does not
    /// cover the column, or the row does not exist.
    pub fn highlight_ranges(
        &mut self,
        records: &[Record],
        source_row: usize,
        column: Column,
    ) -> &[HighlightRange] {
        let matcher = &self.matcher;
        let field = self.state.search_field;
        self.highlight_cache
            .entry((source_row, column))
            .or_insert_with(|| match (matcher, records.get(source_row)) {
                (SearchMatcher::Active(re), Some(record)) if field.covers(column) => {
                    char_ranges(re, &record.field(column))
                }
                _ => Vec::new(),
            })
    }
}

/// Search the fields selected by `field`. `All` matches when any of message,
/// level, or app name matches.
fn search_matches(re: &Regex, field: SearchField, record: &Record) -> bool {
    match field {
        SearchField::Message => re.is_match(&record.message),
        SearchField::Level => re.is_match(&record.level),
        SearchField::AppName => re.is_match(&record.app_name),
        SearchField::All => {
            re.is_match(&record.message)
                || re.is_match(&record.level)
                || re.is_match(&record.app_name)
        }
    }
}

/// Non-empty matches of `re` in `text` as char-based ranges.
fn char_ranges(re: &Regex, text: &str) -> Vec<HighlightRange> {
    let mut ranges = Vec::new();
    let mut chars_before = 0;
    let mut last_byte = 0;
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        chars_before += text[last_byte..m.start()].chars().count();
        let len = m.as_str().chars().count();
        ranges.push(HighlightRange {
            start: chars_before,
            len,
        });
        chars_before += len;
        last_byte = m.end();
    }
    ranges
}

/// Count records per level label (trimmed, upper-cased), over the whole
/// view regardless of filters.
pub fn level_counts(records: &[Record]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.level.trim().to_uppercase()).or_insert(0) += 1;
    }
    counts
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort key: a case-folded primary and the raw text as a tie-breaker.
///
/// Timestamps that parse use their canonical UTC form as the primary so that
/// two parsed timestamps compare chronologically; anything else compares as
/// case-insensitive text. Keys are plain strings, so the order is total.
///
/// In a column mixing both kinds, a parsed timestamp sits among unparsed
/// ones by its canonical text, not its raw spelling. That differs from a
/// plain-text sort but never depends on input order.
#[derive(Debug)]
struct SortKey {
    primary: String,
    raw: String,
}

impl SortKey {
    fn new(record: &Record, column: Column) -> Self {
        let raw = record.field(column).into_owned();
        let primary = match column {
            Column::Timestamp => match parse_instant(&raw) {
                Some(instant) => instant.format("%Y-%m-%d %H:%M:%S%.9f").to_string(),
                None => raw.to_lowercase(),
            },
            _ => raw.to_lowercase(),
        };
        Self { primary, raw }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.primary
            .cmp(&other.primary)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

fn sort_rows(rows: &mut Vec<usize>, records: &[Record], column: Column, order: SortOrder) {
    let mut keyed: Vec<(SortKey, usize)> = rows
        .iter()
        .filter_map(|&i| records.get(i).map(|r| (SortKey::new(r, column), i)))
        .collect();

    let compare = |a: &(SortKey, usize), b: &(SortKey, usize)| match order {
        SortOrder::Ascending => a.0.compare(&b.0),
        SortOrder::Descending => b.0.compare(&a.0),
    };

    // Both sorts are stable, so equal keys keep source order.
    if keyed.len() >= constants::PARALLEL_SORT_THRESHOLD {
        keyed.par_sort_by(compare);
    } else {
        keyed.sort_by(compare);
    }

    *rows = keyed.into_iter().map(|(_, i)| i).collect();
}

/// Parse a raw timestamp into a UTC instant. Accepts RFC 3339, ISO-8601 with
/// space or `T` separator, slash-separated dates, comma decimal separators,
/// numeric offsets, and day-first dotted dates.
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    let normalised = trimmed.replace(',', ".").replace('/', "-");

    const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalised, format) {
            return Some(dt.with_timezone(&Utc).naive_utc());
        }
    }

    let naive = normalised.trim_end_matches('Z');
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%d.%m.%Y %H:%M:%S%.f",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(ndt);
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(app: &str, level: &str, message: &str) -> Record {
        Record {
            timestamp: String::new(),
            level: level.to_string(),
            message: message.to_string(),
            app_name: app.to_string(),
            source_path: PathBuf::from("test.log"),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            make_record("AppA", "INFO", "Startup"),
            make_record("AppA", "ERROR", "Crash"),
            make_record("AppB", "DEBUG", "Debugging"),
            make_record("AppB", "INFO", "User login"),
        ]
    }

    #[test]
    fn test_empty_filter_accepts_all() {
        let records = sample();
        let mut proxy = FilterSortProxy::new();
        proxy.invalidate(&records);
        assert!(!proxy.any_filter_active());
        assert_eq!(proxy.row_count(), 4);
    }

    #[test]
    fn test_app_then_level_then_clear() {
        let records = sample();
        let mut proxy = FilterSortProxy::new();

        proxy.set_app_filter("AppA");
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 2);

        proxy.set_levels(["ERROR"]);
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 1);
        assert_eq!(proxy.source_row(0), Some(1));

        proxy.set_app_filter("");
        proxy.set_levels(Vec::<String>::new());
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 4);
        assert!(!proxy.any_filter_active());
    }

    #[test]
    fn test_level_filter_is_normalized_on_both_sides() {
        let records = vec![
            make_record("A", " Error ", "x"),
            make_record("A", "WARN", "y"),
        ];
        let mut proxy = FilterSortProxy::new();
        proxy.set_levels(["ERROR  "]);
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 1);
    }

    #[test]
    fn test_plain_search_is_case_insensitive_substring() {
        let records = sample();
        let mut proxy = FilterSortProxy::new();
        proxy.set_search("LOGIN", SearchField::Message, false);
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 1);
        assert_eq!(proxy.source_row(0), Some(3));
    }

    #[test]
    fn test_all_fields_search_matches_any_field() {
        let records = sample();
        let mut proxy = FilterSortProxy::new();
        // "appb" only occurs in the app name.
        proxy.set_search("appb", SearchField::All, false);
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 2);

        proxy.set_search("appb", SearchField::from_name("bogus"), false);
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 2);
    }

    #[test]
    fn test_invalid_regex_rejects_every_row() {
        let records = sample();
        let mut proxy = FilterSortProxy::new();
        proxy.set_search("[unclosed", SearchField::Message, true);
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 0);
        assert!(proxy.search_error().is_some());

        // The same text as plain search is fine.
        proxy.set_search("[unclosed", SearchField::Message, false);
        proxy.invalidate(&records);
        assert!(proxy.search_error().is_none());
    }

    #[test]
    fn test_regex_search() {
        let records = sample();
        let mut proxy = FilterSortProxy::new();
        proxy.set_search(r"^(Crash|Startup)$", SearchField::Message, true);
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 2);
    }

    #[test]
    fn test_show_only_and_hidden() {
        let mut records = sample();
        records[2].source_path = PathBuf::from("other.log");
        records[3].source_path = PathBuf::from("other.log");

        let mut proxy = FilterSortProxy::new();
        proxy.set_show_only(Some(PathBuf::from("other.log")));
        proxy.hide(Path::new("other.log"));
        proxy.invalidate(&records);
        // show-only wins over the hidden set.
        assert_eq!(proxy.row_count(), 2);

        proxy.set_show_only(None);
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 2);
        assert_eq!(proxy.source_row(0), Some(0));

        proxy.unhide(Path::new("other.log"));
        proxy.invalidate(&records);
        assert_eq!(proxy.row_count(), 4);
    }

    #[test]
    fn test_sort_is_case_insensitive_and_stable() {
        let records = vec![
            make_record("beta", "INFO", "1"),
            make_record("Alpha", "INFO", "2"),
            make_record("alpha", "INFO", "3"),
            make_record("Gamma", "INFO", "4"),
        ];
        let mut proxy = FilterSortProxy::new();
        proxy.invalidate(&records);
        proxy.sort(&records, Column::AppName, SortOrder::Ascending);
        let order: Vec<_> = (0..4).filter_map(|r| proxy.source_row(r)).collect();
        // "Alpha" < "alpha" only by raw tie-break.
        assert_eq!(order, vec![1, 2, 0, 3]);

        proxy.sort(&records, Column::AppName, SortOrder::Descending);
        assert_eq!(proxy.source_row(0), Some(3));
    }

    #[test]
    fn test_timestamp_sort_uses_instants_when_parseable() {
        let mut records = sample();
        records[0].timestamp = "2024-01-15T10:00:00+02:00".to_string(); // 08:00 UTC
        records[1].timestamp = "2024-01-15 09:00:00".to_string();
        records[2].timestamp = "2024/01/15 07:30:00,500".to_string();
        records[3].timestamp = "2024-01-15 08:30:00".to_string();

        let mut proxy = FilterSortProxy::new();
        proxy.invalidate(&records);
        proxy.sort(&records, Column::Timestamp, SortOrder::Ascending);
        let order: Vec<_> = (0..4).filter_map(|r| proxy.source_row(r)).collect();
        assert_eq!(order, vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_unparseable_timestamps_fall_back_to_text() {
        let mut records = sample();
        records[0].timestamp = "b-morning".to_string();
        records[1].timestamp = "A-night".to_string();
        records[2].timestamp = "c-noon".to_string();
        records[3].timestamp = "a-evening".to_string();
        let mut proxy = FilterSortProxy::new();
        proxy.invalidate(&records);
        proxy.sort(&records, Column::Timestamp, SortOrder::Ascending);
        let order: Vec<_> = (0..4).filter_map(|r| proxy.source_row(r)).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_mixed_timestamp_sort_ignores_input_order() {
        let stamps = [
            "2024-01-15 late",
            "Zulu",
            "2024-01-15 09:00:00",
            "2024-01-15T10:00:00+02:00",
        ];
        let sorted = |input: &[&str]| -> Vec<String> {
            let records: Vec<Record> = input
                .iter()
                .map(|ts| Record {
                    timestamp: ts.to_string(),
                    ..make_record("App", "INFO", "m")
                })
                .collect();
            let mut proxy = FilterSortProxy::new();
            proxy.invalidate(&records);
            proxy.sort(&records, Column::Timestamp, SortOrder::Ascending);
            (0..records.len())
                .filter_map(|r| proxy.source_row(r))
                .map(|i| records[i].timestamp.clone())
                .collect()
        };

        let forward = sorted(&stamps);
        let mut reversed = stamps;
        reversed.reverse();
        assert_eq!(forward, sorted(&reversed));
        // The offset stamp sorts by its UTC form, ahead of unparsed text.
        assert_eq!(
            forward,
            vec![
                "2024-01-15T10:00:00+02:00",
                "2024-01-15 09:00:00",
                "2024-01-15 late",
                "Zulu",
            ]
        );
    }

    #[test]
    fn test_append_respects_filter_and_sort() {
        let mut records = sample();
        let mut proxy = FilterSortProxy::new();
        proxy.set_levels(["info"]);
        proxy.invalidate(&records);
        proxy.sort(&records, Column::Message, SortOrder::Ascending);
        assert_eq!(proxy.row_count(), 2);

        records.push(make_record("AppC", "Info", "Alpha first"));
        records.push(make_record("AppC", "ERROR", "ignored"));
        proxy.append(&records, 4);
        assert_eq!(proxy.row_count(), 3);
        assert_eq!(proxy.source_row(0), Some(4));
    }

    #[test]
    fn test_highlight_ranges_are_char_based_and_cached() {
        let records = vec![make_record("App", "INFO", "héllo wörld, Wörld")];
        let mut proxy = FilterSortProxy::new();
        proxy.set_search("wörld", SearchField::Message, false);
        proxy.invalidate(&records);

        let ranges = proxy.highlight_ranges(&records, 0, Column::Message).to_vec();
        assert_eq!(
            ranges,
            vec![
                HighlightRange { start: 6, len: 5 },
                HighlightRange { start: 13, len: 5 },
            ]
        );
        // Level column is not covered by a message search.
        assert!(proxy.highlight_ranges(&records, 0, Column::Level).is_empty());

        // Changing the search invalidates cached ranges.
        proxy.set_search("héllo", SearchField::Message, false);
        let ranges = proxy.highlight_ranges(&records, 0, Column::Message).to_vec();
        assert_eq!(ranges, vec![HighlightRange { start: 0, len: 5 }]);
    }

    #[test]
    fn test_level_counts() {
        let counts = level_counts(&sample());
        assert_eq!(counts.get("INFO"), Some(&2));
        assert_eq!(counts.get("ERROR"), Some(&1));
        assert_eq!(counts.get("DEBUG"), Some(&1));
    }

    #[test]
    fn test_parse_instant_formats() {
        assert!(parse_instant("2024-01-15 14:30:22").is_some());
        assert!(parse_instant("2024-01-15T14:30:22.123Z").is_some());
        assert!(parse_instant("2024-01-15 14:30:22,123").is_some());
        assert!(parse_instant("15.01.2024 14:30:22").is_some());
        assert!(parse_instant("2024-01-15").is_some());
        assert!(parse_instant("yesterday").is_none());
        assert!(parse_instant("").is_none());
    }
}
