/// Hard cap on rows returned by a search; the reported total is uncapped.
pub const MAX_SEARCH_RESULTS: usize = 100;

/// Administrative suffixes a Taiwanese district name may end with. Dropping
/// the suffix yields the second address pattern of the fuzzy district match.
pub const DISTRICT_SUFFIXES: [char; 4] = ['區', '市', '鎮', '鄉'];
