use std::fmt;

/// Zero-based position of a cell inside a sheet range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl fmt::Display for CellRef {
    /// A1 notation, e.g. `B12`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.column + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + rem as u8));
            n = (n - 1) / 26;
        }
        let column: String = letters.into_iter().rev().collect();
        write!(f, "{column}{}", self.row + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    pub found: bool,
    pub total: usize,
    /// One-based index of the focused match; 0 when nothing is found.
    pub current: usize,
    pub location: Option<CellRef>,
    pub message: Option<String>,
}

impl SearchOutcome {
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Case-insensitive text search over sheet cells with a wrapping match cursor.
#[derive(Debug, Clone, Default)]
pub struct MatchCursor {
    term: String,
    matches: Vec<CellRef>,
    index: Option<usize>,
}

impl MatchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn search(&mut self, term: &str, rows: &[Vec<String>]) -> SearchOutcome {
        self.clear();
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return SearchOutcome::not_found();
        }
        self.term = term.trim().to_string();

        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if value.to_lowercase().contains(&needle) {
                    self.matches.push(CellRef {
                        row: row_idx,
                        column: col_idx,
                    });
                }
            }
        }

        if self.matches.is_empty() {
            return SearchOutcome::not_found();
        }
        self.index = Some(0);
        self.outcome()
    }

    pub fn next(&mut self) -> SearchOutcome {
        if self.matches.is_empty() {
            return SearchOutcome::not_found();
        }
        let len = self.matches.len();
        self.index = Some(self.index.map_or(0, |i| (i + 1) % len));
        self.outcome()
    }

    pub fn prev(&mut self) -> SearchOutcome {
        if self.matches.is_empty() {
            return SearchOutcome::not_found();
        }
        let len = self.matches.len();
        self.index = Some(match self.index {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        self.outcome()
    }

    pub fn clear(&mut self) {
        self.term.clear();
        self.matches.clear();
        self.index = None;
    }

    fn outcome(&self) -> SearchOutcome {
        let index = self.index.unwrap_or(0);
        SearchOutcome {
            found: true,
            total: self.matches.len(),
            current: index + 1,
            location: self.matches.get(index).copied(),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Vec<Vec<String>> {
        vec![
            vec!["14/4".into(), "Alice".into(), "Instagram".into()],
            vec!["14/4".into(), "Bob".into(), "Facebook".into()],
            vec!["15/4".into(), "alice cooper".into(), "Instagram".into()],
        ]
    }

    #[test]
    fn a1_notation() {
        assert_eq!(CellRef { row: 0, column: 0 }.to_string(), "A1");
        assert_eq!(CellRef { row: 11, column: 1 }.to_string(), "B12");
        assert_eq!(CellRef { row: 0, column: 26 }.to_string(), "AA1");
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let mut cursor = MatchCursor::new();
        let first = cursor.search("ALICE", &sheet());
        assert_eq!((first.total, first.current), (2, 1));
        assert_eq!(first.location, Some(CellRef { row: 0, column: 1 }));

        assert_eq!(cursor.next().current, 2);
        assert_eq!(cursor.next().current, 1);
        assert_eq!(cursor.prev().current, 2);
    }

    #[test]
    fn blank_term_and_cleared_cursor_find_nothing() {
        let mut cursor = MatchCursor::new();
        assert!(!cursor.search("   ", &sheet()).found);
        cursor.search("bob", &sheet());
        cursor.clear();
        assert!(!cursor.next().found);
        assert_eq!(cursor.term(), "");
    }
}
