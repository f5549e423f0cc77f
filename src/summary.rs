//! Per-file run summaries.
//!
//! One CSV line per input file, appended to a shared table file that other
//! runs may append to as well. The file is opened, written, flushed and closed
//! for every line.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::matcher::MatchStats;
use crate::store::LoadStats;

/// Summary of one `reuse` input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReuseSummary {
    /// Input file name.
    pub file: String,
    /// Corpus Index counters.
    pub load: LoadStats,
    /// Matching counters, cumulative over the invocation.
    pub matched: MatchStats,
    /// Whether topic columns apply.
    pub lineage: bool,
}

impl ReuseSummary {
    /// CSV line: `file,older,unique,new,reused[,topic_matches,in_corpus_dups,out_of_corpus_dups,matching_errors]`.
    pub fn table_line(&self) -> String {
        let mut line = format!(
            "{},{},{},{},{}",
            self.file,
            self.load.reusable_count,
            self.load.unique_reusable_count,
            self.matched.input_count,
            self.matched.reuse_count
        );
        if self.lineage {
            line.push_str(&format!(
                ",{},{},{},{}",
                self.matched.superseded_count,
                self.matched.in_corpus_duplicate_topics,
                self.load.out_of_corpus_duplicate_topics,
                self.matched.matching_errors()
            ));
        }
        line
    }
}

/// Summary of one `index-reuse` inventory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexReuseSummary {
    /// Inventory file name.
    pub file: String,
    /// Reused prior pages.
    pub reuse_count: usize,
    /// Newly minted pages.
    pub new_pages: usize,
    /// Identity of the complete index, if one was minted.
    pub index_uri: Option<String>,
}

impl IndexReuseSummary {
    /// CSV line: `file,reused`.
    pub fn table_line(&self) -> String {
        format!("{},{}", self.file, self.reuse_count)
    }
}

/// Append one line to `path`, creating it if needed.
pub fn append_table_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()
}

/// File name for table lines.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_summary(lineage: bool) -> ReuseSummary {
        ReuseSummary {
            file: "new.trig".into(),
            load: LoadStats {
                reusable_count: 10,
                unique_reusable_count: 9,
                out_of_corpus_duplicate_topics: 2,
            },
            matched: MatchStats {
                input_count: 8,
                reuse_count: 5,
                new_count: 3,
                superseded_count: 1,
                in_corpus_duplicate_topics: 1,
                ambiguous_topic_hits: 1,
            },
            lineage,
        }
    }

    #[test]
    fn test_reuse_line_columns() {
        assert_eq!(make_summary(false).table_line(), "new.trig,10,9,8,5");
        assert_eq!(make_summary(true).table_line(), "new.trig,10,9,8,5,1,1,2,2");
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        append_table_line(&path, "a,1").unwrap();
        append_table_line(&path, "b,2").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,1\nb,2\n");
    }
}
