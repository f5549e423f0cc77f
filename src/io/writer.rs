//! Nanopublication serialization.
//!
//! TriG output has one `<graph> { ... }` block per partition; N-Quads output
//! one line per statement. Units are followed by a blank line.

use std::io::{self, Write};

use super::RdfSyntax;
use crate::types::{Nanopub, Partition};

/// Write one nanopublication.
pub fn write_nanopub<W: Write + ?Sized>(out: &mut W, nanopub: &Nanopub, syntax: RdfSyntax) -> io::Result<()> {
    match syntax {
        RdfSyntax::TriG => {
            for partition in Partition::ALL {
                writeln!(out, "<{}> {{", nanopub.graph_uri(partition))?;
                for st in nanopub.partition(partition) {
                    writeln!(out, "  {} <{}> {} .", st.subject, st.predicate, st.object)?;
                }
                writeln!(out, "}}")?;
                writeln!(out)?;
            }
        }
        RdfSyntax::NQuads => {
            for (_, st) in nanopub.statements() {
                writeln!(out, "{}", st)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Serialize one nanopublication to a string.
pub fn to_string(nanopub: &Nanopub, syntax: RdfSyntax) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_nanopub(&mut buf, nanopub, syntax);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reader::read_nanopubs;
    use crate::types::nanopub::tests::make_statements;
    use crate::types::Term;

    fn make_nanopub() -> Nanopub {
        let mut statements = make_statements("http://ex.org/np1");
        statements.push(crate::types::Statement::new(
            Term::Blank("b0".into()),
            "http://ex.org/label",
            Term::lang("line one\n\"quoted\"", "en"),
            "http://ex.org/np1#assertion",
        ));
        Nanopub::from_statements(statements).unwrap()
    }

    #[test]
    fn test_trig_reads_back() {
        let np = make_nanopub();
        let text = to_string(&np, RdfSyntax::TriG);
        assert!(text.starts_with("<http://ex.org/np1#Head> {\n"));
        let back = read_nanopubs(text.as_bytes(), RdfSyntax::TriG).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].len(), np.len());
        assert_eq!(back[0].uri(), np.uri());
    }

    #[test]
    fn test_nquads_one_line_per_statement() {
        let np = make_nanopub();
        let text = to_string(&np, RdfSyntax::NQuads);
        assert_eq!(text.lines().filter(|l| !l.is_empty()).count(), np.len());
        let back = read_nanopubs(text.as_bytes(), RdfSyntax::NQuads).unwrap();
        assert_eq!(back[0].assertion(), np.assertion());
    }
}
