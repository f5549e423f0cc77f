//! Record file reading and writing.

use std::io::{BufRead, Write};

use super::CorpusError;
use crate::types::ReuseRecord;

/// Read records one at a time, skipping blank lines.
pub fn for_each_record<R, E, F>(reader: R, mut handle: F) -> Result<usize, E>
where
    R: BufRead,
    E: From<CorpusError>,
    F: FnMut(ReuseRecord) -> Result<(), E>,
{
    let mut count = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(CorpusError::from)?;
        if let Some(record) = ReuseRecord::parse_line(&line, i + 1).map_err(CorpusError::from)? {
            count += 1;
            handle(record)?;
        }
    }
    Ok(count)
}

/// Identity column of a record source, in file order.
pub fn read_identities<R: BufRead>(reader: R) -> Result<Vec<String>, CorpusError> {
    let mut out = Vec::new();
    for_each_record(reader, |record| -> Result<(), CorpusError> {
        out.push(record.identity);
        Ok(())
    })?;
    Ok(out)
}

/// Write one record line.
pub fn write_record<W: Write + ?Sized>(out: &mut W, record: &ReuseRecord) -> std::io::Result<()> {
    writeln!(out, "{}", record)
}
