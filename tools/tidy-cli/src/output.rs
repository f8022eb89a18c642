use std::borrow::Cow;
use std::io::Write;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::AlignedVec;
use tidy_protocol::{AnnotatedToken, TokenTable, TABLE_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One JSON array
    Json,
    /// One JSON object per line
    Jsonl,
    /// Tab-separated table with a header row
    Tsv,
    /// Zero-copy rkyv archive of the whole table
    Rkyv,
}

pub fn write_rows(writer: &mut dyn Write, rows: Vec<AnnotatedToken>, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *writer, &rows)?;
            writeln!(writer)?;
        }
        Format::Jsonl => {
            for row in &rows {
                serde_json::to_writer(&mut *writer, row)?;
                writeln!(writer)?;
            }
        }
        Format::Tsv => write_tsv(writer, &rows)?,
        Format::Rkyv => writer.write_all(&archive(&TokenTable::new(rows))?)?,
    }

    writer.flush()?;
    Ok(())
}

pub fn archive(table: &TokenTable) -> Result<AlignedVec> {
    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(table)
        .map_err(|err| anyhow!("failed to archive token table: {err}"))?;
    Ok(serializer.into_serializer().into_inner())
}

fn write_tsv(writer: &mut dyn Write, rows: &[AnnotatedToken]) -> Result<()> {
    writeln!(writer, "{}", TABLE_COLUMNS.join("\t"))?;

    for row in rows {
        let paragraph = row.paragraph_id.to_string();
        let context = [
            row.doc_id.as_deref().unwrap_or(""),
            paragraph.as_str(),
            row.sentence_id.as_deref().unwrap_or(""),
            row.sentence_text.as_deref().unwrap_or(""),
        ];
        let cells: Vec<Cow<'_, str>> = context.into_iter().chain(row.fields()).map(escape).collect();
        writeln!(writer, "{}", cells.join("\t"))?;
    }

    Ok(())
}

/// Keeps every cell on one line and free of column separators.
fn escape(cell: &str) -> Cow<'_, str> {
    if !cell.contains(['\\', '\t', '\n', '\r']) {
        return Cow::Borrowed(cell);
    }

    let mut escaped = String::with_capacity(cell.len() + 4);
    for c in cell.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_protocol::TABLE_VERSION;

    const TEXT: &str = "# newdoc id = d1\n# newpar\n# sent_id = 1\n# text = Hi.\n1\tHi\thi\tINTJ\t_\t_\t0\troot\t_\t_\n2\t.\t.\tPUNCT\t_\t_\t1\tpunct\t_\t_\n";

    fn rows() -> Vec<AnnotatedToken> {
        tidy_reshaper::reshape(TEXT).unwrap()
    }

    fn render(format: Format) -> Vec<u8> {
        let mut out = Vec::new();
        write_rows(&mut out, rows(), format).unwrap();
        out
    }

    #[test]
    fn test_tsv() {
        let out = String::from_utf8(render(Format::Tsv)).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split('\t').count(), 14);
        assert!(lines[0].starts_with("doc_id\tparagraph_id\tsentence_id\tsentence_text\tid\tform"));
        assert_eq!(lines[1], "d1\t1\t1\tHi.\t1\tHi\thi\tINTJ\t_\t_\t0\troot\t_\t_");
    }

    #[test]
    fn test_tsv_escapes_and_missing_context() {
        let mut row = rows().remove(0);
        row.doc_id = None;
        row.sentence_text = Some("a\tb\\c".to_string());

        let mut out = Vec::new();
        write_rows(&mut out, vec![row], Format::Tsv).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(out.lines().nth(1).unwrap(), "\t1\t1\ta\\tb\\\\c\t1\tHi\thi\tINTJ\t_\t_\t0\troot\t_\t_");
    }

    #[test]
    fn test_json_lines() {
        let out = String::from_utf8(render(Format::Jsonl)).unwrap();
        let parsed: Vec<AnnotatedToken> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(parsed, rows());

        let first: serde_json::Value = serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(first["paragraph_id"], 1);
        assert_eq!(first["upostag"], "INTJ");
    }

    #[test]
    fn test_json_array() {
        let parsed: Vec<AnnotatedToken> = serde_json::from_slice(&render(Format::Json)).unwrap();
        assert_eq!(parsed, rows());
    }

    #[test]
    fn test_rkyv_archive_validates() {
        let bytes = render(Format::Rkyv);
        let mut aligned = AlignedVec::new();
        aligned.extend_from_slice(&bytes);

        let table = rkyv::check_archived_root::<TokenTable>(&aligned).unwrap();
        assert_eq!(table.version, TABLE_VERSION);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].form.as_str(), ".");
    }
}
