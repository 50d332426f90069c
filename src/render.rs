use crate::config::OutputFormat;
use crate::error::Result;
use crate::record::{Record, RecordCollection};
use prettytable::format::{FormatBuilder, TableFormat};
use prettytable::{Cell, Row, Table};
use std::io::Write;

pub const HEADERS: [&str; 6] = ["クラス", "日時", "時限", "科目", "担当教員", "備考"];

/// Renders `records` fully in memory, then writes them to `out` in one go.
pub fn render<W: Write>(
    records: &[Record],
    format: OutputFormat,
    pretty: bool,
    out: &mut W,
) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => to_json(records, pretty)?,
        OutputFormat::Text => to_text(records)?,
    };

    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

pub fn to_json(records: &[Record], pretty: bool) -> Result<String> {
    let collection = RecordCollection::from(records.to_vec());
    let mut json = if pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string(&collection)?
    };
    json.push('\n');
    Ok(json)
}

/// One header line plus one line per record, cells separated by `|`.
pub fn to_text(records: &[Record]) -> Result<String> {
    let mut table = Table::new();
    table.set_format(text_format());
    table.set_titles(Row::new(HEADERS.iter().map(|h| Cell::new(h)).collect()));

    for record in records {
        table.add_row(Row::new(
            record
                .to_cells()
                .iter()
                .map(|cell| Cell::new(&single_line(cell)))
                .collect(),
        ));
    }

    let mut buf = Vec::new();
    table.print(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn text_format() -> TableFormat {
    FormatBuilder::new()
        .column_separator('|')
        .padding(1, 1)
        .build()
}

fn single_line(cell: &str) -> String {
    cell.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
