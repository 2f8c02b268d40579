use anyhow::{Context, Result, bail};

use crate::args::Cli;
use mailvet::ValidationReport;
#[cfg(feature = "with-csv")]
use mailvet::Stage;

pub fn write_reports(rows: &[ValidationReport], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows, cli),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_invalid(rows: &[ValidationReport]) -> bool {
    rows.iter().any(|row| !row.overall_valid)
}

fn write_human(rows: &[ValidationReport], cli: &Cli) -> Result<()> {
    let text = render_human(rows);
    if let Some(path) = &cli.out {
        write_all_atomically(path, text.as_bytes())
    } else {
        print!("{text}");
        Ok(())
    }
}

fn render_human(rows: &[ValidationReport]) -> String {
    rows.iter().map(|row| format!("\n{row}\n\n")).collect()
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[ValidationReport], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())
    } else {
        println!("{s}");
        Ok(())
    }
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_rows: &[ValidationReport], _cli: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[ValidationReport], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
        Ok(())
    }
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_rows: &[ValidationReport], _cli: &Cli) -> Result<()> {
    bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
const CSV_STAGES: [Stage; 4] = [Stage::Syntax, Stage::Domain, Stage::MxRecords, Stage::Smtp];

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[ValidationReport], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv_rows(&mut wtr, rows)?;
        let data = wtr.into_inner().context("flush csv buffer")?;
        write_all_atomically(path, &data)
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        write_csv_rows(&mut wtr, rows)?;
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(feature = "with-csv")]
fn write_csv_rows<W: std::io::Write>(wtr: &mut csv::Writer<W>, rows: &[ValidationReport]) -> Result<()> {
    let mut header = vec!["email", "overall_valid"];
    header.extend(CSV_STAGES.iter().map(|stage| stage.as_str()));
    wtr.write_record(&header)?;
    for row in rows {
        let mut record = vec![
            row.email.clone(),
            row.overall_valid.to_string(),
        ];
        // colonne vide = étape non exécutée
        record.extend(CSV_STAGES.iter().map(|stage| match row.checks.get(*stage) {
            Some(check) if check.valid => format!("ok: {}", check.message),
            Some(check) => format!("fail: {}", check.message),
            None => String::new(),
        }));
        wtr.write_record(&record)?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_rows: &[ValidationReport], _cli: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    let tmp = format!("{}.tmp", path);
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
