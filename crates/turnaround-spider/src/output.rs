use crate::config::OutputConfig;
use crate::record::CandidateRecord;
use anyhow::Context;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::{debug, info, trace};

/// One output cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Empty,
}

impl Cell<'_> {
    fn from_option(value: Option<f64>) -> Self {
        value.map_or(Cell::Empty, Cell::Number)
    }

    // pandas-style text
    fn to_csv(&self) -> String {
        match self {
            Cell::Text(text) => text.to_string(),
            Cell::Number(value) => value.to_string(),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// Write the table to `<stem>.csv` and `<stem>.xlsx`, replacing any previous run's files.
pub fn write(table: &[CandidateRecord], config: &OutputConfig) -> anyhow::Result<()> {
    let time = std::time::Instant::now();

    // ensure the directory exists
    trace!("checking directory path: {:?}", config.dir);
    std::fs::create_dir_all(&config.dir)
        .with_context(|| format!("failed to create directory {}", config.dir.display()))?;

    let headers = headers(table);
    let csv_path = config.csv_path();
    write_csv(&csv_path, &headers, table)?;
    debug!("{} rows written to {}", table.len(), csv_path.display());

    let xlsx_path = config.xlsx_path();
    write_xlsx(&xlsx_path, &headers, table)?;
    debug!("{} rows written to {}", table.len(), xlsx_path.display());

    info!("output written, {}", crate::time_elapsed(time));

    Ok(())
}

/// Column labels; periods are named by fiscal year when every row shares the same years,
/// otherwise `Y0`, `Y1`, `Y2`.
pub fn headers(table: &[CandidateRecord]) -> Vec<String> {
    let [y0, y1, y2] = period_labels(table);
    vec![
        "Ticker".to_string(),
        format!("Rev_{y0}($M)"),
        format!("Rev_{y1}($M)"),
        format!("Rev_{y2}($M)"),
        format!("NI_{y0}($M)"),
        format!("NI_{y1}($M)"),
        format!("NI_{y2}($M)"),
        format!("OCF_{y2}($M)"),
        "Debt/Equity".to_string(),
        "RevCAGR_3y(%)".to_string(),
        "NICAGR_3y(%)".to_string(),
        "NI_sign_change".to_string(),
        "MarketCap($M)".to_string(),
    ]
}

fn period_labels(table: &[CandidateRecord]) -> [String; 3] {
    match table.split_first() {
        Some((first, rest)) if rest.iter().all(|r| r.fiscal_years == first.fiscal_years) => {
            first.fiscal_years.map(|year| year.to_string())
        }
        _ => ["Y0".to_string(), "Y1".to_string(), "Y2".to_string()],
    }
}

/// A record's cells, in [`headers`] order.
pub fn cells(record: &CandidateRecord) -> Vec<Cell<'_>> {
    vec![
        Cell::Text(&record.ticker),
        Cell::Number(record.revenue[0]),
        Cell::Number(record.revenue[1]),
        Cell::Number(record.revenue[2]),
        Cell::Number(record.net_income[0]),
        Cell::Number(record.net_income[1]),
        Cell::Number(record.net_income[2]),
        Cell::Number(record.operating_cash_flow_latest),
        Cell::from_option(record.debt_to_equity),
        Cell::from_option(record.revenue_cagr_3y),
        Cell::from_option(record.net_income_cagr_3y),
        Cell::Bool(record.net_income_sign_change),
        Cell::from_option(record.market_cap),
    ]
}

fn write_csv(path: &Path, headers: &[String], table: &[CandidateRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create CSV writer at {}", path.display()))?;

    wtr.write_record(headers)?;
    for record in table {
        wtr.write_record(cells(record).iter().map(Cell::to_csv))?;
    }
    wtr.flush()?;

    Ok(())
}

fn write_xlsx(path: &Path, headers: &[String], table: &[CandidateRecord]) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for (i, record) in table.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, cell) in cells(record).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(row, col, value)?;
                }
                Cell::Bool(value) => {
                    worksheet.write_boolean(row, col, value)?;
                }
                // blank, as pandas leaves NaN
                Cell::Empty => {}
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to save workbook to {}", path.display()))?;

    Ok(())
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
