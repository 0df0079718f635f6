use anyhow::{bail, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// A row keeps fewer than this many cells → dropped as degenerate.
const MIN_DATA_CELLS: usize = 7;

/// The eight columns of the problem-statement listing, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "S.no")]
    SNo,
    #[serde(rename = "PS number")]
    PsNumber,
    #[serde(rename = "Category")]
    Category,
    #[serde(rename = "Organization")]
    Organization,
    #[serde(rename = "Submitted count")]
    SubmittedCount,
    #[serde(rename = "Problem statement")]
    ProblemStatement,
    #[serde(rename = "Description")]
    Description,
    #[serde(rename = "Theme")]
    Theme,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::SNo,
        Field::PsNumber,
        Field::Category,
        Field::Organization,
        Field::SubmittedCount,
        Field::ProblemStatement,
        Field::Description,
        Field::Theme,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::SNo => "S.no",
            Field::PsNumber => "PS number",
            Field::Category => "Category",
            Field::Organization => "Organization",
            Field::SubmittedCount => "Submitted count",
            Field::ProblemStatement => "Problem statement",
            Field::Description => "Description",
            Field::Theme => "Theme",
        }
    }
}

/// One parsed data row. Every field is trimmed free-form text; a cell the
/// mapping points past the end of the row comes back as an empty string, so
/// all eight fields are always well defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub s_no: String,
    pub ps_number: String,
    pub category: String,
    pub organization: String,
    pub submitted_count: String,
    pub problem_statement: String,
    pub description: String,
    pub theme: String,
}

impl Record {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::SNo => &mut self.s_no,
            Field::PsNumber => &mut self.ps_number,
            Field::Category => &mut self.category,
            Field::Organization => &mut self.organization,
            Field::SubmittedCount => &mut self.submitted_count,
            Field::ProblemStatement => &mut self.problem_statement,
            Field::Description => &mut self.description,
            Field::Theme => &mut self.theme,
        }
    }

    /// Field values in the fixed output order of [`Field::ALL`].
    pub fn values(&self) -> [&str; 8] {
        [
            &self.s_no,
            &self.ps_number,
            &self.category,
            &self.organization,
            &self.submitted_count,
            &self.problem_statement,
            &self.description,
            &self.theme,
        ]
    }
}

/// Where to find a field's cell within a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellPosition {
    /// Zero-based index from the first cell.
    FromStart(usize),
    /// One-based index from the last cell (`from_end: 2` = second-to-last).
    FromEnd(usize),
}

/// Extraction rule for one field. The page layout is an external contract, so
/// the whole mapping is data: layout drift is fixed by editing the config
/// file, not this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub field: Field,
    pub position: CellPosition,
    /// Use the text of the first nested `<a>` instead of the cell's own text
    /// when one is present.
    #[serde(default)]
    pub prefer_link_text: bool,
}

impl ColumnRule {
    fn new(field: Field, position: CellPosition, prefer_link_text: bool) -> Self {
        ColumnRule {
            field,
            position,
            prefer_link_text,
        }
    }
}

/// The mapping for the sih.gov.in problem-statement table.
pub fn default_columns() -> Vec<ColumnRule> {
    use CellPosition::{FromEnd, FromStart};
    vec![
        ColumnRule::new(Field::SNo, FromStart(0), false),
        ColumnRule::new(Field::Organization, FromStart(1), false),
        ColumnRule::new(Field::ProblemStatement, FromStart(2), true),
        ColumnRule::new(Field::PsNumber, FromStart(3), false),
        ColumnRule::new(Field::Description, FromStart(5), false),
        ColumnRule::new(Field::Category, FromStart(8), false),
        ColumnRule::new(Field::Theme, FromStart(9), false),
        ColumnRule::new(Field::SubmittedCount, FromEnd(2), false),
    ]
}

fn cell_text(cell: ElementRef, prefer_link_text: bool, link: &Selector) -> String {
    let source = if prefer_link_text {
        cell.select(link).next().unwrap_or(cell)
    } else {
        cell
    };
    source.text().collect::<String>().trim().to_string()
}

/// Parse the first `<table>` of `html` into records using `columns`.
///
/// The first row is discarded unconditionally (assumed header). Rows with
/// fewer than 7 cells are dropped without a log line. No table, or no
/// surviving rows, is a terminal failure for the run.
pub fn parse_table(html: &str, columns: &[ColumnRule]) -> Result<Vec<Record>> {
    let table_sel = Selector::parse("table").expect("CSS selector for tables should be valid");
    let row_sel = Selector::parse("tr").expect("CSS selector for rows should be valid");
    let cell_sel = Selector::parse("td").expect("CSS selector for cells should be valid");
    let link_sel = Selector::parse("a").expect("CSS selector for links should be valid");

    let doc = Html::parse_document(html);
    let Some(table) = doc.select(&table_sel).next() else {
        bail!("no table found on the webpage");
    };

    let mut records = Vec::new();
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < MIN_DATA_CELLS {
            continue;
        }

        let mut record = Record::default();
        for rule in columns {
            let index = match rule.position {
                CellPosition::FromStart(i) => Some(i),
                CellPosition::FromEnd(i) => cells.len().checked_sub(i),
            };
            *record.field_mut(rule.field) = index
                .and_then(|i| cells.get(i))
                .map(|cell| cell_text(*cell, rule.prefer_link_text, &link_sel))
                .unwrap_or_default();
        }
        records.push(record);
    }

    if records.is_empty() {
        bail!("no data rows found in the table");
    }
    Ok(records)
}
