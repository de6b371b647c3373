//! Grouping of extraction records into per-category result tables.
//!
//! Everything here is a pure function of the record list; the TUI keeps the
//! cursor and the radio selection on top of it.

use crate::category::Category;
use crate::record::{ExtractionRecord, RecordKey};

/// Display text for a field the backend did not fill.
pub const NOT_MENTIONED: &str = "未提及";

/// A column of a result table: record field key and its header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
}

const fn spec(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label }
}

pub const CDE_FIELDS: &[FieldSpec] = &[
    spec("company_name", "公司名称"),
    spec("drug_name", "试验药物名称/代号"),
    spec("dosage_form", "剂型/规格"),
    spec("trial_phase", "试验分期/单药联合"),
    spec("study_design", "方案设计"),
    spec("primary_endpoint", "主要指标"),
    spec("total_sample_size", "总样本量"),
    spec("center_count", "中心数"),
    spec("first_patient_in", "首例入组日期"),
    spec("study_completion_date", "试验完成日期"),
];

pub const FOREIGN_TRIAL_FIELDS: &[FieldSpec] = &[
    spec("company_publication_country", "公司名称/发表时间/试验国家"),
    spec("drug_name", "试验药物名称/代号"),
    spec("dosage_form", "剂型/规格"),
    spec("trial_phase", "试验分期/单药联合"),
    spec("study_design", "方案设计"),
    spec("primary_secondary_endpoints", "主要指标/次要指标"),
    spec("confidence_interval_values", "置信区间/界值/个体内CV值"),
    spec("trial_results_conclusions", "PK/PD/主次疗评指标试验结果及试验结论"),
    spec("center_count", "中心数"),
    spec("reference_level", "参考等级（强、一般、弱）"),
];

/// Table columns for a category. Only the extraction categories have tables.
pub fn fields_for(category: Category) -> Option<&'static [FieldSpec]> {
    match category {
        Category::Cde => Some(CDE_FIELDS),
        Category::ForeignTrial => Some(FOREIGN_TRIAL_FIELDS),
        Category::Regulation | Category::Label => None,
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Index into the record list the rows were built from.
    pub record_index: usize,
    pub key: RecordKey,
    pub literature_name: String,
    /// One cell per [`FieldSpec`] of the table, with [`NOT_MENTIONED`] fallback.
    pub cells: Vec<String>,
    pub inclusion: String,
    pub exclusion: String,
}

/// A category table with at least one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub category: Category,
    pub fields: &'static [FieldSpec],
    pub rows: Vec<ResultRow>,
}

/// Records partitioned for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedResults {
    /// Tables in display order; categories without ok records are absent.
    pub tables: Vec<ResultTable>,
    /// Indices of records carrying an `error`.
    pub failed: Vec<usize>,
    /// Indices of ok records whose section is not a table category. They are
    /// counted as successful but never rendered.
    pub dropped: Vec<usize>,
    pub total: usize,
}

impl GroupedResults {
    pub fn build(records: &[ExtractionRecord]) -> Self {
        let mut grouped = GroupedResults {
            total: records.len(),
            ..Default::default()
        };

        for &category in Category::extractable() {
            let Some(fields) = fields_for(category) else {
                continue;
            };
            let rows: Vec<ResultRow> = records
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.is_failed() && r.category() == Some(category))
                .map(|(i, r)| build_row(i, r, fields))
                .collect();
            if !rows.is_empty() {
                grouped.tables.push(ResultTable {
                    category,
                    fields,
                    rows,
                });
            }
        }

        for (i, record) in records.iter().enumerate() {
            if record.is_failed() {
                grouped.failed.push(i);
            } else if !record
                .category()
                .is_some_and(|c| fields_for(c).is_some())
            {
                grouped.dropped.push(i);
            }
        }

        grouped
    }

    pub fn table(&self, category: Category) -> Option<&ResultTable> {
        self.tables.iter().find(|t| t.category == category)
    }

    /// Number of rows in a category's table, zero if it has none.
    pub fn row_count(&self, category: Category) -> usize {
        self.table(category).map_or(0, |t| t.rows.len())
    }

    /// Every row across all tables, in display order. Radio selection and
    /// cursor movement run over this sequence.
    pub fn rows(&self) -> impl Iterator<Item = &ResultRow> {
        self.tables.iter().flat_map(|t| t.rows.iter())
    }

    pub fn succeeded(&self) -> usize {
        self.total - self.failed.len()
    }

    /// `共处理 N 个文献，成功 S 个，失败 F 个`
    pub fn footer(&self) -> String {
        format!(
            "共处理 {} 个文献，成功 {} 个，失败 {} 个",
            self.total,
            self.succeeded(),
            self.failed.len()
        )
    }
}

fn build_row(record_index: usize, record: &ExtractionRecord, fields: &[FieldSpec]) -> ResultRow {
    ResultRow {
        record_index,
        key: record.key(),
        literature_name: record.literature_name.clone(),
        cells: fields
            .iter()
            .map(|f| record.field(f.key).unwrap_or_else(|| NOT_MENTIONED.to_string()))
            .collect(),
        inclusion: record.inclusion().unwrap_or(NOT_MENTIONED).to_string(),
        exclusion: record.exclusion().unwrap_or(NOT_MENTIONED).to_string(),
    }
}

/// Find the record a selection key refers to. Failed records never match.
pub fn find_selected<'a>(
    records: &'a [ExtractionRecord],
    key: &RecordKey,
) -> Option<&'a ExtractionRecord> {
    records.iter().find(|r| !r.is_failed() && r.key() == *key)
}
