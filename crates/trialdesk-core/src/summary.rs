//! The editable trial-summary draft and typed addressing of its fields.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept strings, numbers, booleans and `null` where a string is expected.
/// Falsy values (`null`, `false`, zero) become an empty field.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Treat an explicit `null` group like a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyObjectives {
    #[serde(deserialize_with = "lenient_string")]
    pub primary_objective: String,
    #[serde(deserialize_with = "lenient_string")]
    pub secondary_objective: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficacyEndpoints {
    #[serde(deserialize_with = "lenient_string")]
    pub primary_endpoint: String,
    #[serde(deserialize_with = "lenient_string")]
    pub secondary_endpoint: String,
    #[serde(deserialize_with = "lenient_string")]
    pub exploratory_endpoint: String,
    #[serde(deserialize_with = "lenient_string")]
    pub safety_evaluation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialDesign {
    #[serde(deserialize_with = "lenient_string")]
    pub study_population_selection: String,
    #[serde(deserialize_with = "lenient_string")]
    pub positive_control_selection: String,
    #[serde(deserialize_with = "lenient_string")]
    pub primary_endpoint_selection: String,
}

/// Structured protocol summary. Every field defaults to an empty string, so a
/// partial backend payload always deserializes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryDraft {
    #[serde(deserialize_with = "lenient_string")]
    pub study_title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub sponsor: String,
    #[serde(deserialize_with = "lenient_string")]
    pub protocol_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub principal_investigator: String,
    #[serde(deserialize_with = "lenient_string")]
    pub drug_name_specification: String,
    #[serde(deserialize_with = "lenient_string")]
    pub indication: String,
    #[serde(deserialize_with = "lenient_string")]
    pub trial_phase: String,
    #[serde(deserialize_with = "lenient_string")]
    pub center_count: String,
    #[serde(deserialize_with = "lenient_string")]
    pub study_period: String,
    #[serde(deserialize_with = "null_as_default")]
    pub study_objectives: StudyObjectives,
    #[serde(deserialize_with = "null_as_default")]
    pub efficacy_endpoints: EfficacyEndpoints,
    #[serde(deserialize_with = "null_as_default")]
    pub trial_design: TrialDesign,
    #[serde(deserialize_with = "lenient_string")]
    pub trial_process: String,
    #[serde(deserialize_with = "lenient_string")]
    pub sample_size: String,
    #[serde(deserialize_with = "lenient_string")]
    pub investigational_drug: String,
    #[serde(deserialize_with = "lenient_string")]
    pub concomitant_treatment: String,
    #[serde(deserialize_with = "lenient_string")]
    pub rescue_treatment: String,
    #[serde(deserialize_with = "lenient_string")]
    pub inclusion_exclusion_criteria: String,
    #[serde(deserialize_with = "lenient_string")]
    pub withdrawal_termination_criteria: String,
    #[serde(deserialize_with = "lenient_string")]
    pub statistical_analysis: String,
}

/// Top-level string fields of a [`SummaryDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    StudyTitle,
    Sponsor,
    ProtocolNumber,
    PrincipalInvestigator,
    DrugNameSpecification,
    Indication,
    TrialPhase,
    CenterCount,
    StudyPeriod,
    TrialProcess,
    SampleSize,
    InvestigationalDrug,
    ConcomitantTreatment,
    RescueTreatment,
    InclusionExclusionCriteria,
    WithdrawalTerminationCriteria,
    StatisticalAnalysis,
}

impl ScalarField {
    pub fn key(self) -> &'static str {
        match self {
            Self::StudyTitle => "study_title",
            Self::Sponsor => "sponsor",
            Self::ProtocolNumber => "protocol_number",
            Self::PrincipalInvestigator => "principal_investigator",
            Self::DrugNameSpecification => "drug_name_specification",
            Self::Indication => "indication",
            Self::TrialPhase => "trial_phase",
            Self::CenterCount => "center_count",
            Self::StudyPeriod => "study_period",
            Self::TrialProcess => "trial_process",
            Self::SampleSize => "sample_size",
            Self::InvestigationalDrug => "investigational_drug",
            Self::ConcomitantTreatment => "concomitant_treatment",
            Self::RescueTreatment => "rescue_treatment",
            Self::InclusionExclusionCriteria => "inclusion_exclusion_criteria",
            Self::WithdrawalTerminationCriteria => "withdrawal_termination_criteria",
            Self::StatisticalAnalysis => "statistical_analysis",
        }
    }
}

/// The three nested groups of a [`SummaryDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    StudyObjectives,
    EfficacyEndpoints,
    TrialDesign,
}

impl Group {
    pub fn key(self) -> &'static str {
        match self {
            Self::StudyObjectives => "study_objectives",
            Self::EfficacyEndpoints => "efficacy_endpoints",
            Self::TrialDesign => "trial_design",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StudyObjectives => "研究目的",
            Self::EfficacyEndpoints => "疗效指标",
            Self::TrialDesign => "试验设计",
        }
    }
}

/// Leaf fields inside the nested groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedField {
    PrimaryObjective,
    SecondaryObjective,
    PrimaryEndpoint,
    SecondaryEndpoint,
    ExploratoryEndpoint,
    SafetyEvaluation,
    StudyPopulationSelection,
    PositiveControlSelection,
    PrimaryEndpointSelection,
}

impl NestedField {
    pub fn group(self) -> Group {
        match self {
            Self::PrimaryObjective | Self::SecondaryObjective => Group::StudyObjectives,
            Self::PrimaryEndpoint
            | Self::SecondaryEndpoint
            | Self::ExploratoryEndpoint
            | Self::SafetyEvaluation => Group::EfficacyEndpoints,
            Self::StudyPopulationSelection
            | Self::PositiveControlSelection
            | Self::PrimaryEndpointSelection => Group::TrialDesign,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::PrimaryObjective => "primary_objective",
            Self::SecondaryObjective => "secondary_objective",
            Self::PrimaryEndpoint => "primary_endpoint",
            Self::SecondaryEndpoint => "secondary_endpoint",
            Self::ExploratoryEndpoint => "exploratory_endpoint",
            Self::SafetyEvaluation => "safety_evaluation",
            Self::StudyPopulationSelection => "study_population_selection",
            Self::PositiveControlSelection => "positive_control_selection",
            Self::PrimaryEndpointSelection => "primary_endpoint_selection",
        }
    }
}

/// Address of one editable leaf: a top-level field or a field inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Flat(ScalarField),
    Nested(NestedField),
}

impl FieldPath {
    /// Dotted form, e.g. `trial_design.positive_control_selection`.
    pub fn dotted(self) -> String {
        match self {
            FieldPath::Flat(f) => f.key().to_string(),
            FieldPath::Nested(f) => format!("{}.{}", f.group().key(), f.key()),
        }
    }

    /// Parse a dotted path. Only paths that name a real leaf are accepted.
    pub fn parse(dotted: &str) -> Option<FieldPath> {
        FORM.iter()
            .filter_map(|row| match row {
                FormRow::Field(f) => Some(f.path),
                FormRow::Section(_) => None,
            })
            .find(|p| p.dotted() == dotted)
    }
}

impl SummaryDraft {
    /// The locally editable copy of a backend summary: the three
    /// administrative fields always start empty.
    pub fn editable_copy(&self) -> SummaryDraft {
        SummaryDraft {
            sponsor: String::new(),
            protocol_number: String::new(),
            principal_investigator: String::new(),
            ..self.clone()
        }
    }

    pub fn get(&self, path: FieldPath) -> &str {
        match path {
            FieldPath::Flat(f) => self.scalar(f),
            FieldPath::Nested(f) => self.nested(f),
        }
    }

    /// Replace the addressed leaf; siblings are left untouched.
    pub fn set(&mut self, path: FieldPath, value: String) {
        *self.slot_mut(path) = value;
    }

    fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::StudyTitle => &self.study_title,
            ScalarField::Sponsor => &self.sponsor,
            ScalarField::ProtocolNumber => &self.protocol_number,
            ScalarField::PrincipalInvestigator => &self.principal_investigator,
            ScalarField::DrugNameSpecification => &self.drug_name_specification,
            ScalarField::Indication => &self.indication,
            ScalarField::TrialPhase => &self.trial_phase,
            ScalarField::CenterCount => &self.center_count,
            ScalarField::StudyPeriod => &self.study_period,
            ScalarField::TrialProcess => &self.trial_process,
            ScalarField::SampleSize => &self.sample_size,
            ScalarField::InvestigationalDrug => &self.investigational_drug,
            ScalarField::ConcomitantTreatment => &self.concomitant_treatment,
            ScalarField::RescueTreatment => &self.rescue_treatment,
            ScalarField::InclusionExclusionCriteria => &self.inclusion_exclusion_criteria,
            ScalarField::WithdrawalTerminationCriteria => &self.withdrawal_termination_criteria,
            ScalarField::StatisticalAnalysis => &self.statistical_analysis,
        }
    }

    fn nested(&self, field: NestedField) -> &str {
        match field {
            NestedField::PrimaryObjective => &self.study_objectives.primary_objective,
            NestedField::SecondaryObjective => &self.study_objectives.secondary_objective,
            NestedField::PrimaryEndpoint => &self.efficacy_endpoints.primary_endpoint,
            NestedField::SecondaryEndpoint => &self.efficacy_endpoints.secondary_endpoint,
            NestedField::ExploratoryEndpoint => &self.efficacy_endpoints.exploratory_endpoint,
            NestedField::SafetyEvaluation => &self.efficacy_endpoints.safety_evaluation,
            NestedField::StudyPopulationSelection => &self.trial_design.study_population_selection,
            NestedField::PositiveControlSelection => &self.trial_design.positive_control_selection,
            NestedField::PrimaryEndpointSelection => &self.trial_design.primary_endpoint_selection,
        }
    }

    fn slot_mut(&mut self, path: FieldPath) -> &mut String {
        match path {
            FieldPath::Flat(f) => match f {
                ScalarField::StudyTitle => &mut self.study_title,
                ScalarField::Sponsor => &mut self.sponsor,
                ScalarField::ProtocolNumber => &mut self.protocol_number,
                ScalarField::PrincipalInvestigator => &mut self.principal_investigator,
                ScalarField::DrugNameSpecification => &mut self.drug_name_specification,
                ScalarField::Indication => &mut self.indication,
                ScalarField::TrialPhase => &mut self.trial_phase,
                ScalarField::CenterCount => &mut self.center_count,
                ScalarField::StudyPeriod => &mut self.study_period,
                ScalarField::TrialProcess => &mut self.trial_process,
                ScalarField::SampleSize => &mut self.sample_size,
                ScalarField::InvestigationalDrug => &mut self.investigational_drug,
                ScalarField::ConcomitantTreatment => &mut self.concomitant_treatment,
                ScalarField::RescueTreatment => &mut self.rescue_treatment,
                ScalarField::InclusionExclusionCriteria => &mut self.inclusion_exclusion_criteria,
                ScalarField::WithdrawalTerminationCriteria => {
                    &mut self.withdrawal_termination_criteria
                }
                ScalarField::StatisticalAnalysis => &mut self.statistical_analysis,
            },
            FieldPath::Nested(f) => match f {
                NestedField::PrimaryObjective => &mut self.study_objectives.primary_objective,
                NestedField::SecondaryObjective => &mut self.study_objectives.secondary_objective,
                NestedField::PrimaryEndpoint => &mut self.efficacy_endpoints.primary_endpoint,
                NestedField::SecondaryEndpoint => &mut self.efficacy_endpoints.secondary_endpoint,
                NestedField::ExploratoryEndpoint => {
                    &mut self.efficacy_endpoints.exploratory_endpoint
                }
                NestedField::SafetyEvaluation => &mut self.efficacy_endpoints.safety_evaluation,
                NestedField::StudyPopulationSelection => {
                    &mut self.trial_design.study_population_selection
                }
                NestedField::PositiveControlSelection => {
                    &mut self.trial_design.positive_control_selection
                }
                NestedField::PrimaryEndpointSelection => {
                    &mut self.trial_design.primary_endpoint_selection
                }
            },
        }
    }
}

/// One editable row of the summary form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub path: FieldPath,
    /// Multi-line fields get a taller editor and accept newlines.
    pub multiline: bool,
}

/// A row of the summary form: a group header or an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Section(Group),
    Field(FormField),
}

const fn flat(label: &'static str, field: ScalarField, multiline: bool) -> FormRow {
    FormRow::Field(FormField {
        label,
        path: FieldPath::Flat(field),
        multiline,
    })
}

const fn nested(label: &'static str, field: NestedField) -> FormRow {
    FormRow::Field(FormField {
        label,
        path: FieldPath::Nested(field),
        multiline: true,
    })
}

/// Form layout, top to bottom. Every leaf of [`SummaryDraft`] appears once.
pub const FORM: &[FormRow] = &[
    flat("研究题目", ScalarField::StudyTitle, true),
    flat("申办者", ScalarField::Sponsor, false),
    flat("方案编号", ScalarField::ProtocolNumber, false),
    flat("组长单位/主要研究者", ScalarField::PrincipalInvestigator, false),
    flat("试验药物名称及规格", ScalarField::DrugNameSpecification, true),
    flat("适应症", ScalarField::Indication, true),
    flat("试验分期", ScalarField::TrialPhase, false),
    flat("研究中心数", ScalarField::CenterCount, false),
    flat("研究周期", ScalarField::StudyPeriod, false),
    FormRow::Section(Group::StudyObjectives),
    nested("主要目的", NestedField::PrimaryObjective),
    nested("次要目的", NestedField::SecondaryObjective),
    FormRow::Section(Group::EfficacyEndpoints),
    nested("主要终点", NestedField::PrimaryEndpoint),
    nested("次要终点", NestedField::SecondaryEndpoint),
    nested("探索性终点", NestedField::ExploratoryEndpoint),
    nested("安全性评价", NestedField::SafetyEvaluation),
    FormRow::Section(Group::TrialDesign),
    nested("研究人群选择及导入期设计依据", NestedField::StudyPopulationSelection),
    nested("阳性对照药品选择及依据", NestedField::PositiveControlSelection),
    nested("主要疗效终点的选择及依据", NestedField::PrimaryEndpointSelection),
    flat("试验流程", ScalarField::TrialProcess, true),
    flat("样本量", ScalarField::SampleSize, true),
    flat("试验用药品，规格，用法用量", ScalarField::InvestigationalDrug, true),
    flat("合并治疗", ScalarField::ConcomitantTreatment, true),
    flat("挽救治疗", ScalarField::RescueTreatment, true),
    flat("入排标准", ScalarField::InclusionExclusionCriteria, true),
    flat("退出和中止/终止标准", ScalarField::WithdrawalTerminationCriteria, true),
    flat("统计分析", ScalarField::StatisticalAnalysis, true),
];

/// The editable fields of [`FORM`], in order.
pub fn form_fields() -> impl Iterator<Item = &'static FormField> {
    FORM.iter().filter_map(|row| match row {
        FormRow::Field(f) => Some(f),
        FormRow::Section(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_group_defaults_to_empty_strings() {
        let json = r#"{"study_title": "A study", "study_objectives": {"primary_objective": "P"}}"#;
        let draft: SummaryDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.study_title, "A study");
        assert_eq!(draft.study_objectives.primary_objective, "P");
        assert_eq!(draft.study_objectives.secondary_objective, "");
        assert_eq!(draft.efficacy_endpoints, EfficacyEndpoints::default());
        assert_eq!(draft.trial_design.positive_control_selection, "");
    }

    #[test]
    fn null_and_numeric_values_are_tolerated() {
        let json = r#"{"center_count": 24, "indication": null, "trial_design": null}"#;
        let draft: SummaryDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.center_count, "24");
        assert_eq!(draft.indication, "");
        assert_eq!(draft.trial_design, TrialDesign::default());
    }

    #[test]
    fn falsy_values_become_empty() {
        let json = r#"{"center_count": 0, "sample_size": false, "trial_phase": true,
            "efficacy_endpoints": {"primary_endpoint": 0.0, "secondary_endpoint": 1.5}}"#;
        let draft: SummaryDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.center_count, "");
        assert_eq!(draft.sample_size, "");
        assert_eq!(draft.trial_phase, "true");
        assert_eq!(draft.efficacy_endpoints.primary_endpoint, "");
        assert_eq!(draft.efficacy_endpoints.secondary_endpoint, "1.5");
    }

    #[test]
    fn editable_copy_blanks_administrative_fields() {
        let json = r#"{"sponsor": "S", "protocol_number": "P-1", "principal_investigator": "Dr", "study_title": "T"}"#;
        let draft: SummaryDraft = serde_json::from_str(json).unwrap();
        let copy = draft.editable_copy();
        assert_eq!(copy.sponsor, "");
        assert_eq!(copy.protocol_number, "");
        assert_eq!(copy.principal_investigator, "");
        assert_eq!(copy.study_title, "T");
    }

    #[test]
    fn set_nested_leaf_keeps_siblings() {
        let mut draft = SummaryDraft::default();
        draft.trial_design.study_population_selection = "pop".into();
        draft.trial_design.primary_endpoint_selection = "ep".into();
        let before = draft.clone();

        let path = FieldPath::Nested(NestedField::PositiveControlSelection);
        draft.set(path, "X".into());

        assert_eq!(draft.get(path), "X");
        assert_eq!(draft.trial_design.study_population_selection, "pop");
        assert_eq!(draft.trial_design.primary_endpoint_selection, "ep");
        let mut expected = before;
        expected.trial_design.positive_control_selection = "X".into();
        assert_eq!(draft, expected);
    }

    #[test]
    fn form_covers_every_leaf_once() {
        let dotted: Vec<String> = form_fields().map(|f| f.path.dotted()).collect();
        assert_eq!(dotted.len(), 26);
        let mut unique = dotted.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), dotted.len());

        // Writing a marker into every leaf must show up in the serialized draft.
        let mut draft = SummaryDraft::default();
        for f in form_fields() {
            draft.set(f.path, f.path.dotted());
        }
        let value = serde_json::to_value(&draft).unwrap();
        for path in &dotted {
            let leaf = match path.split_once('.') {
                Some((group, field)) => &value[group][field],
                None => &value[path.as_str()],
            };
            assert_eq!(leaf, path.as_str());
        }
    }

    #[test]
    fn parse_dotted_paths() {
        assert_eq!(
            FieldPath::parse("trial_design.positive_control_selection"),
            Some(FieldPath::Nested(NestedField::PositiveControlSelection))
        );
        assert_eq!(
            FieldPath::parse("sponsor"),
            Some(FieldPath::Flat(ScalarField::Sponsor))
        );
        assert_eq!(FieldPath::parse("trial_design"), None);
        assert_eq!(FieldPath::parse("trial_design.nope"), None);
    }
}
