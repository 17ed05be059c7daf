//! Deterministic keyword analysis of free-text symptoms.

use super::dictionary::{Condition, CONDITIONS};
use super::normalize::{contains_keyword, normalize};
use crate::constants::MAX_DIAGNOSIS_SUGGESTIONS;
use api_shared::dto::{
    DiagnosisSuggestion, MedicineSuggestion, SuggestionSource, SymptomAnalysisRes,
};

pub const EXAMINATION_NEEDED: &str = "برای تشخیص دقیق معاینه کلینیکی لازم است.";
pub const SEEK_CARE_IF_WORSE: &str = "در صورت شدید شدن علایم، فوراً به داکتر مراجعه شود.";
pub const PEDIATRIC_DOSING: &str = "دوز دواها برای اطفال باید بر اساس وزن تنظیم شود.";
pub const GERIATRIC_DOSING: &str = "در سالمندان وظایف گرده و تداخلات دوایی بررسی شود.";
pub const PREGNANCY_CHECK: &str = "احتمال حاملگی قبل از تجویز دوا در نظر گرفته شود.";

const BASE_CONFIDENCE: f32 = 0.4;
const PER_KEYWORD_CONFIDENCE: f32 = 0.15;
const MAX_CONFIDENCE: f32 = 0.95;

struct ConditionMatch {
    condition: &'static Condition,
    keywords: Vec<&'static str>,
}

impl ConditionMatch {
    fn confidence(&self) -> f32 {
        (BASE_CONFIDENCE + PER_KEYWORD_CONFIDENCE * self.keywords.len() as f32).min(MAX_CONFIDENCE)
    }
}

/// Matches `symptoms` against the condition dictionary.
///
/// Diagnoses are ordered by confidence (more distinct keyword hits first), ties broken by
/// the Dari name. Medications are the de-duplicated union of the returned diagnoses'
/// medicines in that same order.
pub fn analyze_symptoms(
    symptoms: &str,
    patient_age: Option<u32>,
    patient_gender: Option<&str>,
) -> SymptomAnalysisRes {
    let text = normalize(symptoms);

    let mut matches: Vec<ConditionMatch> = CONDITIONS
        .iter()
        .filter_map(|condition| {
            let mut keywords: Vec<&'static str> = Vec::new();
            for keyword in condition.keywords {
                if contains_keyword(&text, &normalize(keyword)) && !keywords.contains(keyword) {
                    keywords.push(keyword);
                }
            }
            (!keywords.is_empty()).then_some(ConditionMatch {
                condition,
                keywords,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.keywords
            .len()
            .cmp(&a.keywords.len())
            .then_with(|| a.condition.name.cmp(b.condition.name))
    });
    matches.truncate(MAX_DIAGNOSIS_SUGGESTIONS);

    let diagnoses = matches
        .iter()
        .map(|m| DiagnosisSuggestion {
            name: m.condition.name.to_string(),
            name_en: Some(m.condition.name_en.to_string()),
            icd_code: Some(m.condition.icd_code.to_string()),
            confidence: m.confidence(),
            matched_keywords: m.keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect();

    let mut medications: Vec<MedicineSuggestion> = Vec::new();
    for m in &matches {
        for template in m.condition.medicines {
            if !medications.iter().any(|s| s.name == template.name) {
                medications.push(template.to_suggestion());
            }
        }
    }

    let mut recommendations: Vec<String> = Vec::new();
    if matches.is_empty() {
        recommendations.push(EXAMINATION_NEEDED.to_string());
    }
    for m in &matches {
        for advice in m.condition.advice {
            push_unique(&mut recommendations, advice);
        }
    }
    for advice in demographic_advice(patient_age, patient_gender) {
        push_unique(&mut recommendations, advice);
    }
    if !matches.is_empty() {
        push_unique(&mut recommendations, SEEK_CARE_IF_WORSE);
    }

    SymptomAnalysisRes {
        diagnoses,
        medications,
        recommendations,
        source: SuggestionSource::Local,
    }
}

/// Age- and sex-specific prescribing cautions.
pub fn demographic_advice(
    patient_age: Option<u32>,
    patient_gender: Option<&str>,
) -> Vec<&'static str> {
    let mut advice = Vec::new();
    match patient_age {
        Some(age) if age < 12 => advice.push(PEDIATRIC_DOSING),
        Some(age) if age > 65 => advice.push(GERIATRIC_DOSING),
        _ => {}
    }
    let childbearing_age = patient_age.map_or(false, |age| (15..=49).contains(&age));
    if childbearing_age && patient_gender.map_or(false, is_female) {
        advice.push(PREGNANCY_CHECK);
    }
    advice
}

fn is_female(gender: &str) -> bool {
    matches!(
        normalize(gender).as_str(),
        "female" | "f" | "woman" | "زن" | "مونث" | "خانم"
    )
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fever_and_body_ache_suggest_influenza_first() {
        let res = analyze_symptoms("تب بلند، لرز و بدن درد از دو روز", Some(30), None);
        assert_eq!(res.source, SuggestionSource::Local);
        let top = &res.diagnoses[0];
        assert_eq!(top.name_en.as_deref(), Some("Influenza"));
        assert_eq!(top.matched_keywords, vec!["تب", "لرز", "بدن درد"]);
        assert!((top.confidence - 0.85).abs() < 1e-6);
        assert!(res.medications.iter().any(|m| m.name == "Paracetamol"));
        assert!(res
            .recommendations
            .contains(&SEEK_CARE_IF_WORSE.to_string()));
    }

    #[test]
    fn english_input_is_understood() {
        let res = analyze_symptoms("Dry cough and WHEEZING at night", None, None);
        let names: Vec<_> = res
            .diagnoses
            .iter()
            .filter_map(|d| d.name_en.as_deref())
            .collect();
        assert!(names.contains(&"Acute bronchitis"));
        assert!(names.contains(&"Asthma"));
    }

    #[test]
    fn medications_are_deduplicated() {
        let res = analyze_symptoms("fever and headache and sore throat", None, None);
        let paracetamol = res
            .medications
            .iter()
            .filter(|m| m.name == "Paracetamol")
            .count();
        assert_eq!(paracetamol, 1);
    }

    #[test]
    fn confidence_is_capped() {
        let res = analyze_symptoms(
            "تب لرز بدن درد درد عضلات خستگی آنفلوانزا fever chills flu",
            None,
            None,
        );
        assert!(res.diagnoses.iter().all(|d| d.confidence <= MAX_CONFIDENCE));
        assert!(res.diagnoses.len() <= MAX_DIAGNOSIS_SUGGESTIONS);
    }

    #[test]
    fn medications_come_from_returned_diagnoses_only() {
        let res = analyze_symptoms(
            "تب سرفه سردرد اسهال گلودرد درد شکم سوزش ادرار خارش fever cough headache rash",
            None,
            None,
        );
        let returned: Vec<&str> = res.diagnoses.iter().map(|d| d.name.as_str()).collect();
        let allowed: Vec<&str> = CONDITIONS
            .iter()
            .filter(|c| returned.contains(&c.name))
            .flat_map(|c| c.medicines.iter().map(|m| m.name))
            .collect();
        assert!(!res.medications.is_empty());
        assert!(res
            .medications
            .iter()
            .all(|m| allowed.contains(&m.name.as_str())));
    }

    #[test]
    fn unmatched_input_degrades_gracefully() {
        let res = analyze_symptoms("xyz qwerty", None, None);
        assert!(res.diagnoses.is_empty());
        assert!(res.medications.is_empty());
        assert_eq!(res.recommendations, vec![EXAMINATION_NEEDED.to_string()]);
    }

    #[test]
    fn analysis_is_deterministic() {
        let a = analyze_symptoms("اسهال و استفراغ", Some(5), None);
        let b = analyze_symptoms("اسهال و استفراغ", Some(5), None);
        assert_eq!(a, b);
        assert!(a.recommendations.contains(&PEDIATRIC_DOSING.to_string()));
    }

    #[test]
    fn demographic_advice_rules() {
        assert_eq!(demographic_advice(Some(70), None), vec![GERIATRIC_DOSING]);
        assert_eq!(demographic_advice(Some(66), None), vec![GERIATRIC_DOSING]);
        assert!(demographic_advice(Some(65), None).is_empty());
        assert_eq!(demographic_advice(Some(11), None), vec![PEDIATRIC_DOSING]);
        assert!(demographic_advice(Some(12), None).is_empty());
        assert_eq!(demographic_advice(Some(28), Some("زن")), vec![PREGNANCY_CHECK]);
        assert_eq!(
            demographic_advice(Some(28), Some("Female")),
            vec![PREGNANCY_CHECK]
        );
        assert!(demographic_advice(Some(28), Some("مرد")).is_empty());
        assert!(demographic_advice(None, Some("زن")).is_empty());
    }
}
