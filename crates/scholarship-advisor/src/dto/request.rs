//! 请求 DTO 定义

use rule_engine::{ApplicantProfile, Facts, Ruleset};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::{AdvisorError, Result};

/// 申请表单
///
/// 字段名即事实名，取值范围与申请表单一致；缺省字段取表单默认值。
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ApplicantRequest {
    #[validate(range(min = 0.0, max = 4.0, message = "CGPA 必须在 0-4 之间"))]
    pub cgpa: f64,
    #[validate(range(min = 0.0, message = "家庭收入不能为负数"))]
    pub family_income: f64,
    #[validate(range(max = 100, message = "课外活动分数必须在 0-100 之间"))]
    pub co_curricular_score: u32,
    pub community_service_hours: u32,
    #[validate(range(min = 1, max = 14, message = "当前学期必须在 1-14 之间"))]
    pub current_semester: u32,
    pub disciplinary_actions: u32,
}

impl Default for ApplicantRequest {
    fn default() -> Self {
        ApplicantProfile::default().into()
    }
}

impl From<ApplicantProfile> for ApplicantRequest {
    fn from(profile: ApplicantProfile) -> Self {
        Self {
            cgpa: profile.cgpa,
            family_income: profile.family_income,
            co_curricular_score: profile.co_curricular_score,
            community_service_hours: profile.community_service_hours,
            current_semester: profile.current_semester,
            disciplinary_actions: profile.disciplinary_actions,
        }
    }
}

impl From<ApplicantRequest> for ApplicantProfile {
    fn from(req: ApplicantRequest) -> Self {
        Self {
            cgpa: req.cgpa,
            family_income: req.family_income,
            co_curricular_score: req.co_curricular_score,
            community_service_hours: req.community_service_hours,
            current_semester: req.current_semester,
            disciplinary_actions: req.disciplinary_actions,
        }
    }
}

/// 评估请求
///
/// `applicant` 和 `facts` 至少提供一个；同时提供时 `facts` 覆盖或补充表单字段。
/// `rules` 只对本次评估生效，不修改服务当前的规则集。
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateRequest {
    pub applicant: Option<ApplicantRequest>,
    pub facts: Option<Facts>,
    pub rules: Option<Value>,
    #[serde(default)]
    pub trace: bool,
}

impl EvaluateRequest {
    /// 校验并合成本次评估的事实
    pub fn build_facts(&self) -> Result<Facts> {
        let mut facts = match &self.applicant {
            Some(applicant) => {
                applicant.validate()?;
                Facts::from(ApplicantProfile::from(applicant.clone()))
            }
            None => Facts::new(),
        };

        match &self.facts {
            Some(extra) => {
                for (name, value) in extra.iter() {
                    facts = facts.with(name, value);
                }
            }
            None if self.applicant.is_none() => {
                return Err(AdvisorError::Validation(
                    "必须提供 applicant 或 facts".to_string(),
                ));
            }
            None => {}
        }

        Ok(facts)
    }

    /// 解析请求内联的规则集
    pub fn inline_rules(&self) -> Result<Option<Ruleset>> {
        match &self.rules {
            Some(value) => Ok(Some(Ruleset::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}
