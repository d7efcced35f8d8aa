//! 検索結果の妥当性チェック
//!
//! どちらのチェックも診断用（ログ出力のみ）。採用する候補は変えない。

use crate::types::GeoCandidate;
use serde::{Deserialize, Serialize};

/// 検索結果の受け入れ条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// display_nameに含まれるべきキーワード（大文字小文字無視）
    pub keywords: Vec<String>,
    /// 許可するaddresstype（municipality / village / city / town ...）
    pub address_types: Vec<String>,
    /// 許可するtype（administrative / city / town ...）
    pub types: Vec<String>,
    /// 許可するclass（boundary / place）
    pub classes: Vec<String>,
    /// trueの場合、条件を満たさない結果を未検出扱いにする
    pub reject_mismatches: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            keywords: vec!["Brasil".into(), "São Paulo".into()],
            address_types: vec!["municipality".into()],
            types: vec!["administrative".into()],
            classes: vec!["boundary".into()],
            reject_mismatches: false,
        }
    }
}

/// 先頭候補の種別チェック結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictionReport {
    pub type_valid: bool,
    pub address_type_valid: bool,
    pub class_valid: bool,
}

impl RestrictionReport {
    pub fn passed(&self) -> bool {
        self.type_valid && self.address_type_valid && self.class_valid
    }
}

impl ValidationRules {
    /// いずれかの候補のdisplay_nameにキーワードが含まれるか
    pub fn check_keywords(&self, candidates: &[GeoCandidate]) -> bool {
        let keywords: Vec<String> = self.keywords.iter().map(|k| k.to_lowercase()).collect();

        candidates.iter().any(|candidate| {
            let display_name = candidate.display_name.to_lowercase();
            keywords.iter().any(|k| display_name.contains(k.as_str()))
        })
    }

    /// 先頭候補のtype / addresstype / classがすべて許可リストに含まれるか
    pub fn check_restrictions(&self, top: &GeoCandidate) -> RestrictionReport {
        RestrictionReport {
            type_valid: self.types.contains(&top.kind),
            address_type_valid: self.address_types.contains(&top.address_type),
            class_valid: self.classes.contains(&top.class),
        }
    }
}
