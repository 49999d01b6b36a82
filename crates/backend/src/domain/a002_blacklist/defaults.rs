use contracts::enums::blacklist_type::BlacklistType;
use contracts::enums::severity::Severity;

/// Группа записей черного списка, добавляемых при первом запуске
pub struct DefaultGroup {
    pub entry_type: BlacklistType,
    pub severity: Severity,
    pub reason: &'static str,
    pub values: &'static [&'static str],
}

pub const DEFAULT_GROUPS: &[DefaultGroup] = &[
    DefaultGroup {
        entry_type: BlacklistType::Manufacturer,
        severity: Severity::High,
        reason: "High-risk manufacturer - potential IP infringement",
        values: &[
            "apple", "sony", "nintendo", "microsoft", "samsung", "canon", "nikon", "panasonic",
            "sharp", "toshiba", "dyson", "philips", "braun", "oral-b",
        ],
    },
    DefaultGroup {
        entry_type: BlacklistType::Keyword,
        severity: Severity::High,
        reason: "Dangerous goods keyword",
        values: &[
            "battery", "リチウム", "lithium", "explosive", "爆発物", "flammable", "可燃性", "toxic",
            "毒性", "hazardous", "dangerous", "危険物", "hazmat", "corrosive", "腐食性",
            "radioactive", "放射性", "weapon", "武器", "knife", "ナイフ", "gun", "銃",
            "ammunition", "弾薬",
        ],
    },
    DefaultGroup {
        entry_type: BlacklistType::Category,
        severity: Severity::Medium,
        reason: "Restricted category for new accounts",
        values: &[
            "toys_and_games", "toys", "玩具", "health_personal_care", "health", "健康", "beauty",
            "美容", "grocery", "食品", "baby", "ベビー",
        ],
    },
    DefaultGroup {
        entry_type: BlacklistType::Keyword,
        severity: Severity::High,
        reason: "Prohibited keyword",
        values: &[
            "counterfeit", "偽物", "replica", "レプリカ", "used sold as new", "中古を新品として",
            "unauthorized", "無許可", "parallel import", "並行輸入",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_defaults_are_unique_and_normalized() {
        let mut seen = HashSet::new();
        for group in DEFAULT_GROUPS {
            for value in group.values {
                assert_eq!(*value, value.trim().to_lowercase());
                assert!(seen.insert((group.entry_type, *value)), "duplicate {}", value);
            }
        }
        assert_eq!(seen.len(), 14 + 25 + 12 + 10);
    }
}
